//! File configuration for loading a lap table

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::null_handling::NullConfig;
use crate::DataError;

/// Rows sampled for column type detection
pub const DEFAULT_SAMPLE_SIZE: usize = 5000;

/// How to read and bind one lap table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Path to the file
    pub path: PathBuf,

    /// Field delimiter
    pub delimiter: char,

    /// Null handling configuration
    pub null_config: NullConfig,

    /// Source column name -> canonical column name
    pub column_aliases: HashMap<String, String>,

    /// Upper-case tyre compound values
    pub uppercase_compound: bool,

    /// Sample size for type inference
    pub sample_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: ',',
            null_config: NullConfig::default(),
            column_aliases: HashMap::new(),
            uppercase_compound: true,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl LoadConfig {
    /// Create a configuration for a file with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_alias(mut self, source: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.column_aliases.insert(source.into(), canonical.into());
        self
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Canonical name for a source column
    pub fn canonical_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.column_aliases
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }

    /// Delimiter as a single byte for the CSV reader
    pub fn delimiter_byte(&self) -> Result<u8, DataError> {
        if !self.delimiter.is_ascii() {
            return Err(DataError::Config(format!("delimiter {:?} is not ASCII", self.delimiter)));
        }
        Ok(self.delimiter as u8)
    }
}
