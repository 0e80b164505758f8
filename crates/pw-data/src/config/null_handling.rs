//! Null value handling for data loading

use serde::{Deserialize, Serialize};

/// Cell values treated as missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),
                "-".to_string(),
                "N/A".to_string(),
                "NA".to_string(),
                "NaN".to_string(),
                "null".to_string(),
                "None".to_string(),
                "NaT".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  "));
        assert!(config.is_null("nan"));
        assert!(config.is_null(" NaT "));
        assert!(!config.is_null("0"));
        assert!(!config.is_null("SOFT"));
    }

    #[test]
    fn test_case_sensitive() {
        let mut config = NullConfig {
            case_sensitive: true,
            ..Default::default()
        };
        config.add_pattern("DNF");
        config.add_pattern("DNF");
        assert!(config.is_null("DNF"));
        assert!(!config.is_null("dnf"));
        assert_eq!(config.patterns.iter().filter(|p| *p == "DNF").count(), 1);
    }
}
