//! Tabular input for the lap analysis dashboard
//!
//! A [`TableSource`] yields an arrow `RecordBatch`; [`load`] binds it to the
//! fixed lap schema and produces the immutable `RecordStore`.

pub mod config;
pub mod loader;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use config::{LoadConfig, NullConfig};
pub use loader::{load, load_from};
pub use schema::SchemaBinding;
pub use sources::{BatchSource, CsvSource, TableSource};

/// Errors that can occur while loading lap data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Table has no rows or no columns")]
    EmptyTable,

    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
