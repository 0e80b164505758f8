//! Raw table sources

pub mod csv_source;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

use crate::DataError;

pub use csv_source::CsvSource;

/// Anything that can hand over the whole lap table at once
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Read every row as a single batch
    async fn read_table(&self) -> Result<RecordBatch, DataError>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

/// Already materialized table
pub struct BatchSource {
    name: String,
    batch: RecordBatch,
}

impl BatchSource {
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }
}

#[async_trait]
impl TableSource for BatchSource {
    async fn read_table(&self) -> Result<RecordBatch, DataError> {
        Ok(self.batch.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
