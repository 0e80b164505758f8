use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use csv::ReaderBuilder;
use tracing::{debug, info};

use super::TableSource;
use crate::config::{LoadConfig, NullConfig};
use crate::DataError;

/// CSV lap table read fully into memory
pub struct CsvSource {
    config: LoadConfig,
    name: String,
}

impl CsvSource {
    pub fn new(config: LoadConfig) -> Self {
        let name = config.file_name();
        Self { config, name }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Parse CSV text into a batch, detecting column types from a sample
    pub fn parse_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<RecordBatch, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(config.delimiter_byte()?)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(DataError::EmptyTable);
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        if rows.is_empty() {
            return Err(DataError::EmptyTable);
        }

        let sample = &rows[..rows.len().min(config.sample_size.max(1))];
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let data_type = Self::detect_column_type(sample, idx, &config.null_config);
                Field::new(name, data_type, true)
            })
            .collect::<Vec<_>>();
        let schema = Arc::new(Schema::new(fields));

        let columns = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| Self::build_column(&rows, idx, field.data_type(), &config.null_config))
            .collect::<Vec<_>>();

        debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV table");
        RecordBatch::try_new(schema, columns).map_err(|e| e.into())
    }

    /// Detect column type from sample data
    fn detect_column_type(samples: &[Vec<String>], col_idx: usize, nulls: &NullConfig) -> DataType {
        let mut is_int = true;
        let mut is_float = true;
        let mut seen = false;

        for row in samples {
            let Some(value) = row.get(col_idx) else {
                continue;
            };
            if nulls.is_null(value) {
                continue;
            }
            seen = true;

            if is_int && value.parse::<i64>().is_err() {
                is_int = false;
            }
            if is_float && value.parse::<f64>().is_err() {
                is_float = false;
            }
            if !is_int && !is_float {
                break;
            }
        }

        if !seen {
            DataType::Utf8
        } else if is_int {
            DataType::Int64
        } else if is_float {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }

    fn build_column(
        rows: &[Vec<String>],
        col_idx: usize,
        data_type: &DataType,
        nulls: &NullConfig,
    ) -> ArrayRef {
        let cells = rows
            .iter()
            .map(|row| row.get(col_idx).filter(|v| !nulls.is_null(v)));

        match data_type {
            DataType::Int64 => {
                let mut builder = Int64Builder::with_capacity(rows.len());
                for cell in cells {
                    builder.append_option(cell.and_then(|v| v.parse::<i64>().ok()));
                }
                Arc::new(builder.finish())
            }
            DataType::Float64 => {
                let mut builder = Float64Builder::with_capacity(rows.len());
                for cell in cells {
                    builder.append_option(cell.and_then(|v| v.parse::<f64>().ok()));
                }
                Arc::new(builder.finish())
            }
            _ => {
                let mut builder = StringBuilder::new();
                for cell in cells {
                    builder.append_option(cell);
                }
                Arc::new(builder.finish())
            }
        }
    }
}

#[async_trait]
impl TableSource for CsvSource {
    async fn read_table(&self) -> Result<RecordBatch, DataError> {
        let config = self.config.clone();
        let batch = tokio::task::spawn_blocking(move || {
            let file = File::open(&config.path)?;
            Self::parse_reader(BufReader::new(file), &config)
        })
        .await??;

        info!(
            source = %self.name,
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "Loaded CSV"
        );
        Ok(batch)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
