//! Raw table to record store

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use pw_core::{FieldId, Record, RecordStore, TagId};
use tracing::info;

use crate::config::LoadConfig;
use crate::schema::SchemaBinding;
use crate::sources::TableSource;
use crate::DataError;

/// Build the record store from a raw table
///
/// Numeric columns are coerced to `f64`; nulls, infinities and unparseable
/// text become `NaN`. Tag columns are read as text with nulls as empty strings.
pub fn load(batch: &RecordBatch, config: &LoadConfig) -> Result<RecordStore, DataError> {
    if batch.num_columns() == 0 || batch.num_rows() == 0 {
        return Err(DataError::EmptyTable);
    }

    let binding = SchemaBinding::bind(&batch.schema(), config)?;
    let mut records = vec![Record::empty(); batch.num_rows()];

    for field in FieldId::ALL {
        let Some(idx) = binding.field(field) else {
            continue;
        };
        let numbers = cast(batch.column(idx), &DataType::Float64)?;
        let numbers = downcast::<Float64Array>(&numbers)?;
        for (row, record) in records.iter_mut().enumerate() {
            let value = if numbers.is_null(row) || !numbers.value(row).is_finite() {
                f64::NAN
            } else {
                numbers.value(row)
            };
            record.set_value(field, value);
        }
    }

    for tag in TagId::ALL {
        let Some(idx) = binding.tag(tag) else {
            continue;
        };
        let text = cast(batch.column(idx), &DataType::Utf8)?;
        let text = downcast::<StringArray>(&text)?;
        let upper = tag == TagId::Compound && config.uppercase_compound;
        for (row, record) in records.iter_mut().enumerate() {
            if text.is_null(row) {
                continue;
            }
            let value = text.value(row).trim();
            if upper {
                record.set_tag(tag, value.to_uppercase());
            } else {
                record.set_tag(tag, value);
            }
        }
    }

    Ok(RecordStore::from_records(records))
}

/// Read a source and load it
pub async fn load_from(source: &dyn TableSource, config: &LoadConfig) -> Result<RecordStore, DataError> {
    let batch = source.read_table().await?;
    let store = load(&batch, config)?;
    info!(source = source.source_name(), records = store.len(), "Record store ready");
    Ok(store)
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T, DataError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DataError::Arrow(arrow::error::ArrowError::CastError(format!(
            "unexpected array type {}",
            array.data_type()
        )))
    })
}
