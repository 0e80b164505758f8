//! Binding of a raw table schema onto the fixed lap schema

use ahash::AHashMap;
use arrow::datatypes::Schema;
use pw_core::{FieldId, TagId};
use tracing::{debug, warn};

use crate::config::LoadConfig;
use crate::DataError;

/// Column positions of every known field in a raw table
///
/// Unknown columns are ignored. Absent optional columns bind to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBinding {
    fields: [Option<usize>; FieldId::COUNT],
    tags: [Option<usize>; TagId::COUNT],
}

impl SchemaBinding {
    /// Resolve columns by canonical name, failing on a missing required one
    pub fn bind(schema: &Schema, config: &LoadConfig) -> Result<Self, DataError> {
        if schema.fields().is_empty() {
            return Err(DataError::EmptyTable);
        }

        let mut by_name: AHashMap<&str, usize> = AHashMap::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            let canonical = config.canonical_name(field.name());
            // First occurrence wins for duplicated headers
            by_name.entry(canonical).or_insert(idx);
        }

        let mut fields = [None; FieldId::COUNT];
        for (slot, field) in FieldId::ALL.iter().enumerate() {
            fields[slot] = lookup(&by_name, field.column_name(), field.is_required())?;
        }

        let mut tags = [None; TagId::COUNT];
        for (slot, tag) in TagId::ALL.iter().enumerate() {
            tags[slot] = lookup(&by_name, tag.column_name(), tag.is_required())?;
        }

        debug!(columns = schema.fields().len(), "Schema bound");
        Ok(Self { fields, tags })
    }

    pub fn field(&self, field: FieldId) -> Option<usize> {
        FieldId::ALL
            .iter()
            .position(|f| *f == field)
            .and_then(|slot| self.fields[slot])
    }

    pub fn tag(&self, tag: TagId) -> Option<usize> {
        TagId::ALL
            .iter()
            .position(|t| *t == tag)
            .and_then(|slot| self.tags[slot])
    }
}

fn lookup(
    by_name: &AHashMap<&str, usize>,
    column: &str,
    required: bool,
) -> Result<Option<usize>, DataError> {
    match by_name.get(column) {
        Some(idx) => Ok(Some(*idx)),
        None if required => Err(DataError::MissingField {
            field: column.to_string(),
        }),
        None => {
            warn!(column, "Optional column absent, values will be missing");
            Ok(None)
        }
    }
}
