//! JSON export.
//!
//! Produces one flat object per stored record holding exactly the fields
//! the kind's schema lists, in schema order. Relations come out as the
//! related record's identifier.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RosterError, Result};
use crate::model::Record;
use crate::schema;
use crate::store::RecordStore;

/// Flatten every record of kind `R` into schema-ordered JSON objects.
///
/// Output order is the store's natural order (name ascending).
///
/// # Errors
///
/// Returns an error if the store lookup or serialization fails.
pub fn export_records<R: Record>(store: &impl RecordStore) -> Result<Vec<Map<String, Value>>> {
    let records: Vec<R> = store.all()?;
    let rows = records.iter().map(record_row).collect::<Result<Vec<_>>>()?;

    tracing::debug!(kind = %R::KIND, count = rows.len(), "Exported records");
    Ok(rows)
}

/// One record as a flat object holding exactly the schema's fields.
///
/// # Errors
///
/// Returns an error if the record does not serialize to an object.
pub fn record_row<R: Record>(record: &R) -> Result<Map<String, Value>> {
    let Value::Object(mut full) = serde_json::to_value(record)? else {
        return Err(RosterError::validation(R::KIND.as_str(), "not an object"));
    };
    let mut row = Map::new();
    for field in schema::for_kind(R::KIND).export_fields() {
        let value = full.remove(field).unwrap_or(Value::Null);
        row.insert(field.to_string(), value);
    }
    Ok(row)
}

/// Render export rows as the downloadable document.
///
/// Pretty-printed with four-space indentation; non-ASCII text is written
/// literally.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn to_json_bytes(rows: &[Map<String, Value>]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    rows.serialize(&mut serializer)?;
    Ok(out)
}
