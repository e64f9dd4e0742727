//! Lenient decoding of entry payloads.
//!
//! Accepts a bare JSON array of entries or an object wrapping the array
//! under one of the known field names. Malformed records are skipped.

use crate::model::LogEntry;
use crate::utils::config::ENTRY_FIELD_NAMES;
use crate::utils::error::SourceError;
use log::{debug, warn};
use serde_json::Value;

/// Decode a JSON payload into log entries
///
/// **Public** - shared by every entry source
///
/// # Errors
/// * `SourceError::InvalidFormat` - payload is neither an array nor an
///   object holding one, or every record failed to decode
pub fn decode_entries(payload: &Value) -> Result<Vec<LogEntry>, SourceError> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(obj) => ENTRY_FIELD_NAMES
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_array))
            .ok_or_else(|| {
                SourceError::InvalidFormat(format!(
                    "Object payload has no entry array (looked for {})",
                    ENTRY_FIELD_NAMES.join(", ")
                ))
            })?,
        _ => {
            return Err(SourceError::InvalidFormat(
                "Payload must be a JSON array or object".to_string(),
            ))
        }
    };

    decode_records(records)
}

fn decode_records(records: &[Value]) -> Result<Vec<LogEntry>, SourceError> {
    let mut entries = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match serde_json::from_value::<LogEntry>(record.clone()) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                // Log but don't fail - upstream sources are noisy
                warn!("Skipping malformed entry {}: {}", index, e);
            }
        }
    }

    if entries.is_empty() && !records.is_empty() {
        return Err(SourceError::InvalidFormat(
            "All entries failed to decode".to_string(),
        ));
    }

    debug!("Decoded {} of {} entries", entries.len(), records.len());

    Ok(entries)
}
