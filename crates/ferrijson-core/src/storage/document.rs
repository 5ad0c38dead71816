//! Whole-file JSON document I/O.
//!
//! The document on disk is always a JSON array. Reads never fail: a missing,
//! unreadable, or malformed file loads as an empty record set. Writes replace
//! the whole file and surface any failure to the caller.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::types::{INDENT_WIDTH, StoreConfig};

/// Load every record from the document at `path`.
///
/// - A JSON array is returned as-is.
/// - A single JSON object is wrapped into a one-element array.
/// - Anything else (missing file, read error, invalid JSON, a top-level
///   scalar) yields an empty vector.
pub fn load_all(path: &Path) -> Vec<Value> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document not found, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read document, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(records)) => {
            debug!(path = %path.display(), records = records.len(), "loaded document");
            records
        }
        Ok(record @ Value::Object(_)) => {
            debug!(path = %path.display(), "loaded single-object document");
            vec![record]
        }
        Ok(other) => {
            warn!(
                path = %path.display(),
                kind = json_kind(&other),
                "document is neither an array nor an object, starting empty"
            );
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "document is not valid JSON, starting empty");
            Vec::new()
        }
    }
}

/// Serialize `records` as a JSON array and overwrite the document at `path`.
pub fn persist(path: &Path, records: &[Value], config: &StoreConfig) -> Result<(), StorageError> {
    let body = encode(records, config.pretty)?;

    if config.create_dirs
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, body)?;
    debug!(path = %path.display(), records = records.len(), "persisted document");
    Ok(())
}

/// Encode `records` as a JSON array, indented by [`INDENT_WIDTH`] when `pretty`.
fn encode(records: &[Value], pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
    if !pretty {
        return serde_json::to_vec(records);
    }

    let indent = b" ".repeat(INDENT_WIDTH);
    let mut body = Vec::new();
    let mut ser = Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(&indent));
    records.serialize(&mut ser)?;
    Ok(body)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
