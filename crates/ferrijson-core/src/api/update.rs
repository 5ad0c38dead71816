//! Patch application for `update` and `update_where`.

use serde_json::{Map, Value};

/// Apply every top-level key of `patch` to `record`.
///
/// A key without a `.` replaces the top-level attribute. A dotted key sets a
/// nested attribute, turning any missing or non-object intermediate segment
/// into an empty object first. Non-object records and non-object patches are
/// left untouched.
pub fn apply_patch(record: &mut Value, patch: &Value) {
    let Some(fields) = patch.as_object() else {
        return;
    };

    for (key, value) in fields {
        if key.contains('.') {
            let segments: Vec<&str> = key.split('.').collect();
            set_path(record, &segments, value.clone());
        } else if let Value::Object(map) = record {
            map.insert(key.clone(), value.clone());
        }
    }
}

/// Navigate to the target location and set the value, replacing
/// intermediate segments that are missing or not objects.
fn set_path(doc: &mut Value, segments: &[&str], value: Value) {
    let Value::Object(map) = doc else {
        return;
    };

    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map.entry((*head).to_string()).or_insert(Value::Null);
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            set_path(entry, rest, value);
        }
    }
}
