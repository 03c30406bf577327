//! Nested record construction
//!
//! Builds the intermediate tree representation of one data line. Nodes are
//! restricted to `Value::String`, `Value::Null`, and `Value::Object`.

use serde_json::{Map, Value};

/// Zip headers with fields into a nested record.
///
/// Each header is trimmed and split on `.` into a path; the corresponding
/// field is trimmed, with the empty string mapped to `Null`. Intermediate
/// objects are created as the path is walked. Last write wins on duplicate
/// paths; a scalar sitting on an intermediate segment is replaced by an
/// object when a deeper path needs one.
///
/// The zip is positional: surplus headers (fields missing at the end of the
/// row) produce no entry, surplus fields are ignored.
pub fn build_nested(headers: &[String], fields: &[String]) -> Map<String, Value> {
    let mut root = Map::new();

    for (header, field) in headers.iter().zip(fields) {
        let path: Vec<&str> = header.trim().split('.').collect();
        let Some((leaf, parents)) = path.split_last() else {
            continue;
        };
        if leaf.is_empty() && parents.is_empty() {
            // Blank header cell: nothing to assign the value to.
            continue;
        }

        let trimmed = field.trim();
        let value = if trimmed.is_empty() {
            Value::Null
        } else {
            Value::String(trimmed.to_string())
        };

        let mut node = &mut root;
        for segment in parents {
            let entry = node
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                unreachable!("entry was just made an object");
            };
            node = next;
        }
        node.insert((*leaf).to_string(), value);
    }

    root
}
