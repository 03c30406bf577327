//! Normalized row
//!
//! The flat, validated, four-column shape persisted to the store.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// One persisted row: identity, age, and the two JSON side-documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    /// Full name, `firstName` and `lastName` joined with a space
    pub name: String,
    /// Mandatory integer age
    pub age: i64,
    /// The `address` subtree, when present and non-empty
    pub address: Option<Value>,
    /// Every remaining top-level key besides `name`, `age`, `address`
    pub additional_info: Option<Value>,
}

impl NormalizedRow {
    /// Build a normalized row from a nested record.
    ///
    /// Fails when `name.firstName`, `name.lastName`, or `age` is missing or
    /// empty, or when `age` does not parse as an integer. No other validation
    /// is performed — age is not range-checked and the address subtree is
    /// taken as-is.
    pub fn from_nested(nested: &Map<String, Value>) -> Result<Self> {
        let name_node = nested.get("name").and_then(Value::as_object);
        let first = require_text(name_node, "firstName", "name.firstName")?;
        let last = require_text(name_node, "lastName", "name.lastName")?;

        let age_raw = match nested.get("age").and_then(Value::as_str) {
            Some(s) if !s.is_empty() => s,
            _ => return Err(Error::missing_record_field("age")),
        };
        let age: i64 = age_raw.parse().map_err(|_| Error::InvalidInteger {
            field: "age".to_string(),
            value: age_raw.to_string(),
        })?;

        let address = match nested.get("address") {
            Some(Value::Object(subtree)) if !subtree.is_empty() => {
                Some(Value::Object(subtree.clone()))
            }
            _ => None,
        };

        let mut extra = Map::new();
        for (key, value) in nested {
            if matches!(key.as_str(), "name" | "age" | "address") {
                continue;
            }
            extra.insert(key.clone(), value.clone());
        }
        let additional_info = if extra.is_empty() {
            None
        } else {
            Some(Value::Object(extra))
        };

        Ok(Self {
            name: format!("{first} {last}"),
            age,
            address,
            additional_info,
        })
    }
}

/// Pull a mandatory non-empty string out of an optional object node
fn require_text<'a>(
    node: Option<&'a Map<String, Value>>,
    key: &str,
    qualified: &str,
) -> Result<&'a str> {
    match node.and_then(|m| m.get(key)).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Error::missing_record_field(qualified)),
    }
}
