//! Flattening of nested results into single-level rows.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::error_handling::ExportError;
use crate::models::LookupResult;

/// Joins a parent key and a child key.
const KEY_SEPARATOR: &str = "_";

/// A flattened result: `parent_child` keys to leaf values.
pub type FlatRow = BTreeMap<String, Value>;

/// Flattens one result.
///
/// Nested objects collapse into `parent_child` keys; an empty object
/// (disabled threat intel) contributes no keys at all.
pub fn flatten_result(result: &LookupResult) -> Result<FlatRow, ExportError> {
    let mut row = FlatRow::new();
    if let Value::Object(map) = serde_json::to_value(result)? {
        flatten_into(&mut row, "", map);
    }
    Ok(row)
}

fn flatten_into(row: &mut FlatRow, prefix: &str, map: Map<String, Value>) {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, KEY_SEPARATOR, key)
        };
        match value {
            Value::Object(child) => flatten_into(row, &key, child),
            leaf => {
                row.insert(key, leaf);
            }
        }
    }
}

/// Flattens every result, in order.
pub fn flatten_results(results: &[LookupResult]) -> Result<Vec<FlatRow>, ExportError> {
    results.iter().map(flatten_result).collect()
}

/// Sorted union of the keys of all rows.
pub fn headers(rows: &[FlatRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Text for a cell; `None` for a missing key or `null`.
pub fn cell_text(row: &FlatRow, header: &str) -> Option<String> {
    match row.get(header)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
