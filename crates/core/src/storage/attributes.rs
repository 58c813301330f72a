//! Typed accessors for item attributes.
//!
//! Decoding failures are reported as `StoreError::InvalidData` naming the field.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::error::StoreError;
use super::types::{AttrValue, Item};
use crate::time::parse_timestamp;

/// Get a required string attribute.
pub fn get_string(item: &Item, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute. Null and missing both read as `None`.
pub fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s())
        .map(|s| s.to_string())
}

/// Get a required integer attribute.
pub fn get_i64(item: &Item, key: &str) -> Result<i64, StoreError> {
    let n = item
        .get(key)
        .and_then(|v| v.as_n())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))?;
    n.parse()
        .map_err(|e| StoreError::InvalidData(format!("Invalid integer {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
pub fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let s = get_string(item, key)?;
    parse_timestamp(&s)
        .map_err(|e| StoreError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

/// Get an optional datetime attribute. Null and missing both read as `None`.
pub fn get_optional_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    match item.get(key) {
        None | Some(AttrValue::Null) => Ok(None),
        Some(_) => get_datetime(item, key).map(Some),
    }
}

/// Get a map-of-strings attribute. A missing attribute reads as an empty map.
pub fn get_string_map(item: &Item, key: &str) -> Result<BTreeMap<String, String>, StoreError> {
    let Some(value) = item.get(key) else {
        return Ok(BTreeMap::new());
    };
    let map = value
        .as_m()
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))?;

    map.iter()
        .map(|(k, v)| {
            v.as_s()
                .map(|s| (k.clone(), s.to_string()))
                .ok_or_else(|| StoreError::InvalidData(format!("Invalid tag {}.{}", key, k)))
        })
        .collect()
}

/// Build a map attribute from string pairs.
pub fn string_map_value(map: &BTreeMap<String, String>) -> AttrValue {
    AttrValue::M(
        map.iter()
            .map(|(k, v)| (k.clone(), AttrValue::S(v.clone())))
            .collect::<HashMap<_, _>>(),
    )
}
