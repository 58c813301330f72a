//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB `AttributeValue` maps and the
//! backend-neutral [`Item`] model. These are testable in isolation without
//! DynamoDB access.

use std::collections::HashMap;

use aviator_core::storage::{AttrValue, Item, Key, StoreError};
use aws_sdk_dynamodb::types::AttributeValue;

/// Convert a neutral attribute value to a DynamoDB attribute value.
pub fn to_attribute_value(value: AttrValue) -> AttributeValue {
    match value {
        AttrValue::S(s) => AttributeValue::S(s),
        AttrValue::N(n) => AttributeValue::N(n),
        AttrValue::Bool(b) => AttributeValue::Bool(b),
        AttrValue::Null => AttributeValue::Null(true),
        AttrValue::L(list) => AttributeValue::L(list.into_iter().map(to_attribute_value).collect()),
        AttrValue::M(map) => AttributeValue::M(to_attribute_map(map)),
    }
}

/// Convert a DynamoDB attribute value to a neutral attribute value.
///
/// Binary and set types are not used by the application and are rejected.
pub fn from_attribute_value(value: AttributeValue) -> Result<AttrValue, StoreError> {
    match value {
        AttributeValue::S(s) => Ok(AttrValue::S(s)),
        AttributeValue::N(n) => Ok(AttrValue::N(n)),
        AttributeValue::Bool(b) => Ok(AttrValue::Bool(b)),
        AttributeValue::Null(_) => Ok(AttrValue::Null),
        AttributeValue::L(list) => list
            .into_iter()
            .map(from_attribute_value)
            .collect::<Result<Vec<_>, _>>()
            .map(AttrValue::L),
        AttributeValue::M(map) => from_attribute_map(map).map(AttrValue::M),
        other => Err(StoreError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Convert an item to a DynamoDB attribute map.
pub fn to_attribute_map(item: Item) -> HashMap<String, AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, to_attribute_value(value)))
        .collect()
}

/// Convert a DynamoDB attribute map to an item.
pub fn from_attribute_map(map: HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    map.into_iter()
        .map(|(name, value)| from_attribute_value(value).map(|value| (name, value)))
        .collect()
}

/// Convert a primary key to a DynamoDB key map.
pub fn key_to_attribute_map(key: &Key) -> HashMap<String, AttributeValue> {
    to_attribute_map(key.to_item())
}

/// Read the primary key back from a DynamoDB key map.
pub fn key_from_attribute_map(map: HashMap<String, AttributeValue>) -> Result<Key, StoreError> {
    let item = from_attribute_map(map)?;
    Key::from_item(&item)
        .ok_or_else(|| StoreError::InvalidData("Key is missing PK or SK".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(
            to_attribute_value(AttrValue::from("x")),
            AttributeValue::S("x".to_string())
        );
        assert_eq!(
            to_attribute_value(AttrValue::from(42_i64)),
            AttributeValue::N("42".to_string())
        );
        assert_eq!(to_attribute_value(AttrValue::Null), AttributeValue::Null(true));
        assert_eq!(
            from_attribute_value(AttributeValue::Bool(true)).unwrap(),
            AttrValue::Bool(true)
        );
    }

    #[test]
    fn test_nested_map_conversion() {
        let mut tags = HashMap::new();
        tags.insert("region".to_string(), AttrValue::from("valais"));
        let mut item = Key::new("STATION#1", "STATION#1").to_item();
        item.insert("Tags".to_string(), AttrValue::M(tags));
        item.insert(
            "Readings".to_string(),
            AttrValue::L(vec![AttrValue::from(1_i64), AttrValue::Null]),
        );

        let map = to_attribute_map(item.clone());
        assert!(matches!(map.get("Tags"), Some(AttributeValue::M(_))));
        assert_eq!(from_attribute_map(map).unwrap(), item);
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let result = from_attribute_value(AttributeValue::B(Blob::new(vec![1, 2, 3])));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_key_conversion() {
        let key = Key::new("CLUB#1", "RESERVATION#2");
        let map = key_to_attribute_map(&key);
        assert_eq!(map.len(), 2);
        assert_eq!(key_from_attribute_map(map).unwrap(), key);

        let mut incomplete = HashMap::new();
        incomplete.insert("PK".to_string(), AttributeValue::S("CLUB#1".to_string()));
        assert!(key_from_attribute_map(incomplete).is_err());
    }
}
