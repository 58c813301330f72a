//! Serde helper functions for request bodies.
//!
//! Clients submit empty strings for optional fields they leave blank; these
//! helpers treat them as `None`.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty and blank strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
