//! Pure functions for encoding/decoding pagination cursors.
//!
//! A cursor is the standard base64 encoding of the JSON object
//! `{"PK": "...", "SK": "..."}` naming the last item of a page. It is handed to
//! clients as an opaque `nextToken` and turned back into the backend's
//! exclusive start key on the next request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::storage::{Item, Key};

/// Errors that can occur when encoding or decoding a cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("Invalid cursor encoding: {0}")]
    InvalidEncoding(String),
    #[error("Invalid cursor content: {0}")]
    InvalidContent(String),
    #[error("Last evaluated key is missing PK or SK")]
    IncompleteKey,
}

/// Result type for cursor operations.
pub type Result<T> = std::result::Result<T, CursorError>;

/// Encodes a composite key as an opaque token.
pub fn encode_cursor(key: &Key) -> Result<String> {
    let json = serde_json::to_vec(key).map_err(|e| CursorError::InvalidContent(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Decodes a token back into the composite key it was built from.
pub fn decode_cursor(token: &str) -> Result<Key> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|e| CursorError::InvalidEncoding(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CursorError::InvalidContent(e.to_string()))
}

/// Builds the next-page token from a backend's last evaluated key.
///
/// Returns `Ok(None)` when the backend reported no truncation.
pub fn cursor_from_last_evaluated_key(last_evaluated_key: Option<&Item>) -> Result<Option<String>> {
    match last_evaluated_key {
        Some(item) if !item.is_empty() => {
            let key = Key::from_item(item).ok_or(CursorError::IncompleteKey)?;
            encode_cursor(&key).map(Some)
        }
        _ => Ok(None),
    }
}

/// Turns an optional client token into the exclusive start key of a query.
pub fn exclusive_start_key(next_token: Option<&str>) -> Result<Option<Item>> {
    next_token
        .map(|token| decode_cursor(token).map(|key| key.to_item()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AttrValue;

    #[test]
    fn test_round_trip() {
        let key = Key::new(
            "CLUB#01HR9ZZNRFCKMAYNW3RY561QCP",
            "RESERVATION#01H55420KY47HRVVPK1Z3BSACK",
        );
        let token = encode_cursor(&key).unwrap();
        assert_eq!(decode_cursor(&token).unwrap(), key);
    }

    #[test]
    fn test_round_trip_non_ascii() {
        let key = Key::new("CLUB#Aéroclub Genève", "RESERVATION#✈️ \"quoted\" #1");
        let token = encode_cursor(&key).unwrap();
        assert_eq!(decode_cursor(&token).unwrap(), key);
    }

    #[test]
    fn test_wire_format() {
        let key = Key::new("a", "b");
        let token = encode_cursor(&key).unwrap();
        let json = String::from_utf8(STANDARD.decode(token).unwrap()).unwrap();
        assert_eq!(json, r#"{"PK":"a","SK":"b"}"#);
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode_cursor("not base64!"),
            Err(CursorError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_decode_invalid_json() {
        let token = STANDARD.encode(b"{\"PK\":1}");
        assert!(matches!(
            decode_cursor(&token),
            Err(CursorError::InvalidContent(_))
        ));
    }

    #[test]
    fn test_cursor_from_last_evaluated_key() {
        assert_eq!(cursor_from_last_evaluated_key(None).unwrap(), None);
        assert_eq!(
            cursor_from_last_evaluated_key(Some(&Item::new())).unwrap(),
            None
        );

        let key = Key::new("CLUB#1", "RESERVATION#2");
        let token = cursor_from_last_evaluated_key(Some(&key.to_item()))
            .unwrap()
            .unwrap();
        assert_eq!(decode_cursor(&token).unwrap(), key);
    }

    #[test]
    fn test_cursor_from_incomplete_key() {
        let mut item = Item::new();
        item.insert("PK".to_string(), AttrValue::from("CLUB#1"));
        assert_eq!(
            cursor_from_last_evaluated_key(Some(&item)),
            Err(CursorError::IncompleteKey)
        );
    }

    #[test]
    fn test_exclusive_start_key() {
        assert_eq!(exclusive_start_key(None).unwrap(), None);

        let key = Key::new("CLUB#1", "RESERVATION#2");
        let token = encode_cursor(&key).unwrap();
        assert_eq!(
            exclusive_start_key(Some(&token)).unwrap(),
            Some(key.to_item())
        );
    }
}
