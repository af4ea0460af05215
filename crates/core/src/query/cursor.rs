//! Opaque cursor codec.
//!
//! A cursor is the standard base64 encoding of the JSON array
//! `[<sort value>, <id>]`, where the sort value is externally tagged
//! (`{"text": "a.com"}`, `{"int": 3}`, `{"timestamp": "2001-09-09T01:46:40Z"}`).
//! It carries no reference to the record store, only a position to seek after.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{DomainError, DomainResult};
use crate::models::MAX_SORT_TEXT_LENGTH;
use crate::ports::Cursor;

use super::order::{Position, SortValue};

/// Most bytes one character takes once JSON-escaped (`\u001f`).
const MAX_ESCAPED_CHAR_BYTES: usize = 6;

/// JSON around the sort value: brackets, tag, quotes and an `i64` id.
const POSITION_FRAMING_BYTES: usize = 64;

/// Longest cursor accepted by [`decode`].
///
/// Sized for the base64 encoding of the longest text sort value a stored
/// link can carry, so every cursor [`encode`] produces decodes again.
pub const MAX_CURSOR_LENGTH: usize =
    (MAX_SORT_TEXT_LENGTH * MAX_ESCAPED_CHAR_BYTES + POSITION_FRAMING_BYTES).div_ceil(3) * 4;

/// Encode a position as an opaque cursor.
pub fn encode(position: &Position) -> DomainResult<Cursor> {
    let payload = serde_json::to_vec(&(&position.value, position.id))
        .map_err(|e| DomainError::InvalidCursor(format!("cannot encode position: {}", e)))?;
    Ok(Cursor::new(STANDARD.encode(payload)))
}

/// Decode a cursor back into the position it was encoded from.
pub fn decode(cursor: &Cursor) -> DomainResult<Position> {
    if cursor.value.len() > MAX_CURSOR_LENGTH {
        return Err(DomainError::InvalidCursor(format!(
            "cursor longer than {} characters",
            MAX_CURSOR_LENGTH
        )));
    }

    let bytes = STANDARD
        .decode(cursor.value.as_bytes())
        .map_err(|e| DomainError::InvalidCursor(format!("not base64: {}", e)))?;

    let (value, id): (SortValue, i64) = serde_json::from_slice(&bytes)
        .map_err(|e| DomainError::InvalidCursor(format!("malformed position: {}", e)))?;

    Ok(Position { value, id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_roundtrip_preserves_every_value_type() {
        let positions = [
            Position {
                value: SortValue::Int(42),
                id: 42,
            },
            Position {
                value: SortValue::Text("https://b.com/ü".into()),
                id: 2,
            },
            Position {
                value: SortValue::Timestamp(Utc.timestamp_opt(1_000_000_400, 123_456_789).unwrap()),
                id: 7,
            },
        ];

        for position in positions {
            assert_eq!(decode(&encode(&position).unwrap()).unwrap(), position);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let position = Position {
            value: SortValue::Text("a.com".into()),
            id: 1,
        };
        assert_eq!(encode(&position).unwrap(), encode(&position.clone()).unwrap());
    }

    // Test critique: un curseur corrompu échoue proprement (pas de panic)
    #[test]
    fn test_decode_rejects_corrupted_input() {
        let bad: Vec<String> = vec![
            "not base64 at all!!".into(),
            String::new(),
            // base64 valide, JSON invalide
            STANDARD.encode("[1,"),
            // JSON valide, mauvaise forme
            STANDARD.encode(r#"{"text":"a"}"#),
            STANDARD.encode(r#"[{"color":"red"},1]"#),
            STANDARD.encode(r#"[{"int":1},"x"]"#),
        ];

        for value in &bad {
            let result = decode(&Cursor::new(value.as_str()));
            assert!(
                matches!(result, Err(DomainError::InvalidCursor(_))),
                "{value:?} should be rejected"
            );
        }
    }

    // Test critique: la plus longue valeur texte admise reste décodable
    #[test]
    fn test_longest_text_values_fit_under_the_cap() {
        let worst = [
            "\u{1}".repeat(MAX_SORT_TEXT_LENGTH),
            "\u{1F600}".repeat(MAX_SORT_TEXT_LENGTH),
            "é".repeat(MAX_SORT_TEXT_LENGTH),
        ];

        for text in worst {
            let position = Position {
                value: SortValue::Text(text),
                id: i64::MIN,
            };
            let cursor = encode(&position).unwrap();
            assert!(cursor.value.len() <= MAX_CURSOR_LENGTH, "{}", cursor.value.len());
            assert_eq!(decode(&cursor).unwrap(), position);
        }
    }

    #[test]
    fn test_decode_rejects_oversized_cursor() {
        let huge = Cursor::new("A".repeat(MAX_CURSOR_LENGTH + 4));
        let err = decode(&huge).unwrap_err();
        assert!(err.to_string().contains("longer than"));
    }
}
