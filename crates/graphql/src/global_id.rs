//! Relay global identifiers: base64 of `<TypeName>:<pk>`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Maximum accepted length of an encoded id.
const MAX_GLOBAL_ID_LENGTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlobalIdError {
    #[error("Invalid global id: {0}")]
    Malformed(String),

    #[error("Invalid global id: expected a {expected} id, got {found}")]
    WrongType {
        expected: &'static str,
        found: String,
    },
}

/// A decoded global id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalId {
    pub type_name: String,
    pub pk: i64,
}

/// Encode a type name and primary key, e.g. `Link:1` becomes `TGluazox`.
pub fn encode(type_name: &str, pk: i64) -> String {
    STANDARD.encode(format!("{type_name}:{pk}"))
}

pub fn decode(id: &str) -> Result<GlobalId, GlobalIdError> {
    if id.len() > MAX_GLOBAL_ID_LENGTH {
        return Err(GlobalIdError::Malformed("too long".into()));
    }

    let raw = STANDARD
        .decode(id)
        .map_err(|_| GlobalIdError::Malformed(id.to_string()))?;
    let raw = String::from_utf8(raw).map_err(|_| GlobalIdError::Malformed(id.to_string()))?;

    let (type_name, pk) = raw
        .split_once(':')
        .ok_or_else(|| GlobalIdError::Malformed(id.to_string()))?;
    let pk = pk
        .parse()
        .map_err(|_| GlobalIdError::Malformed(id.to_string()))?;

    Ok(GlobalId {
        type_name: type_name.to_string(),
        pk,
    })
}

/// Decode an id and require a specific type name.
pub fn decode_as(id: &str, expected: &'static str) -> Result<i64, GlobalIdError> {
    let decoded = decode(id)?;
    if decoded.type_name != expected {
        return Err(GlobalIdError::WrongType {
            expected,
            found: decoded.type_name,
        });
    }
    Ok(decoded.pk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_one() {
        assert_eq!(encode("Link", 1), "TGluazox");
        assert_eq!(
            decode("TGluazox").unwrap(),
            GlobalId {
                type_name: "Link".into(),
                pk: 1
            }
        );
    }

    #[test]
    fn test_malformed_ids_are_rejected() {
        // Pas du base64
        assert!(decode("%%%").is_err());
        // "Link" sans séparateur
        assert!(decode("TGluaw==").is_err());
        // "Link:x", clé non numérique
        assert!(decode(&STANDARD.encode("Link:x")).is_err());
        assert!(decode(&"A".repeat(500)).is_err());
    }

    #[test]
    fn test_decode_as_checks_type() {
        assert_eq!(decode_as(&encode("User", 7), "User"), Ok(7));
        assert!(matches!(
            decode_as(&encode("Link", 7), "User"),
            Err(GlobalIdError::WrongType { expected: "User", .. })
        ));
    }
}
