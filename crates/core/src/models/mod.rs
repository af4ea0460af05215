//! Domain models for users, links and votes.
//!
//! These models are storage-agnostic and represent the canonical
//! form of records within the domain layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Number of random bytes behind an authentication token.
pub const TOKEN_BYTES: usize = 32;

/// Maximum length of a user name.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum length of a password.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of a link URL.
pub const MAX_URL_LENGTH: usize = 200;

/// Maximum length of a link description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Longest text held by any field a collection can be ordered by.
pub const MAX_SORT_TEXT_LENGTH: usize = if MAX_DESCRIPTION_LENGTH > MAX_URL_LENGTH {
    MAX_DESCRIPTION_LENGTH
} else {
    MAX_URL_LENGTH
};

/// Reject `value` when it holds more than `max_length` characters.
pub fn check_length(field: &str, value: &str, max_length: usize) -> DomainResult<()> {
    if value.chars().count() > max_length {
        return Err(DomainError::Validation(format!(
            "{field} too long: maximum {max_length} characters allowed"
        )));
    }
    Ok(())
}

// =============================================================================
// Users
// =============================================================================

/// A registered user.
///
/// The password is stored as given, without hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
    /// Unique email address.
    pub email: String,
    /// Bearer token, hex encoded.
    pub token: String,
}

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
    pub token: String,
}

/// Generate a fresh authentication token: 32 random bytes, lowercase hex.
pub fn new_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

// =============================================================================
// Links & Votes
// =============================================================================

/// A shared link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Primary key.
    pub id: i64,
    /// Free-form description.
    pub description: String,
    /// Target URL.
    pub url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// User who posted the link (None for anonymous posts).
    pub posted_by: Option<i64>,
}

/// Fields needed to insert a link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub posted_by: Option<i64>,
}

/// A user's vote for a link. At most one per (user, link) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Primary key.
    pub id: i64,
    /// Voting user.
    pub user: i64,
    /// Link voted for.
    pub link: i64,
}

/// Fields needed to insert a vote.
#[derive(Debug, Clone, Copy)]
pub struct NewVote {
    pub user: i64,
    pub link: i64,
}

// =============================================================================
// Records
// =============================================================================

/// Kinds of records that can be paginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Link,
    Vote,
}

impl RecordKind {
    /// Name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Vote => "vote",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of one of the paginated kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Link(Link),
    Vote(Vote),
}

impl Record {
    /// Primary key of the underlying row.
    pub fn id(&self) -> i64 {
        match self {
            Self::Link(link) => link.id,
            Self::Vote(vote) => vote.id,
        }
    }

    /// Kind of the underlying row.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Link(_) => RecordKind::Link,
            Self::Vote(_) => RecordKind::Vote,
        }
    }

    pub fn into_link(self) -> Option<Link> {
        match self {
            Self::Link(link) => Some(link),
            Self::Vote(_) => None,
        }
    }

    pub fn into_vote(self) -> Option<Vote> {
        match self {
            Self::Vote(vote) => Some(vote),
            Self::Link(_) => None,
        }
    }
}

impl From<Link> for Record {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Vote> for Record {
    fn from(vote: Vote) -> Self {
        Self::Vote(vote)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_lowercase_hex_chars() {
        let token = new_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn tokens_differ_between_calls() {
        assert_ne!(new_token(), new_token());
    }

    #[test]
    fn check_length_counts_characters() {
        assert!(check_length("url", &"é".repeat(MAX_URL_LENGTH), MAX_URL_LENGTH).is_ok());
        let err = check_length("url", &"é".repeat(MAX_URL_LENGTH + 1), MAX_URL_LENGTH).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.starts_with("url too long")));
    }

    #[test]
    fn record_exposes_kind_and_id() {
        let vote = Record::from(Vote { id: 3, user: 1, link: 2 });
        assert_eq!(vote.kind(), RecordKind::Vote);
        assert_eq!(vote.id(), 3);
        assert!(vote.clone().into_link().is_none());
        assert_eq!(vote.into_vote().map(|v| v.link), Some(2));
    }
}
