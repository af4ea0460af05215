//! Error types for the hackernews domain layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DomainError`] - Query and business rule errors
//! - [`StorageError`] - Record store errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Domain Errors
// =============================================================================

/// Query failures and business rule violations.
///
/// Every variant is non-retryable: the operations behind them are pure
/// reads or create-or-reject writes with no transient failure of their own.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The order enumerant is not one of the fixed keys of the collection.
    #[error("Unknown order key: {0}")]
    UnknownOrderKey(String),

    /// The `after` token could not be decoded into a position.
    ///
    /// Callers must restart pagination from the beginning.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// A user with the same email address already exists.
    #[error("A user with email address {0} already exists")]
    DuplicateEmail(String),

    /// Unknown email address or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A bearer token was presented but matches no user.
    #[error("User not found for the supplied token")]
    UnknownToken,

    /// The operation requires a logged-in user.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// `postedById` names someone other than the logged-in user.
    #[error("postedById does not match the logged-in user")]
    PostedByMismatch,

    /// The supplied user id names someone other than the logged-in user.
    #[error("Supplied user id does not match the logged-in user")]
    UserMismatch,

    /// The link to vote on does not exist.
    #[error("Link not found: {0}")]
    LinkNotFound(i64),

    /// The user already voted for this link.
    #[error("A vote already exists for user {user} and link {link}")]
    DuplicateVote {
        /// Voting user.
        user: i64,
        /// Link voted for.
        link: i64,
    },

    /// Generic input validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Record store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A uniqueness or foreign key rule was violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Snapshot file could not be read or written.
    #[error("Snapshot I/O error: {0}")]
    SnapshotIo(String),

    /// Data serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
