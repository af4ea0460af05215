//! Port traits for data repositories.
//!
//! These traits define the storage interface used by the domain layer.
//! Implementations live in the infrastructure layer (e.g., `hackernews-storage`).

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::models::{Link, NewLink, NewUser, NewVote, Record, RecordKind, User, Vote};

// =============================================================================
// Repository Traits
// =============================================================================

/// Read access to whole collections of paginated records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of a kind, in unspecified order.
    ///
    /// The returned rows must form a consistent snapshot for the duration
    /// of one resolver call.
    async fn scan(&self, kind: RecordKind) -> StorageResult<Vec<Record>>;
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, failing with `ConstraintViolation` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StorageResult<User>;

    /// Get user by primary key.
    async fn get_user(&self, id: i64) -> StorageResult<Option<User>>;

    /// Get user by email address.
    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Get user by authentication token.
    async fn get_user_by_token(&self, token: &str) -> StorageResult<Option<User>>;
}

/// Repository for links.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Insert a link, failing with `ConstraintViolation` if `posted_by` is unknown.
    async fn insert_link(&self, link: NewLink) -> StorageResult<Link>;

    /// Get link by primary key.
    async fn get_link(&self, id: i64) -> StorageResult<Option<Link>>;
}

/// Repository for votes.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert a vote.
    ///
    /// Fails with `ConstraintViolation` if the (user, link) pair already
    /// voted or either side does not exist. The check and the insert are atomic.
    async fn insert_vote(&self, vote: NewVote) -> StorageResult<Vote>;

    /// Get vote by primary key.
    async fn get_vote(&self, id: i64) -> StorageResult<Option<Vote>>;
}

// =============================================================================
// Composite Repository
// =============================================================================

/// Combined repository access for the services.
pub trait Repositories: Send + Sync {
    /// Access the user repository.
    fn users(&self) -> &dyn UserRepository;

    /// Access the link repository.
    fn links(&self) -> &dyn LinkRepository;

    /// Access the vote repository.
    fn votes(&self) -> &dyn VoteRepository;

    /// Access collection scans for pagination.
    fn records(&self) -> &dyn RecordStore;
}
