//! In-memory storage adapter.
//!
//! This module implements the repository traits defined in `hackernews-core`
//! over `BTreeMap` tables behind a `tokio` read-write lock.
//!
//! # Architecture
//!
//! - [`Database`] - Shared tables, snapshot loading and saving
//! - [`MemoryRepositories`] - Composite repository implementing `Repositories` trait
//! - Individual repos: `MemoryUserRepository`, `MemoryLinkRepository`, `MemoryVoteRepository`
//!
//! # Usage
//!
//! ```ignore
//! let db = Database::open(StoreConfig::with_snapshot("store.json")).await?;
//! let repositories = MemoryRepositories::new(&db);
//! ```

mod database;
mod link_repo;
mod user_repo;
mod vote_repo;

pub use database::{Database, Snapshot, StoreConfig, TableStats};
pub use link_repo::MemoryLinkRepository;
pub use user_repo::MemoryUserRepository;
pub use vote_repo::MemoryVoteRepository;

use async_trait::async_trait;

use hackernews_core::error::StorageResult;
use hackernews_core::models::{Record, RecordKind};
use hackernews_core::ports::{
    LinkRepository, RecordStore, Repositories, UserRepository, VoteRepository,
};

// =============================================================================
// Composite Repository
// =============================================================================

/// Aggregated in-memory repositories implementing the `Repositories` trait.
pub struct MemoryRepositories {
    db: Database,
    users: MemoryUserRepository,
    links: MemoryLinkRepository,
    votes: MemoryVoteRepository,
}

impl MemoryRepositories {
    pub fn new(db: &Database) -> Self {
        Self {
            users: MemoryUserRepository::new(db),
            links: MemoryLinkRepository::new(db),
            votes: MemoryVoteRepository::new(db),
            db: db.clone(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl RecordStore for MemoryRepositories {
    async fn scan(&self, kind: RecordKind) -> StorageResult<Vec<Record>> {
        let tables = self.db.tables().read().await;
        let records = match kind {
            RecordKind::Link => tables.links.values().cloned().map(Record::Link).collect(),
            RecordKind::Vote => tables.votes.values().cloned().map(Record::Vote).collect(),
        };
        Ok(records)
    }
}

impl Repositories for MemoryRepositories {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn links(&self) -> &dyn LinkRepository {
        &self.links
    }

    fn votes(&self) -> &dyn VoteRepository {
        &self.votes
    }

    fn records(&self) -> &dyn RecordStore {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hackernews_core::error::StorageError;
    use hackernews_core::models::{NewLink, NewUser, NewVote};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            password: "pw".into(),
            email: email.into(),
            token: format!("{:064}", email.len()),
        }
    }

    fn new_link(posted_by: Option<i64>) -> NewLink {
        NewLink {
            description: "d".into(),
            url: "https://example.com".into(),
            created_at: Utc::now(),
            posted_by,
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let repos = MemoryRepositories::new(&Database::in_memory());
        let a = repos.users().insert_user(new_user("a@example.com")).await.unwrap();
        let b = repos.users().insert_user(new_user("bb@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let found = repos.users().get_user_by_token(&b.token).await.unwrap();
        assert_eq!(found, Some(b));
    }

    // Test critique: email unique
    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let repos = MemoryRepositories::new(&Database::in_memory());
        repos.users().insert_user(new_user("a@example.com")).await.unwrap();

        let err = repos.users().insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_link_requires_existing_poster() {
        let repos = MemoryRepositories::new(&Database::in_memory());
        assert!(repos.links().insert_link(new_link(Some(1))).await.is_err());

        let link = repos.links().insert_link(new_link(None)).await.unwrap();
        assert_eq!(repos.links().get_link(link.id).await.unwrap(), Some(link));
    }

    // Test critique: un seul vote par couple (user, link)
    #[tokio::test]
    async fn test_second_vote_for_pair_is_rejected() {
        let repos = MemoryRepositories::new(&Database::in_memory());
        let user = repos.users().insert_user(new_user("a@example.com")).await.unwrap();
        let link = repos.links().insert_link(new_link(Some(user.id))).await.unwrap();
        let vote = NewVote {
            user: user.id,
            link: link.id,
        };

        let first = repos.votes().insert_vote(vote).await.unwrap();
        assert_eq!(repos.votes().get_vote(first.id).await.unwrap(), Some(first));
        assert!(matches!(
            repos.votes().insert_vote(vote).await,
            Err(StorageError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_votes_admit_one() {
        let repos = std::sync::Arc::new(MemoryRepositories::new(&Database::in_memory()));
        let user = repos.users().insert_user(new_user("a@example.com")).await.unwrap();
        let link = repos.links().insert_link(new_link(None)).await.unwrap();
        let vote = NewVote {
            user: user.id,
            link: link.id,
        };

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repos = repos.clone();
                tokio::spawn(async move { repos.votes().insert_vote(vote).await.is_ok() })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    #[tokio::test]
    async fn test_scan_returns_one_kind() {
        let repos = MemoryRepositories::new(&Database::in_memory());
        let user = repos.users().insert_user(new_user("a@example.com")).await.unwrap();
        for _ in 0..3 {
            repos.links().insert_link(new_link(None)).await.unwrap();
        }
        repos
            .votes()
            .insert_vote(NewVote { user: user.id, link: 2 })
            .await
            .unwrap();

        let links = repos.records().scan(RecordKind::Link).await.unwrap();
        let votes = repos.records().scan(RecordKind::Vote).await.unwrap();
        assert_eq!(links.iter().map(Record::id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(votes.iter().all(|r| r.kind() == RecordKind::Vote));
        assert_eq!(votes.len(), 1);
    }
}
