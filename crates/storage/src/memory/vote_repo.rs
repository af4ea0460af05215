//! Vote repository implementation for the in-memory store.

use async_trait::async_trait;

use hackernews_core::error::{StorageError, StorageResult};
use hackernews_core::models::{NewVote, Vote};
use hackernews_core::ports::VoteRepository;

use super::database::Database;

/// In-memory implementation of VoteRepository.
///
/// The (user, link) uniqueness check and the insert happen under one write
/// lock, so two concurrent votes for the same pair cannot both succeed.
pub struct MemoryVoteRepository {
    db: Database,
}

impl MemoryVoteRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl VoteRepository for MemoryVoteRepository {
    async fn insert_vote(&self, vote: NewVote) -> StorageResult<Vote> {
        let mut tables = self.db.tables().write().await;

        if !tables.users.contains_key(&vote.user) {
            return Err(StorageError::ConstraintViolation(format!(
                "votes.user: unknown user {}",
                vote.user
            )));
        }
        if !tables.links.contains_key(&vote.link) {
            return Err(StorageError::ConstraintViolation(format!(
                "votes.link: unknown link {}",
                vote.link
            )));
        }
        if tables
            .votes
            .values()
            .any(|v| v.user == vote.user && v.link == vote.link)
        {
            return Err(StorageError::ConstraintViolation(format!(
                "votes.user_link: {}/{}",
                vote.user, vote.link
            )));
        }

        let vote = Vote {
            id: tables.allocate_vote_id(),
            user: vote.user,
            link: vote.link,
        };
        tables.votes.insert(vote.id, vote.clone());

        Ok(vote)
    }

    async fn get_vote(&self, id: i64) -> StorageResult<Option<Vote>> {
        Ok(self.db.tables().read().await.votes.get(&id).cloned())
    }
}
