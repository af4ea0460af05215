//! Link repository implementation for the in-memory store.

use async_trait::async_trait;

use hackernews_core::error::{StorageError, StorageResult};
use hackernews_core::models::{Link, NewLink};
use hackernews_core::ports::LinkRepository;

use super::database::Database;

/// In-memory implementation of LinkRepository.
pub struct MemoryLinkRepository {
    db: Database,
}

impl MemoryLinkRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert_link(&self, link: NewLink) -> StorageResult<Link> {
        let mut tables = self.db.tables().write().await;

        if let Some(user) = link.posted_by {
            if !tables.users.contains_key(&user) {
                return Err(StorageError::ConstraintViolation(format!(
                    "links.posted_by: unknown user {user}"
                )));
            }
        }

        let link = Link {
            id: tables.allocate_link_id(),
            description: link.description,
            url: link.url,
            created_at: link.created_at,
            posted_by: link.posted_by,
        };
        tables.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn get_link(&self, id: i64) -> StorageResult<Option<Link>> {
        Ok(self.db.tables().read().await.links.get(&id).cloned())
    }
}
