//! User repository implementation for the in-memory store.

use async_trait::async_trait;

use hackernews_core::error::{StorageError, StorageResult};
use hackernews_core::models::{NewUser, User};
use hackernews_core::ports::UserRepository;

use super::database::Database;

/// In-memory implementation of UserRepository.
pub struct MemoryUserRepository {
    db: Database,
}

impl MemoryUserRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.db.tables().write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::ConstraintViolation(format!(
                "users.email: {}",
                user.email
            )));
        }

        let user = User {
            id: tables.allocate_user_id(),
            name: user.name,
            password: user.password,
            email: user.email,
            token: user.token,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.db.tables().read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let tables = self.db.tables().read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_token(&self, token: &str) -> StorageResult<Option<User>> {
        let tables = self.db.tables().read().await;
        Ok(tables.users.values().find(|u| u.token == token).cloned())
    }
}
