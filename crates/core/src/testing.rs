//! Hand-written repository double for service tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::models::{Link, NewLink, NewUser, NewVote, Record, RecordKind, User, Vote};
use crate::ports::{LinkRepository, RecordStore, Repositories, UserRepository, VoteRepository};

#[derive(Default)]
pub struct MockRepositories {
    pub users: Mutex<Vec<User>>,
    pub links: Mutex<Vec<Link>>,
    pub votes: Mutex<Vec<Vote>>,
    /// Number of `scan` calls served.
    pub scans: Mutex<usize>,
}

impl MockRepositories {
    pub fn with_links(links: Vec<Link>) -> Self {
        Self {
            links: Mutex::new(links),
            ..Default::default()
        }
    }

    pub fn with_votes(votes: Vec<Vote>) -> Self {
        Self {
            votes: Mutex::new(votes),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RecordStore for MockRepositories {
    async fn scan(&self, kind: RecordKind) -> StorageResult<Vec<Record>> {
        *self.scans.lock().unwrap() += 1;
        Ok(match kind {
            RecordKind::Link => {
                self.links.lock().unwrap().iter().cloned().map(Record::Link).collect()
            }
            RecordKind::Vote => {
                self.votes.lock().unwrap().iter().cloned().map(Record::Vote).collect()
            }
        })
    }
}

#[async_trait]
impl UserRepository for MockRepositories {
    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::ConstraintViolation("users.email".into()));
        }
        let user = User {
            id: users.len() as i64 + 1,
            name: user.name,
            password: user.password,
            email: user.email,
            token: user.token,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_token(&self, token: &str) -> StorageResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.token == token).cloned())
    }
}

#[async_trait]
impl LinkRepository for MockRepositories {
    async fn insert_link(&self, link: NewLink) -> StorageResult<Link> {
        let mut links = self.links.lock().unwrap();
        let link = Link {
            id: links.len() as i64 + 1,
            description: link.description,
            url: link.url,
            created_at: link.created_at,
            posted_by: link.posted_by,
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn get_link(&self, id: i64) -> StorageResult<Option<Link>> {
        Ok(self.links.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }
}

#[async_trait]
impl VoteRepository for MockRepositories {
    async fn insert_vote(&self, vote: NewVote) -> StorageResult<Vote> {
        let mut votes = self.votes.lock().unwrap();
        if votes.iter().any(|v| v.user == vote.user && v.link == vote.link) {
            return Err(StorageError::ConstraintViolation("votes.user_link".into()));
        }
        let vote = Vote {
            id: votes.len() as i64 + 1,
            user: vote.user,
            link: vote.link,
        };
        votes.push(vote.clone());
        Ok(vote)
    }

    async fn get_vote(&self, id: i64) -> StorageResult<Option<Vote>> {
        Ok(self.votes.lock().unwrap().iter().find(|v| v.id == id).cloned())
    }
}

impl Repositories for MockRepositories {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn links(&self) -> &dyn LinkRepository {
        self
    }

    fn votes(&self) -> &dyn VoteRepository {
        self
    }

    fn records(&self) -> &dyn RecordStore {
        self
    }
}
