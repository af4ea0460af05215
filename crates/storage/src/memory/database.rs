//! In-memory tables, configuration and JSON snapshots.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use hackernews_core::error::{StorageError, StorageResult};
use hackernews_core::models::{
    Link, MAX_DESCRIPTION_LENGTH, MAX_URL_LENGTH, User, Vote, check_length,
};

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot to load at startup and to write on [`Database::save`].
    /// `None` keeps everything in memory only.
    pub snapshot_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(path.into()),
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

/// All rows, keyed by primary key.
#[derive(Debug)]
pub(crate) struct Tables {
    pub users: BTreeMap<i64, User>,
    pub links: BTreeMap<i64, Link>,
    pub votes: BTreeMap<i64, Vote>,
    next_user_id: i64,
    next_link_id: i64,
    next_vote_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            links: BTreeMap::new(),
            votes: BTreeMap::new(),
            next_user_id: 1,
            next_link_id: 1,
            next_vote_id: 1,
        }
    }
}

impl Tables {
    pub fn allocate_user_id(&mut self) -> i64 {
        let id = self.next_user_id;
        self.next_user_id += 1;
        id
    }

    pub fn allocate_link_id(&mut self) -> i64 {
        let id = self.next_link_id;
        self.next_link_id += 1;
        id
    }

    pub fn allocate_vote_id(&mut self) -> i64 {
        let id = self.next_vote_id;
        self.next_vote_id += 1;
        id
    }

    /// Rebuild tables from a snapshot, enforcing the same rules as inserts.
    fn restore(snapshot: Snapshot) -> StorageResult<Self> {
        let mut tables = Self::default();

        let mut emails = BTreeSet::new();
        for user in snapshot.users {
            if !emails.insert(user.email.clone()) {
                return Err(StorageError::ConstraintViolation(format!(
                    "duplicate email {} in snapshot",
                    user.email
                )));
            }
            if tables.users.insert(user.id, user).is_some() {
                return Err(StorageError::ConstraintViolation(
                    "duplicate user id in snapshot".into(),
                ));
            }
        }

        for link in snapshot.links {
            check_length("description", &link.description, MAX_DESCRIPTION_LENGTH)
                .and_then(|()| check_length("url", &link.url, MAX_URL_LENGTH))
                .map_err(|e| {
                    StorageError::ConstraintViolation(format!("link {} in snapshot: {e}", link.id))
                })?;
            if let Some(user) = link.posted_by {
                if !tables.users.contains_key(&user) {
                    return Err(StorageError::ConstraintViolation(format!(
                        "link {} posted by unknown user {user}",
                        link.id
                    )));
                }
            }
            if tables.links.insert(link.id, link).is_some() {
                return Err(StorageError::ConstraintViolation(
                    "duplicate link id in snapshot".into(),
                ));
            }
        }

        let mut pairs = BTreeSet::new();
        for vote in snapshot.votes {
            if !tables.users.contains_key(&vote.user) || !tables.links.contains_key(&vote.link) {
                return Err(StorageError::ConstraintViolation(format!(
                    "vote {} references a missing user or link",
                    vote.id
                )));
            }
            if !pairs.insert((vote.user, vote.link)) {
                return Err(StorageError::ConstraintViolation(format!(
                    "duplicate vote for user {} and link {} in snapshot",
                    vote.user, vote.link
                )));
            }
            if tables.votes.insert(vote.id, vote).is_some() {
                return Err(StorageError::ConstraintViolation(
                    "duplicate vote id in snapshot".into(),
                ));
            }
        }

        tables.next_user_id = next_id(&tables.users);
        tables.next_link_id = next_id(&tables.links);
        tables.next_vote_id = next_id(&tables.votes);

        Ok(tables)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.values().cloned().collect(),
            links: self.links.values().cloned().collect(),
            votes: self.votes.values().cloned().collect(),
        }
    }
}

/// Read and restore a snapshot file. Only a missing file yields empty tables.
async fn load_tables(path: &Path) -> StorageResult<Tables> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Snapshot not found, starting empty");
            return Ok(Tables::default());
        }
        Err(e) => return Err(StorageError::SnapshotIo(format!("{}: {e}", path.display()))),
    };

    debug!(path = %path.display(), "Loading snapshot");
    let snapshot: Snapshot = serde_json::from_slice(&raw)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    Tables::restore(snapshot)
}

fn next_id<T>(rows: &BTreeMap<i64, T>) -> i64 {
    rows.keys().next_back().map_or(1, |max| max + 1)
}

// =============================================================================
// Snapshot
// =============================================================================

/// Persisted layout: `{ "users": [...], "links": [...], "votes": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

/// Row counts, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub users: usize,
    pub links: usize,
    pub votes: usize,
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the in-memory tables.
#[derive(Clone)]
pub struct Database {
    config: StoreConfig,
    tables: Arc<RwLock<Tables>>,
}

impl Database {
    /// An empty, memory-only store.
    pub fn in_memory() -> Self {
        Self {
            config: StoreConfig::default(),
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    /// Open a store, loading the snapshot if the configured file exists.
    #[instrument(skip_all)]
    pub async fn open(config: StoreConfig) -> StorageResult<Self> {
        let tables = match &config.snapshot_path {
            Some(path) => load_tables(path).await?,
            None => Tables::default(),
        };

        let db = Self {
            config,
            tables: Arc::new(RwLock::new(tables)),
        };
        let stats = db.stats().await;
        info!(users = stats.users, links = stats.links, votes = stats.votes, "Store opened");

        Ok(db)
    }

    /// Build a store from an in-memory snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> StorageResult<Self> {
        Ok(Self {
            config: StoreConfig::default(),
            tables: Arc::new(RwLock::new(Tables::restore(snapshot)?)),
        })
    }

    /// Copy of every row.
    pub async fn snapshot(&self) -> Snapshot {
        self.tables.read().await.snapshot()
    }

    /// Write the current rows to the configured snapshot file.
    ///
    /// Does nothing for a memory-only store.
    #[instrument(skip(self))]
    pub async fn save(&self) -> StorageResult<()> {
        let Some(path) = &self.config.snapshot_path else {
            return Ok(());
        };

        let snapshot = self.snapshot().await;
        let raw = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        tokio::fs::write(path, raw)
            .await
            .map_err(|e| StorageError::SnapshotIo(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }

    pub async fn stats(&self) -> TableStats {
        let tables = self.tables.read().await;
        TableStats {
            users: tables.users.len(),
            links: tables.links.len(),
            votes: tables.votes.len(),
        }
    }

    pub(crate) fn tables(&self) -> &Arc<RwLock<Tables>> {
        &self.tables
    }
}
