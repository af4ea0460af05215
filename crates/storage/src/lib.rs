//! Storage layer for the hackernews backend.
//!
//! This crate provides an in-memory implementation of the repository traits
//! defined in `hackernews-core`, with optional JSON snapshot persistence.
//!
//! # Architecture
//!
//! The storage layer follows the repository pattern:
//!
//! - [`memory::Database`] - Shared tables and snapshot handling
//! - [`memory::MemoryRepositories`] - Composite repository for all record types
//! - Individual repositories for users, links and votes
//!
//! # Usage
//!
//! ```ignore
//! use hackernews_storage::{Database, MemoryRepositories, StoreConfig};
//!
//! // Load the snapshot, if any
//! let db = Database::open(StoreConfig::with_snapshot("store.json")).await?;
//!
//! // Create repositories
//! let repositories = Arc::new(MemoryRepositories::new(&db));
//!
//! // Persist changes
//! db.save().await?;
//! ```

pub mod memory;

pub use memory::{Database, MemoryRepositories, Snapshot, StoreConfig, TableStats};
