//! Core domain layer for the hackernews link board.
//!
//! This crate contains the domain models, port traits (interfaces), the
//! collection query engine and the business services. It is the innermost
//! layer and has no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    hackernews (binary)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    hackernews-graphql                       │
//! │                         (API)                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    hackernews-storage                       │
//! │                 (in-memory, JSON snapshot)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   hackernews-core  ← YOU ARE HERE           │
//! │            (models, ports, query, services)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain models (User, Link, Vote, Record)
//! - [`ports`] - Interface traits for adapters to implement
//! - [`query`] - Ordering, filtering, cursors and page slicing
//! - [`services`] - Collection resolver, accounts and submissions
//! - [`error`] - Domain error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Key Concepts
//!
//! ## Connections
//!
//! A connection is one page of a collection. The resolver scans a kind,
//! keeps the records matching every filter clause, sorts them by the
//! requested order key (ties broken by ascending id), skips everything up
//! to the `after` cursor and takes `first` records.
//!
//! ## Cursors
//!
//! A cursor encodes the position of a record in its order: the sort value
//! and the id. It does not depend on row offsets, so pages stay stable when
//! records are inserted before the boundary.
//!
//! ## Catalog
//!
//! Order keys and filter rules are registered per kind in a
//! [`query::Catalog`], built once at startup and shared.

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod query;
pub mod services;

#[cfg(test)]
mod testing;
