//! GraphQL API for the hackernews link board.
//!
//! Exposes the paginated `allLinks` / `allVotes` collections under a
//! `viewer` root, the Relay `node` lookup and the account and submission
//! mutations.
//!
//! # Executing a Request
//!
//! ```ignore
//! use hackernews_graphql::{build_schema, AuthHeader};
//!
//! let schema = build_schema(repositories, Arc::new(Catalog::standard()));
//!
//! let request = async_graphql::Request::new(query)
//!     .data(AuthHeader(Some("Bearer <token>".into())));
//! let response = schema.execute(request).await;
//! ```

pub mod global_id;
mod mutations;
mod schema;
mod types;

pub use mutations::Mutation;
pub use schema::{
    build_schema, schema_builder, LinkOrderBy, PageInfo, Query, VoteOrderBy,
    MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH,
};
pub use types::{AuthHeader, HackernewsSchema};
