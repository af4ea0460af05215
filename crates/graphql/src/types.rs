//! GraphQL type definitions.

use async_graphql::{EmptySubscription, Schema};

use crate::mutations::Mutation;
use crate::schema::Query;

/// The complete GraphQL schema type.
pub type HackernewsSchema = Schema<Query, Mutation, EmptySubscription>;

/// Raw `Authorization` header value of the current request.
///
/// Attach it with `Request::data`; a request without it is anonymous.
#[derive(Debug, Clone, Default)]
pub struct AuthHeader(pub Option<String>);
