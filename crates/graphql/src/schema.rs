//! GraphQL schema definition.
//!
//! This module provides the query side of the schema: the `viewer` root
//! with its paginated collections, the Relay `node` lookup and the object
//! types for links, votes and users.

use std::sync::Arc;

use async_graphql::{
    ComplexObject, Context, EmptySubscription, Enum, InputObject, Interface, Object, Result,
    Schema, SchemaBuilder, SimpleObject, ID,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use hackernews_core::error::{DomainError, StorageError};
use hackernews_core::models::{self, Record, RecordKind, check_length};
use hackernews_core::ports::{Connection, Cursor, Pagination, Repositories};
use hackernews_core::query::{Catalog, RecordFilter};
use hackernews_core::services::{
    AccountService, CollectionService, ConnectionRequest, CountRequest, SubmissionService,
};

use crate::global_id;
use crate::mutations::Mutation;
use crate::types::HackernewsSchema;

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
pub const MAX_QUERY_COMPLEXITY: usize = 500;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the schema with depth and complexity limits.
pub fn build_schema<R: Repositories + 'static>(
    repositories: Arc<R>,
    catalog: Arc<Catalog>,
) -> HackernewsSchema {
    schema_builder(repositories, catalog)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

/// Create a schema builder with the services registered as data.
///
/// Remember to call `.limit_depth()` and `.limit_complexity()` before `.finish()`.
pub fn schema_builder<R: Repositories + 'static>(
    repositories: Arc<R>,
    catalog: Arc<Catalog>,
) -> SchemaBuilder<Query, Mutation, EmptySubscription> {
    let repos: Arc<dyn Repositories> = repositories;
    Schema::build(Query, Mutation, EmptySubscription)
        .data(CollectionService::new(repos.clone(), catalog))
        .data(AccountService::new(repos.clone()))
        .data(SubmissionService::new(repos.clone()))
        .data(repos)
}

// -----------------------------------------------------------------------------
// Query Root
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct Query;

#[Object]
impl Query {
    /// Entry point to the top-level collections.
    async fn viewer(&self) -> Viewer {
        Viewer
    }

    /// Fetch the viewer or any link, vote or user by its global id.
    async fn node<'ctx>(&self, ctx: &Context<'ctx>, id: ID) -> Result<Option<Node>> {
        let id = global_id::decode(&id)?;
        let repos = ctx.data::<Arc<dyn Repositories>>()?;

        let node = match id.type_name.as_str() {
            "Link" => repos.links().get_link(id.pk).await?.map(|l| Node::Link(Link(l))),
            "Vote" => repos.votes().get_vote(id.pk).await?.map(|v| Node::Vote(Vote(v))),
            "User" => repos.users().get_user(id.pk).await?.map(|u| Node::User(User(u))),
            VIEWER_TYPE if id.pk == VIEWER_PK => Some(Node::Viewer(Viewer)),
            other => {
                debug!(type_name = other, pk = id.pk, "No node for global id");
                None
            }
        };
        Ok(node)
    }
}

const VIEWER_TYPE: &str = "Viewer";

/// The viewer is a singleton; its global id is always `Viewer:0`.
const VIEWER_PK: i64 = 0;

/// Namespace for the top-level collections.
pub struct Viewer;

#[Object]
impl Viewer {
    async fn id(&self) -> ID {
        ID(global_id::encode(VIEWER_TYPE, VIEWER_PK))
    }

    /// Every link, ordered and optionally filtered by poster.
    async fn all_links<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        order_by: Option<LinkOrderBy>,
        filter: Option<LinkFilter>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<LinkConnection> {
        let mut records = RecordFilter::new();
        if let Some(filter) = filter {
            insert_id_clause(&mut records, "postedBy", filter.posted_by)?;
        }

        let order = order_by.map(LinkOrderBy::key);
        let page = resolve_page(ctx, RecordKind::Link, records.clone(), order, first, after).await?;
        Ok(LinkConnection::new(page, records))
    }

    /// Every vote, optionally filtered by link and user.
    async fn all_votes<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        order_by: Option<VoteOrderBy>,
        filter: Option<VoteFilter>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<VoteConnection> {
        let mut records = RecordFilter::new();
        if let Some(filter) = filter {
            insert_id_clause(&mut records, "link", filter.link)?;
            insert_id_clause(&mut records, "user", filter.user)?;
        }

        let order = order_by.map(VoteOrderBy::key);
        let page = resolve_page(ctx, RecordKind::Vote, records.clone(), order, first, after).await?;
        Ok(VoteConnection::new(page, records))
    }
}

async fn resolve_page(
    ctx: &Context<'_>,
    kind: RecordKind,
    filter: RecordFilter,
    order: Option<&'static str>,
    first: Option<i32>,
    after: Option<String>,
) -> Result<Connection<Record>> {
    let collection = ctx.data::<CollectionService>()?;

    let request = ConnectionRequest {
        kind,
        filter,
        order: order.map(str::to_string),
        pagination: Pagination {
            first: validate_pagination_first(first)?,
            after: after.map(Cursor::new),
        },
    };

    Ok(collection.resolve_connection(request).await?)
}

// -----------------------------------------------------------------------------
// Ordering & Filters
// -----------------------------------------------------------------------------

/// Sort orders for links.
#[derive(Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOrderBy {
    #[graphql(name = "createdAt_ASC")]
    CreatedAtAsc,
    #[graphql(name = "createdAt_DESC")]
    CreatedAtDesc,
    #[graphql(name = "description_ASC")]
    DescriptionAsc,
    #[graphql(name = "description_DESC")]
    DescriptionDesc,
    #[graphql(name = "id_ASC")]
    IdAsc,
    #[graphql(name = "id_DESC")]
    IdDesc,
    #[graphql(name = "url_ASC")]
    UrlAsc,
    #[graphql(name = "url_DESC")]
    UrlDesc,
}

impl LinkOrderBy {
    /// Catalog key for this enumerant.
    pub fn key(self) -> &'static str {
        match self {
            Self::CreatedAtAsc => "createdAt_ASC",
            Self::CreatedAtDesc => "createdAt_DESC",
            Self::DescriptionAsc => "description_ASC",
            Self::DescriptionDesc => "description_DESC",
            Self::IdAsc => "id_ASC",
            Self::IdDesc => "id_DESC",
            Self::UrlAsc => "url_ASC",
            Self::UrlDesc => "url_DESC",
        }
    }
}

/// Sort orders for votes.
#[derive(Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOrderBy {
    #[graphql(name = "id_ASC")]
    IdAsc,
    #[graphql(name = "id_DESC")]
    IdDesc,
}

impl VoteOrderBy {
    pub fn key(self) -> &'static str {
        match self {
            Self::IdAsc => "id_ASC",
            Self::IdDesc => "id_DESC",
        }
    }
}

/// Reference to a record by global id.
#[derive(InputObject)]
pub struct IdInput {
    pub id: ID,
}

#[derive(InputObject)]
pub struct LinkFilter {
    pub posted_by: Option<IdInput>,
}

#[derive(InputObject)]
pub struct VoteFilter {
    pub link: Option<IdInput>,
    pub user: Option<IdInput>,
}

/// Add a clause for a referenced id. The id's type name is not checked.
fn insert_id_clause(filter: &mut RecordFilter, field: &str, input: Option<IdInput>) -> Result<()> {
    if let Some(input) = input {
        filter.insert(field, global_id::decode(&input.id)?.pk);
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// GraphQL Types
// -----------------------------------------------------------------------------

/// Anything addressable by a global id.
#[derive(Interface)]
#[graphql(field(name = "id", ty = "ID"))]
pub enum Node {
    Viewer(Viewer),
    Link(Link),
    Vote(Vote),
    User(User),
}

/// A registered user. Password and token are never exposed.
pub struct User(pub models::User);

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(global_id::encode("User", self.0.id))
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }
}

/// A shared link.
pub struct Link(pub models::Link);

#[Object]
impl Link {
    async fn id(&self) -> ID {
        ID(global_id::encode("Link", self.0.id))
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn url(&self) -> &str {
        &self.0.url
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn posted_by<'ctx>(&self, ctx: &Context<'ctx>) -> Result<Option<User>> {
        let Some(id) = self.0.posted_by else {
            return Ok(None);
        };
        let repos = ctx.data::<Arc<dyn Repositories>>()?;
        Ok(repos.users().get_user(id).await?.map(User))
    }

    /// Votes cast for this link.
    async fn votes<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<VoteConnection> {
        let filter = RecordFilter::new().with("link", self.0.id);
        let page = resolve_page(ctx, RecordKind::Vote, filter.clone(), None, first, after).await?;
        Ok(VoteConnection::new(page, filter))
    }
}

/// A user's vote for a link.
pub struct Vote(pub models::Vote);

#[Object]
impl Vote {
    async fn id(&self) -> ID {
        ID(global_id::encode("Vote", self.0.id))
    }

    async fn user<'ctx>(&self, ctx: &Context<'ctx>) -> Result<User> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;
        let user = repos
            .users()
            .get_user(self.0.user)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", self.0.user)))?;
        Ok(User(user))
    }

    async fn link<'ctx>(&self, ctx: &Context<'ctx>) -> Result<Link> {
        let repos = ctx.data::<Arc<dyn Repositories>>()?;
        let link = repos
            .links()
            .get_link(self.0.link)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("link {}", self.0.link)))?;
        Ok(Link(link))
    }
}

// -----------------------------------------------------------------------------
// Connection Types (Relay-style pagination)
// -----------------------------------------------------------------------------

#[derive(SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl From<hackernews_core::ports::PageInfo> for PageInfo {
    fn from(info: hackernews_core::ports::PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor.map(|c| c.value),
            end_cursor: info.end_cursor.map(|c| c.value),
        }
    }
}

/// Generate Relay-style connection types (Edge + Connection) over core records.
///
/// The connection keeps the filter that produced it so derived fields can
/// be resolved against the same collection.
macro_rules! define_connection {
    ($(#[$attr:meta])* $node:ident, $edge:ident, $connection:ident, $into:expr) => {
        #[derive(SimpleObject)]
        pub struct $edge {
            pub node: $node,
            pub cursor: String,
        }

        #[derive(SimpleObject)]
        $(#[$attr])*
        pub struct $connection {
            pub edges: Vec<$edge>,
            pub page_info: PageInfo,
            #[graphql(skip)]
            pub filter: RecordFilter,
        }

        impl $connection {
            pub fn new(conn: Connection<Record>, filter: RecordFilter) -> Self {
                let conn = conn.filter_map_nodes($into);
                Self {
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge {
                            node: e.node,
                            cursor: e.cursor.value,
                        })
                        .collect(),
                    page_info: PageInfo::from(conn.page_info),
                    filter,
                }
            }
        }
    };
}

define_connection!(Link, LinkEdge, LinkConnection, |r: Record| r.into_link().map(Link));
define_connection!(
    #[graphql(complex)]
    Vote,
    VoteEdge,
    VoteConnection,
    |r: Record| r.into_vote().map(Vote)
);

#[ComplexObject]
impl VoteConnection {
    /// Number of votes matching the filter, whatever the page.
    async fn count<'ctx>(&self, ctx: &Context<'ctx>) -> Result<i64> {
        let collection = ctx.data::<CollectionService>()?;
        let count = collection
            .resolve_count(CountRequest {
                kind: RecordKind::Vote,
                filter: self.filter.clone(),
            })
            .await?;
        Ok(i64::try_from(count)?)
    }
}

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

/// Validate the `first` argument. Absent means no limit.
pub(crate) fn validate_pagination_first(first: Option<i32>) -> Result<Option<usize>> {
    match first {
        None => Ok(None),
        Some(n) if n < 0 => {
            Err(DomainError::Validation("first must be non-negative".into()).into())
        }
        Some(n) => Ok(Some(n as usize)),
    }
}

/// Validate a required string input.
pub(crate) fn validate_string(value: &str, field_name: &str, max_length: usize) -> Result<()> {
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field_name} cannot be empty")).into());
    }
    Ok(check_length(field_name, value, max_length)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Request, Variables};
    use chrono::TimeZone;
    use hackernews_storage::{Database, MemoryRepositories, Snapshot};
    use serde_json::{Value, json};

    use crate::AuthHeader;

    fn seeded() -> HackernewsSchema {
        let links = [
            ("a.com", "C", 1_000_000_000),
            ("b.com", "B", 1_000_000_400),
            ("c.com", "A", 1_000_000_200),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (url, description, secs))| models::Link {
            id: i as i64 + 1,
            description: description.into(),
            url: url.into(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            posted_by: Some(1),
        })
        .collect();
        let users = (1..=2)
            .map(|id| models::User {
                id,
                name: format!("user{id}"),
                password: "pw".into(),
                email: format!("user{id}@example.com"),
                token: format!("{id:064x}"),
            })
            .collect();
        let votes = [(1, 1, 1), (2, 2, 1), (3, 1, 2)]
            .into_iter()
            .map(|(id, user, link)| models::Vote { id, user, link })
            .collect();

        let db = Database::from_snapshot(Snapshot { users, links, votes }).unwrap();
        build_schema(Arc::new(MemoryRepositories::new(&db)), Arc::new(Catalog::standard()))
    }

    async fn run(schema: &HackernewsSchema, request: impl Into<Request>) -> Value {
        let response = schema.execute(request).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    async fn error(schema: &HackernewsSchema, request: impl Into<Request>) -> String {
        let response = schema.execute(request).await;
        assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
        response.errors[0].message.clone()
    }

    fn urls(data: &Value) -> Vec<&str> {
        data["viewer"]["allLinks"]["edges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["node"]["url"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_all_links_ordering() {
        let schema = seeded();

        let query = |order: &str| {
            format!(
                "{{ viewer {{ allLinks(orderBy: {order}) {{ edges {{ node {{ url }} }} }} }} }}"
            )
        };

        let data = run(&schema, query("createdAt_DESC").as_str()).await;
        assert_eq!(urls(&data), ["b.com", "c.com", "a.com"]);

        let data = run(&schema, query("description_ASC").as_str()).await;
        assert_eq!(urls(&data), ["c.com", "b.com", "a.com"]);
    }

    // Test critique: pagination en deux pages via endCursor
    #[tokio::test]
    async fn test_all_links_pages_with_end_cursor() {
        let schema = seeded();
        let query = "query($after: String, $first: Int) {
            viewer { allLinks(orderBy: url_ASC, first: $first, after: $after) {
                edges { node { url } }
                pageInfo { hasNextPage hasPreviousPage endCursor }
            } }
        }";

        let vars = json!({ "first": 2 });
        let first = run(&schema, Request::new(query).variables(Variables::from_json(vars))).await;
        assert_eq!(urls(&first), ["a.com", "b.com"]);
        let info = &first["viewer"]["allLinks"]["pageInfo"];
        assert_eq!(info["hasNextPage"], json!(true));
        assert_eq!(info["hasPreviousPage"], json!(false));

        let vars = json!({ "first": 1, "after": info["endCursor"] });
        let second = run(&schema, Request::new(query).variables(Variables::from_json(vars))).await;
        assert_eq!(urls(&second), ["c.com"]);
        assert_eq!(second["viewer"]["allLinks"]["pageInfo"]["hasNextPage"], json!(false));
    }

    #[tokio::test]
    async fn test_corrupted_cursor_is_an_error() {
        let schema = seeded();
        let query = r#"{ viewer { allLinks(after: "not-a-cursor") { edges { cursor } } } }"#;
        let message = error(&schema, query).await;
        assert!(message.starts_with("Invalid cursor"), "{message}");
    }

    #[tokio::test]
    async fn test_negative_first_is_rejected() {
        let schema = seeded();
        let query = "{ viewer { allLinks(first: -1) { edges { cursor } } } }";
        let message = error(&schema, query).await;
        assert_eq!(message, "Validation error: first must be non-negative");
    }

    // Test critique: count = intersection des filtres, même avec first: 0
    #[tokio::test]
    async fn test_vote_count_ignores_page() {
        let schema = seeded();
        let query = format!(
            r#"{{ viewer {{ allVotes(
                first: 0, filter: {{ link: {{ id: "{}" }}, user: {{ id: "{}" }} }}
            ) {{
                count edges {{ cursor }} pageInfo {{ hasNextPage }}
            }} }} }}"#,
            global_id::encode("Link", 1),
            global_id::encode("User", 1),
        );

        let data = run(&schema, query.as_str()).await;
        let votes = &data["viewer"]["allVotes"];
        assert_eq!(votes["count"], json!(1));
        assert_eq!(votes["edges"], json!([]));
        assert_eq!(votes["pageInfo"]["hasNextPage"], json!(true));
    }

    #[tokio::test]
    async fn test_link_votes_and_node_lookup() {
        let schema = seeded();
        let query = r#"{ node(id: "TGluazox") { id ... on Link {
            url postedBy { name } votes { count edges { node { user { email } } } }
        } } }"#;

        let data = run(&schema, query).await;
        let node = &data["node"];
        assert_eq!(node["id"], json!("TGluazox"));
        assert_eq!(node["postedBy"]["name"], json!("user1"));
        assert_eq!(node["votes"]["count"], json!(2));
        assert_eq!(node["votes"]["edges"][1]["node"]["user"]["email"], json!("user2@example.com"));
    }

    #[tokio::test]
    async fn test_node_for_missing_record_is_null() {
        let schema = seeded();
        let query = format!(r#"{{ node(id: "{}") {{ id }} }}"#, global_id::encode("User", 99));
        assert_eq!(run(&schema, query.as_str()).await, json!({ "node": null }));

        let message = error(&schema, r#"{ node(id: "garbage!") { id } }"#).await;
        assert!(message.starts_with("Invalid global id"));
    }

    #[tokio::test]
    async fn test_viewer_is_a_node() {
        let schema = seeded();
        let viewer_id = global_id::encode("Viewer", 0);

        let data = run(&schema, "{ viewer { id } }").await;
        assert_eq!(data["viewer"]["id"], json!(viewer_id));

        let query = format!(
            r#"{{ node(id: "{viewer_id}") {{ id ... on Viewer {{ allLinks(first: 1) {{
                edges {{ node {{ url }} }}
            }} }} }} }}"#
        );
        let data = run(&schema, query.as_str()).await;
        assert_eq!(data["node"]["id"], json!(viewer_id));
        assert_eq!(data["node"]["allLinks"]["edges"][0]["node"]["url"], json!("a.com"));

        let other = format!(r#"{{ node(id: "{}") {{ id }} }}"#, global_id::encode("Viewer", 1));
        assert_eq!(run(&schema, other.as_str()).await, json!({ "node": null }));
    }

    #[tokio::test]
    async fn test_unknown_token_fails_mutations() {
        let schema = seeded();
        let mutation = r#"mutation {
            createLink(input: { description: "d", url: "https://x.com" }) { link { id } }
        }"#;
        let request = Request::new(mutation).data(AuthHeader(Some("Bearer nobody".into())));
        let message = error(&schema, request).await;
        assert_eq!(message, "User not found for the supplied token");
    }

    #[test]
    fn test_validation_helpers() {
        // Négatif = erreur, pas de plafond
        assert!(validate_pagination_first(Some(-1)).is_err());
        assert_eq!(validate_pagination_first(Some(10_000)).unwrap(), Some(10_000));
        assert_eq!(validate_pagination_first(None).unwrap(), None);

        assert!(validate_string("", "name", 10).is_err());
        let err = validate_string(&"x".repeat(11), "name", 10).unwrap_err();
        assert_eq!(err.message, "Validation error: name too long: maximum 10 characters allowed");
        assert!(validate_string("ok", "name", 10).is_ok());
    }

    #[test]
    fn test_order_enums_match_catalog() {
        let catalog = Catalog::standard();
        let keys = [LinkOrderBy::CreatedAtDesc, LinkOrderBy::UrlAsc, LinkOrderBy::IdDesc];
        for key in keys.map(LinkOrderBy::key) {
            assert!(catalog.order(RecordKind::Link, Some(key)).is_ok());
        }
        assert!(catalog.order(RecordKind::Vote, Some(VoteOrderBy::IdDesc.key())).is_ok());
    }
}
