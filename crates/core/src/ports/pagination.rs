//! Pagination types for list queries.
//!
//! These types implement Relay-style forward cursor pagination, commonly
//! used with GraphQL but also applicable to other APIs.

/// Opaque cursor for pagination.
///
/// The cursor value is produced by [`crate::query::cursor::encode`] and
/// should be treated as an opaque token by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Pagination parameters for list queries (forward pagination only).
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    /// Maximum number of items to return. `None` returns everything remaining.
    pub first: Option<usize>,
    /// Cursor to start after.
    pub after: Option<Cursor>,
}

/// Paginated result set with edges and page info.
///
/// This is the Relay connection pattern for cursor-based pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<T> {
    /// List of edges (node + cursor pairs).
    pub edges: Vec<Edge<T>>,
    /// Information about the current page.
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// An empty page with the given `has_next_page` flag.
    pub fn empty(has_next_page: bool, has_previous_page: bool) -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo {
                has_next_page,
                has_previous_page,
                start_cursor: None,
                end_cursor: None,
            },
        }
    }

    /// Convert every node, dropping the ones `f` rejects.
    pub fn filter_map_nodes<U>(self, mut f: impl FnMut(T) -> Option<U>) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .filter_map(|edge| {
                    f(edge.node).map(|node| Edge {
                        node,
                        cursor: edge.cursor,
                    })
                })
                .collect(),
            page_info: self.page_info,
        }
    }
}

/// A single item in a paginated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    /// The actual item.
    pub node: T,
    /// Cursor for this item (used for pagination).
    pub cursor: Cursor,
}

/// Information about the current page in a paginated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether `after` was supplied and skipped over at least one item.
    pub has_previous_page: bool,
    /// Cursor of the first item in this page.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last item in this page.
    pub end_cursor: Option<Cursor>,
}

/// Ordering direction for sorted queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}
