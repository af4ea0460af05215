//! Collection resolver - filtered, ordered, cursor-paginated pages and counts.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::DomainResult;
use crate::metrics::{
    ResolveTimer, record_connection_resolved, record_count_resolved, record_cursor_rejected,
    record_order_key_rejected,
};
use crate::models::{Record, RecordKind};
use crate::ports::{Connection, Pagination, Repositories};
use crate::query::{Catalog, Position, RecordFilter, cursor, filter, paginate};

// =============================================================================
// Requests
// =============================================================================

/// A page of a collection.
#[derive(Debug, Clone)]
pub struct ConnectionRequest {
    pub kind: RecordKind,
    pub filter: RecordFilter,
    /// Order key name such as `createdAt_DESC`; `None` orders by ascending id.
    pub order: Option<String>,
    pub pagination: Pagination,
}

/// The filtered size of a collection.
#[derive(Debug, Clone)]
pub struct CountRequest {
    pub kind: RecordKind,
    pub filter: RecordFilter,
}

/// Every request the resolver answers.
#[derive(Debug, Clone)]
pub enum CollectionRequest {
    Connection(ConnectionRequest),
    Count(CountRequest),
}

/// Answer to a [`CollectionRequest`].
#[derive(Debug, Clone)]
pub enum CollectionResponse {
    Page(Connection<Record>),
    Count(u64),
}

// =============================================================================
// CollectionService
// =============================================================================

/// Resolves connections and counts over the record store.
///
/// Stateless between calls: each request scans one snapshot of its kind,
/// filters it, orders it and slices it.
#[derive(Clone)]
pub struct CollectionService {
    repositories: Arc<dyn Repositories>,
    catalog: Arc<Catalog>,
}

impl CollectionService {
    pub fn new(repositories: Arc<dyn Repositories>, catalog: Arc<Catalog>) -> Self {
        Self {
            repositories,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Dispatch a request to the matching operation.
    pub async fn execute(&self, request: CollectionRequest) -> DomainResult<CollectionResponse> {
        match request {
            CollectionRequest::Connection(request) => {
                self.resolve_connection(request).await.map(CollectionResponse::Page)
            }
            CollectionRequest::Count(request) => {
                self.resolve_count(request).await.map(CollectionResponse::Count)
            }
        }
    }

    /// Resolve one page.
    ///
    /// The order key and the `after` cursor are validated before the store
    /// is read; either failing rejects the whole request.
    #[instrument(skip_all, fields(kind = %request.kind, order = ?request.order))]
    pub async fn resolve_connection(
        &self,
        request: ConnectionRequest,
    ) -> DomainResult<Connection<Record>> {
        let kind = request.kind;
        let _timer = ResolveTimer::new(kind);

        let order_spec = self
            .catalog
            .order(kind, request.order.as_deref())
            .inspect_err(|e| {
                record_order_key_rejected(kind);
                warn!(error = %e, "Rejected order key");
            })?;

        let after = request
            .pagination
            .after
            .as_ref()
            .map(|c| -> DomainResult<Position> {
                let position = cursor::decode(c)?;
                order_spec.check(&position)?;
                Ok(position)
            })
            .transpose()
            .inspect_err(|e| {
                record_cursor_rejected(kind);
                warn!(error = %e, "Rejected cursor");
            })?;

        let records = self.repositories.records().scan(kind).await?;
        let scanned = records.len();
        let records = filter::apply(records, &request.filter, self.catalog.filters(kind));

        let page = paginate(records, &order_spec, after.as_ref(), request.pagination.first)?;

        record_connection_resolved(kind, page.edges.len());
        debug!(
            scanned,
            edges = page.edges.len(),
            has_next = page.page_info.has_next_page,
            "Connection resolved"
        );

        Ok(page)
    }

    /// Count the records matching a filter, independent of any page.
    #[instrument(skip_all, fields(kind = %request.kind))]
    pub async fn resolve_count(&self, request: CountRequest) -> DomainResult<u64> {
        let records = self.repositories.records().scan(request.kind).await?;
        let filters = self.catalog.filters(request.kind);
        let count = filter::apply(records, &request.filter, filters).len() as u64;

        record_count_resolved(request.kind);
        debug!(count, "Count resolved");

        Ok(count)
    }
}
