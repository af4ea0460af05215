//! The paginated collection query engine.
//!
//! Pure functions over in-memory records, no I/O:
//!
//! - [`order`] - Order specifications and the total order they induce
//! - [`cursor`] - Opaque cursor codec for `(sort value, id)` positions
//! - [`filter`] - Equality filters over foreign keys
//! - [`page`] - Slicing an ordered sequence into a Relay page
//! - [`catalog`] - Which order keys and filters each collection supports

pub mod catalog;
pub mod cursor;
pub mod filter;
pub mod order;
pub mod page;

pub use catalog::{Catalog, CollectionRules};
pub use filter::{FilterRule, RecordFilter};
pub use order::{OrderField, OrderSpec, Position, SortValue};
pub use page::paginate;
