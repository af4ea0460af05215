//! Per-collection order keys and filter rules.
//!
//! The catalog is built once at startup and shared by reference; nothing
//! is registered globally.

use crate::error::{DomainError, DomainResult};
use crate::models::{Record, RecordKind};
use crate::ports::OrderDirection;

use super::filter::FilterRule;
use super::order::{OrderField, OrderSpec};

/// Order keys and filter rules of one collection.
#[derive(Debug, Clone)]
pub struct CollectionRules {
    orders: Vec<(&'static str, OrderSpec)>,
    default_order: OrderSpec,
    filters: Vec<FilterRule>,
}

impl CollectionRules {
    /// Rules ordered by ascending id when no key is given.
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            default_order: OrderSpec::new(OrderField::Id, OrderDirection::Asc),
            filters: Vec::new(),
        }
    }

    /// Register `<field>_ASC` and `<field>_DESC` under their literal names.
    pub fn order_by(mut self, asc: &'static str, desc: &'static str, field: OrderField) -> Self {
        self.orders.push((asc, OrderSpec::new(field, OrderDirection::Asc)));
        self.orders.push((desc, OrderSpec::new(field, OrderDirection::Desc)));
        self
    }

    pub fn filter(mut self, name: &'static str, key: fn(&Record) -> Option<i64>) -> Self {
        self.filters.push(FilterRule { name, key });
        self
    }

    /// Resolve an order key; `None` selects the default order.
    pub fn order(&self, key: Option<&str>) -> DomainResult<OrderSpec> {
        let Some(key) = key else {
            return Ok(self.default_order);
        };
        self.orders
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, order_spec)| *order_spec)
            .ok_or_else(|| DomainError::UnknownOrderKey(key.to_string()))
    }

    /// Every registered order key name.
    pub fn order_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.orders.iter().map(|(name, _)| *name)
    }

    pub fn filters(&self) -> &[FilterRule] {
        &self.filters
    }
}

impl Default for CollectionRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules for every paginated kind.
#[derive(Debug, Clone)]
pub struct Catalog {
    links: CollectionRules,
    votes: CollectionRules,
}

impl Catalog {
    pub fn new(links: CollectionRules, votes: CollectionRules) -> Self {
        Self { links, votes }
    }

    /// The link board's collections.
    ///
    /// Links order by `createdAt`, `description`, `id` and `url` and filter
    /// by `postedBy`. Votes order by `id` and filter by `link` and `user`.
    pub fn standard() -> Self {
        let links = CollectionRules::new()
            .order_by("createdAt_ASC", "createdAt_DESC", OrderField::CreatedAt)
            .order_by("description_ASC", "description_DESC", OrderField::Description)
            .order_by("id_ASC", "id_DESC", OrderField::Id)
            .order_by("url_ASC", "url_DESC", OrderField::Url)
            .filter("postedBy", link_posted_by);

        let votes = CollectionRules::new()
            .order_by("id_ASC", "id_DESC", OrderField::Id)
            .filter("link", vote_link)
            .filter("user", vote_user);

        Self::new(links, votes)
    }

    pub fn rules(&self, kind: RecordKind) -> &CollectionRules {
        match kind {
            RecordKind::Link => &self.links,
            RecordKind::Vote => &self.votes,
        }
    }

    /// Resolve an order key for a kind.
    pub fn order(&self, kind: RecordKind, key: Option<&str>) -> DomainResult<OrderSpec> {
        self.rules(kind).order(key)
    }

    pub fn filters(&self, kind: RecordKind) -> &[FilterRule] {
        self.rules(kind).filters()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn link_posted_by(record: &Record) -> Option<i64> {
    match record {
        Record::Link(link) => link.posted_by,
        Record::Vote(_) => None,
    }
}

fn vote_link(record: &Record) -> Option<i64> {
    match record {
        Record::Vote(vote) => Some(vote.link),
        Record::Link(_) => None,
    }
}

fn vote_user(record: &Record) -> Option<i64> {
    match record {
        Record::Vote(vote) => Some(vote.user),
        Record::Link(_) => None,
    }
}
