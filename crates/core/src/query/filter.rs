//! Equality filters over foreign-key-like fields.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::Record;

/// Equality constraints: field name to target primary key.
///
/// Clauses combine with logical AND. Names the collection has no rule for
/// are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    clauses: BTreeMap<String, i64>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a clause, builder style.
    pub fn with(mut self, field: impl Into<String>, id: i64) -> Self {
        self.insert(field, id);
        self
    }

    /// Add (or replace) a clause.
    pub fn insert(&mut self, field: impl Into<String>, id: i64) {
        self.clauses.insert(field.into(), id);
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> impl Iterator<Item = (&str, i64)> {
        self.clauses.iter().map(|(field, id)| (field.as_str(), *id))
    }
}

/// A filterable field of one collection.
#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    /// Field name as it appears in filters.
    pub name: &'static str,
    /// Extract the referenced primary key from a record.
    pub key: fn(&Record) -> Option<i64>,
}

/// Narrow `records` to those matching every known clause of `filter`.
pub fn apply(records: Vec<Record>, filter: &RecordFilter, rules: &[FilterRule]) -> Vec<Record> {
    if filter.is_empty() {
        return records;
    }

    let mut active = Vec::new();
    for (field, id) in filter.clauses() {
        match rules.iter().find(|rule| rule.name == field) {
            Some(rule) => active.push((rule.key, id)),
            None => debug!(field, "Ignoring filter clause without a rule"),
        }
    }

    records
        .into_iter()
        .filter(|record| active.iter().all(|(key, id)| key(record) == Some(*id)))
        .collect()
}
