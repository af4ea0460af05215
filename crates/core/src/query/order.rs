//! Order specifications: a sort field, a direction and the id tie-break.
//!
//! Every order is total. Records whose primary field compares equal are
//! ordered by ascending id, whatever the primary direction, so a page
//! boundary never lands between two indistinguishable records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::models::Record;
use crate::ports::OrderDirection;

/// A comparable field value extracted from a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortValue {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// A record's place in one ordering: its sort value plus its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub value: SortValue,
    pub id: i64,
}

/// Fields a collection can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    CreatedAt,
    Description,
    Id,
    Url,
}

impl OrderField {
    /// Name used in order keys (`createdAt` in `createdAt_DESC`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Description => "description",
            Self::Id => "id",
            Self::Url => "url",
        }
    }

    /// Extract this field from a record, if the record has it.
    pub fn value(&self, record: &Record) -> Option<SortValue> {
        match (self, record) {
            (Self::Id, record) => Some(SortValue::Int(record.id())),
            (Self::CreatedAt, Record::Link(link)) => Some(SortValue::Timestamp(link.created_at)),
            (Self::Description, Record::Link(link)) => {
                Some(SortValue::Text(link.description.clone()))
            }
            (Self::Url, Record::Link(link)) => Some(SortValue::Text(link.url.clone())),
            (_, Record::Vote(_)) => None,
        }
    }

    /// Whether a sort value has the type this field produces.
    fn accepts(&self, value: &SortValue) -> bool {
        matches!(
            (self, value),
            (Self::Id, SortValue::Int(_))
                | (Self::CreatedAt, SortValue::Timestamp(_))
                | (Self::Description | Self::Url, SortValue::Text(_))
        )
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl OrderSpec {
    pub const fn new(field: OrderField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    /// Order key name, e.g. `createdAt_DESC`.
    pub fn key(&self) -> String {
        let suffix = match self.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        format!("{}_{}", self.field, suffix)
    }

    /// Position of a record under this order.
    pub fn position(&self, record: &Record) -> DomainResult<Position> {
        let value = self.field.value(record).ok_or_else(|| {
            DomainError::UnknownOrderKey(format!("{} on {}", self.key(), record.kind()))
        })?;
        Ok(Position {
            value,
            id: record.id(),
        })
    }

    /// Total comparison: primary field in `direction`, then ascending id.
    pub fn compare(&self, a: &Position, b: &Position) -> Ordering {
        let primary = a.value.cmp(&b.value);
        let primary = match self.direction {
            OrderDirection::Asc => primary,
            OrderDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Reject a decoded position that cannot belong to this order.
    pub fn check(&self, position: &Position) -> DomainResult<()> {
        if !self.field.accepts(&position.value) {
            return Err(DomainError::InvalidCursor(format!(
                "cursor does not match order {}",
                self.key()
            )));
        }
        if self.field == OrderField::Id && position.value != SortValue::Int(position.id) {
            return Err(DomainError::InvalidCursor(
                "cursor id does not match its sort value".into(),
            ));
        }
        Ok(())
    }
}
