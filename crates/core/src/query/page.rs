//! Slicing an ordered collection into a Relay page.

use std::cmp::Ordering;

use crate::error::DomainResult;
use crate::models::Record;
use crate::ports::{Connection, Edge, PageInfo};

use super::cursor;
use super::order::{OrderSpec, Position};

/// Build one page of `records` under `order_spec`.
///
/// Everything at or before `after` (by the full order, tie-break included)
/// is skipped, then up to `first` records are taken. `first = None` takes
/// everything that remains.
pub fn paginate(
    records: Vec<Record>,
    order_spec: &OrderSpec,
    after: Option<&Position>,
    first: Option<usize>,
) -> DomainResult<Connection<Record>> {
    let mut ordered = records
        .into_iter()
        .map(|record| Ok((order_spec.position(&record)?, record)))
        .collect::<DomainResult<Vec<_>>>()?;
    ordered.sort_by(|(a, _), (b, _)| order_spec.compare(a, b));

    let start = match after {
        Some(boundary) => ordered.partition_point(|(position, _)| {
            order_spec.compare(position, boundary) != Ordering::Greater
        }),
        None => 0,
    };

    let remaining = ordered.len() - start;
    let taken = first.map_or(remaining, |limit| limit.min(remaining));

    let has_next_page = remaining > taken;
    let has_previous_page = after.is_some() && start > 0;

    if taken == 0 {
        return Ok(Connection::empty(has_next_page, has_previous_page));
    }

    let edges = ordered
        .into_iter()
        .skip(start)
        .take(taken)
        .map(|(position, node)| {
            Ok(Edge {
                cursor: cursor::encode(&position)?,
                node,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(Connection {
        page_info: PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        },
        edges,
    })
}
