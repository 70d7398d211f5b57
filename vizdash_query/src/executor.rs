// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local query execution over an in-memory record collection.
//!
//! Directives apply in a fixed order: filter, sort, projection, limit. Filtering has to see the
//! full records (a filter may reference a field the projection drops), and the limit has to see
//! sorted rows to return the right "top N".

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::coerce;
use crate::query::{QuerySpec, SortKey, SortOrder};
use crate::{Record, RecordCollection};

impl QuerySpec {
    /// Applies this spec to `records`, returning a new collection.
    ///
    /// The input is never modified. Rows that compare equal under `$orderby` keep their input
    /// order.
    pub fn apply(&self, records: &[Record]) -> RecordCollection {
        let mut rows: Vec<&Record> = match &self.filter {
            Some(filter) => records.iter().filter(|r| filter.matches(r)).collect(),
            None => records.iter().collect(),
        };

        if !self.order_by.is_empty() {
            rows.sort_by(|a, b| compare_by_keys(a, b, &self.order_by));
        }

        // Projection is per row, so truncating first yields the same rows without cloning the
        // ones that would be cut.
        if let Some(top) = self.top {
            rows.truncate(top);
        }

        if self.select.is_empty() {
            rows.into_iter().cloned().collect()
        } else {
            rows.into_iter().map(|r| r.project(self.select.as_slice())).collect()
        }
    }
}

/// Parses `query` and applies it to `records`.
///
/// This is a pure function of its inputs. The path part of the query is ignored; callers that
/// hold several collections pick one by [`QuerySpec::entity`] first.
pub fn execute(records: &[Record], query: &str) -> RecordCollection {
    QuerySpec::parse(query).apply(records)
}

fn compare_by_keys(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = coerce::natural_cmp(a.get(&key.field), b.get(&key.field));
        let ord = match key.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
