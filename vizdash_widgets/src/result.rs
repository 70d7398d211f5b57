// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-ready widget output.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;

use vizdash_query::RecordCollection;
use vizdash_query::coerce::{self, NumericFallback};

/// Rows plus summary scalars, ready for rendering.
///
/// This is derived from a fetch and a [`WidgetSpec`](crate::WidgetSpec) and is recomputed
/// whenever either changes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WidgetResult {
    /// Rows after the free-text filter, grouping and sorting.
    pub rows: RecordCollection,
    /// The resolved grouping key.
    pub group_key: String,
    /// The resolved value key.
    pub value_key: String,
    /// `true` if duplicate group keys were collapsed.
    pub grouped: bool,
    /// Sum of the value key over `rows`; non-numeric values count as `0`.
    pub total: f64,
    /// `total / rows.len()`, or `0` when there are no rows.
    pub average: f64,
}

impl WidgetResult {
    /// The single number a KPI widget displays.
    pub fn kpi(&self) -> f64 {
        self.total
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates `(label, value)` pairs for plotting.
    ///
    /// Labels are the grouping key's string form; values use the same coercion as the total.
    pub fn points(&self) -> impl Iterator<Item = (Cow<'_, str>, f64)> {
        self.rows.iter().map(|row| {
            (
                coerce::to_text(row.get(&self.group_key)),
                coerce::number_or(row.get(&self.value_key), NumericFallback::Zero),
            )
        })
    }
}
