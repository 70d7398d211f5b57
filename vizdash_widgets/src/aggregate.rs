// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-processing of a fetched result set into a [`WidgetResult`].
//!
//! Steps, in order:
//! 1. resolve the value key ([`ValueKeyStrategy`]) and the grouping key,
//! 2. apply the widget's free-text filter ([`TextFilter`]),
//! 3. if any grouping key repeats, collapse rows into one per key (summing values) and sort by
//!    value, highest first; otherwise keep row order untouched,
//! 4. compute `total` and `average` over the final rows.
//!
//! Grouping sums and totals coerce non-numeric values differently: a grouping sum counts such a
//! row as `1` (so grouping a non-numeric column yields frequencies), while the total counts it as
//! `0`. Both go through [`vizdash_query::coerce`].

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use vizdash_query::coerce::{self, NumericFallback};
use vizdash_query::{Record, RecordCollection, Value};

use crate::keys::{ValueKeyStrategy, resolve_group_key};
use crate::{WidgetResult, WidgetSpec};

/// The free-text filter a user types into a widget.
///
/// This layers on top of any `$filter` in the widget's query and always has threshold or
/// substring semantics, never exact match.
#[derive(Debug, Clone, PartialEq)]
pub enum TextFilter {
    /// The text parsed as a number: keep rows whose value is at least this.
    Threshold(f64),
    /// Any other text: keep rows whose grouping key contains it, ignoring case.
    ///
    /// Stored lowercased.
    Contains(String),
}

impl TextFilter {
    /// Classifies filter text. Blank text is no filter.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(match coerce::parse_number(text) {
            Some(n) => Self::Threshold(n),
            None => Self::Contains(text.to_lowercase()),
        })
    }

    /// Returns `true` if `row` passes.
    ///
    /// Rows whose value is not numeric never pass a threshold; rows without the grouping key never
    /// pass a substring filter.
    pub fn matches(&self, row: &Record, group_key: &str, value_key: &str) -> bool {
        match self {
            Self::Threshold(min) => {
                coerce::to_number(row.get(value_key)).is_some_and(|v| v >= *min)
            }
            Self::Contains(needle) => row
                .get(group_key)
                .filter(|v| !v.is_null())
                .is_some_and(|v| {
                    coerce::to_text(Some(v))
                        .to_lowercase()
                        .contains(needle.as_str())
                }),
        }
    }
}

/// Turns a fetched result set into chart-ready rows and summary scalars.
///
/// Never fails: missing and non-numeric fields are coerced, and empty input yields an empty
/// result with zero scalars.
pub fn aggregate(rows: RecordCollection, spec: &WidgetSpec) -> WidgetResult {
    let strategy = ValueKeyStrategy::resolve(&rows, spec.value_key.as_deref());
    let value_key: String = strategy.value_key().into();
    let group_key: String = resolve_group_key(spec.group_key.as_deref()).into();

    let mut rows = rows;
    if let Some(filter) = spec.filter.as_deref().and_then(TextFilter::parse) {
        rows.retain(|row| filter.matches(row, &group_key, &value_key));
    }

    let grouped = has_duplicate_keys(&rows, &group_key);
    if grouped {
        log::trace!("grouping {} rows by {group_key:?}", rows.len());
        rows = group_rows(&rows, &group_key, &value_key);
    }

    let (total, average) = summarize(&rows, &value_key);
    WidgetResult {
        rows,
        group_key,
        value_key,
        grouped,
        total,
        average,
    }
}

/// The grouping key of a row: `None` when the field is absent or null.
///
/// Keeping absent keys out of the string space means a row without a key never collides with a
/// row whose key is the text `"null"`.
fn group_key_of<'a>(row: &'a Record, group_key: &str) -> Option<Cow<'a, str>> {
    row.get(group_key)
        .filter(|v| !v.is_null())
        .map(|v| coerce::to_text(Some(v)))
}

/// Returns `true` as soon as any grouping key repeats.
///
/// Rows without a grouping key (absent or null) share one key.
pub fn has_duplicate_keys(rows: &[Record], group_key: &str) -> bool {
    let mut seen: HashSet<Option<Cow<'_, str>>> = HashSet::with_capacity(rows.len());
    rows.iter().any(|row| !seen.insert(group_key_of(row, group_key)))
}

/// Collapses rows to one per grouping key, summing values, sorted by value descending.
///
/// Output rows are `{ group_key: key, value_key: sum }` with the key in string form. Rows without
/// a grouping key collapse into one row whose key is [`Value::Null`]. Keys with equal sums keep
/// first-seen order.
pub fn group_rows(rows: &[Record], group_key: &str, value_key: &str) -> RecordCollection {
    let mut index: HashMap<Option<Cow<'_, str>>, usize> = HashMap::new();
    let mut sums: Vec<(Option<Cow<'_, str>>, f64)> = Vec::new();

    for row in rows {
        let key = group_key_of(row, group_key);
        let v = coerce::number_or(row.get(value_key), NumericFallback::Unit);
        match index.get(&key) {
            Some(&i) => sums[i].1 += v,
            None => {
                index.insert(key.clone(), sums.len());
                sums.push((key, v));
            }
        }
    }

    sums.sort_by(|a, b| b.1.total_cmp(&a.1));
    sums.into_iter()
        .map(|(key, sum)| {
            let key = key.map_or(Value::Null, |k| Value::Text(k.into_owned()));
            Record::with_capacity(2)
                .with(group_key, key)
                .with(value_key, sum)
        })
        .collect()
}

/// Returns `(total, average)` of `value_key` over `rows`, counting non-numeric values as `0`.
pub fn summarize(rows: &[Record], value_key: &str) -> (f64, f64) {
    let total: f64 = rows
        .iter()
        .map(|row| coerce::number_or(row.get(value_key), NumericFallback::Zero))
        .sum();
    let average = if rows.is_empty() {
        0.0
    } else {
        total / rows.len() as f64
    };
    (total, average)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn row(name: &str, value: impl Into<Value>) -> Record {
        Record::new().with("name", name).with("value", value)
    }

    fn spec() -> WidgetSpec {
        WidgetSpec::new("T")
    }

    #[test]
    fn duplicate_keys_are_summed_and_sorted_descending() {
        let rows = vec![row("A", 5.0), row("B", 3.0), row("A", 2.0)];
        let out = aggregate(rows, &spec());
        assert!(out.grouped);
        assert_eq!(out.rows, vec![row("A", 7.0), row("B", 3.0)]);
        assert_eq!(out.total, 10.0);
        assert_eq!(out.average, 5.0);
    }

    #[test]
    fn grouping_sorts_highest_first() {
        let rows = vec![row("A", 1.0), row("B", 3.0), row("A", 1.0), row("C", 9.0)];
        let out = aggregate(rows, &spec());
        assert_eq!(out.rows, vec![row("C", 9.0), row("B", 3.0), row("A", 2.0)]);
    }

    #[test]
    fn missing_key_is_distinct_from_null_text() {
        let rows = vec![row("null", 5.0), Record::new().with("value", 3.0)];
        let out = aggregate(rows.clone(), &spec());
        assert!(!out.grouped);
        assert_eq!(out.rows, rows);
    }

    #[test]
    fn missing_and_null_keys_group_together() {
        let rows = vec![
            Record::new().with("value", 3.0),
            row("A", 1.0),
            Record::new().with("name", Value::Null).with("value", 4.0),
        ];
        let out = aggregate(rows, &spec());
        assert!(out.grouped);
        assert_eq!(
            out.rows,
            vec![
                Record::new().with("name", Value::Null).with("value", 7.0),
                row("A", 1.0),
            ]
        );
    }

    #[test]
    fn unique_keys_keep_input_order() {
        let rows = vec![row("A", 5.0), row("B", 3.0)];
        let out = aggregate(rows.clone(), &spec());
        assert!(!out.grouped);
        assert_eq!(out.rows, rows);
    }

    #[test]
    fn ungrouped_rows_keep_extra_fields() {
        let rows = vec![
            row("A", 1.0).with("color", "red"),
            row("B", 2.0).with("color", "blue"),
        ];
        let out = aggregate(rows.clone(), &spec());
        assert_eq!(out.rows, rows);
    }

    #[test]
    fn numeric_filter_is_a_threshold_on_the_value() {
        let rows = vec![row("X", 5.0), row("Y", 15.0), row("Z", 10.0)];
        let out = aggregate(rows, &spec().with_filter("10"));
        assert_eq!(out.rows, vec![row("Y", 15.0), row("Z", 10.0)]);
    }

    #[test]
    fn text_filter_is_a_case_insensitive_substring_of_the_group_key() {
        let rows = vec![
            Record::new().with("name", "Alpha"),
            Record::new().with("name", "Beta"),
        ];
        let out = aggregate(rows, &spec().with_filter("a"));
        // "Beta" also contains "a".
        assert_eq!(out.rows.len(), 2);

        let rows = vec![
            Record::new().with("name", "Alpha"),
            Record::new().with("name", "Beta"),
        ];
        let out = aggregate(rows, &spec().with_filter("AL"));
        assert_eq!(out.rows, vec![Record::new().with("name", "Alpha")]);
    }

    #[test]
    fn blank_filter_is_no_filter() {
        let rows = vec![row("A", 1.0), row("B", 2.0)];
        let out = aggregate(rows, &spec().with_filter("   "));
        assert_eq!(out.rows.len(), 2);
    }

    #[test]
    fn non_numeric_values_count_as_one_when_grouping_and_zero_in_totals() {
        let rows = vec![
            row("A", "n/a"),
            row("A", "n/a"),
            row("B", "n/a"),
            Record::new().with("name", "B"),
        ];
        let out = aggregate(rows, &spec());
        assert!(out.grouped);
        assert_eq!(out.rows, vec![row("A", 2.0), row("B", 2.0)]);
        assert_eq!(out.total, 4.0);

        // Ungrouped, the same values contribute nothing to the total.
        let out = aggregate(vec![row("A", "n/a"), row("B", 3.0)], &spec());
        assert!(!out.grouped);
        assert_eq!(out.total, 3.0);
        assert_eq!(out.average, 1.5);
    }

    #[test]
    fn target_shape_sums_actual() {
        let rows = vec![
            Record::new()
                .with("month", "Jan")
                .with("actual", 10.0)
                .with("target", 12.0),
            Record::new()
                .with("month", "Jan")
                .with("actual", 5.0)
                .with("target", 12.0),
        ];
        let spec = spec().with_group_key("month").with_value_key("target");
        let out = aggregate(rows, &spec);
        assert_eq!(out.value_key, "actual");
        assert_eq!(
            out.rows,
            vec![Record::new().with("month", "Jan").with("actual", 15.0)]
        );
        assert_eq!(out.kpi(), 15.0);
    }

    #[test]
    fn numeric_group_keys_are_stringified() {
        let rows = vec![
            Record::new().with("year", 1997.0).with("value", 1.0),
            Record::new().with("year", "1997").with("value", 2.0),
        ];
        let out = aggregate(rows, &spec().with_group_key("year"));
        assert_eq!(
            out.rows,
            vec![Record::new().with("year", "1997").with("value", 3.0)]
        );
    }

    #[test]
    fn empty_input_yields_zero_scalars() {
        let out = aggregate(Vec::new(), &spec());
        assert!(out.is_empty());
        assert!(!out.grouped);
        assert_eq!(out.total, 0.0);
        assert_eq!(out.average, 0.0);
    }

    #[test]
    fn grouping_is_idempotent() {
        let rows = vec![row("A", 5.0), row("B", 3.0), row("A", 2.0)];
        let once = aggregate(rows, &spec());
        let twice = aggregate(once.rows.clone(), &spec());
        assert!(!twice.grouped);
        assert_eq!(twice.rows, once.rows);
        assert_eq!(twice.total, once.total);
    }

    #[test]
    fn points_pair_labels_with_values() {
        let out = aggregate(vec![row("A", 5.0), row("B", "x")], &spec());
        let points: Vec<(String, f64)> = out
            .points()
            .map(|(label, v)| (label.into_owned(), v))
            .collect();
        assert_eq!(points, vec![("A".into(), 5.0), ("B".into(), 0.0)]);
    }
}
