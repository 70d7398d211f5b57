// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for widget aggregation.

use proptest::prelude::*;
use vizdash_query::{Record, Value, coerce};
use vizdash_widgets::{WidgetSpec, aggregate, has_duplicate_keys};

fn arb_row() -> impl Strategy<Value = Record> {
    let value = prop_oneof![
        (-100i32..100).prop_map(Value::from),
        "[a-b]{0,2}".prop_map(Value::from),
        Just(Value::Null),
    ];
    ("[A-E]", value).prop_map(|(name, value)| Record::new().with("name", name).with("value", value))
}

proptest! {
    #[test]
    fn prop_aggregation_is_idempotent(rows in proptest::collection::vec(arb_row(), 0..30)) {
        let spec = WidgetSpec::new("T");
        let once = aggregate(rows, &spec);
        prop_assert!(!has_duplicate_keys(&once.rows, "name"));

        let twice = aggregate(once.rows.clone(), &spec);
        prop_assert!(!twice.grouped);
        prop_assert_eq!(&twice.rows, &once.rows);
    }

    #[test]
    fn prop_total_and_average_match_returned_rows(
        rows in proptest::collection::vec(arb_row(), 0..30),
        filter in prop_oneof![Just(String::new()), "[a-eA-E]", (-5i32..50).prop_map(|n| n.to_string())],
    ) {
        let spec = WidgetSpec::new("T").with_filter(filter);
        let out = aggregate(rows, &spec);
        let expected: f64 = out
            .rows
            .iter()
            .map(|r| coerce::to_number(r.get("value")).unwrap_or(0.0))
            .sum();
        prop_assert_eq!(out.total, expected);
        if out.rows.is_empty() {
            prop_assert_eq!(out.average, 0.0);
        } else {
            prop_assert_eq!(out.average, out.total / out.rows.len() as f64);
        }
    }

    #[test]
    fn prop_grouped_output_is_sorted_descending(rows in proptest::collection::vec(arb_row(), 0..30)) {
        let out = aggregate(rows, &WidgetSpec::new("T"));
        if out.grouped {
            let values: Vec<f64> = out.points().map(|(_, v)| v).collect();
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
