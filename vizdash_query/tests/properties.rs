// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for projection and limit.

use proptest::prelude::*;
use vizdash_query::{Record, Value, execute};

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(Value::from),
        "[a-c]{0,3}".prop_map(Value::from),
    ]
}

fn arb_record() -> impl Strategy<Value = Record> {
    proptest::collection::vec(("[a-d]", arb_value()), 0..5)
        .prop_map(|fields| fields.into_iter().collect::<Record>())
}

proptest! {
    #[test]
    fn prop_projection_never_invents_fields(
        records in proptest::collection::vec(arb_record(), 0..20),
        select in proptest::collection::vec("[a-e]", 1..4),
    ) {
        let query = format!("/T?$select={}", select.join(","));
        let out = execute(&records, &query);
        prop_assert_eq!(out.len(), records.len());
        for (row, source) in out.iter().zip(&records) {
            for name in row.field_names() {
                prop_assert!(select.iter().any(|s| s == name));
                prop_assert!(source.contains(name));
            }
        }
    }

    #[test]
    fn prop_top_yields_min_of_n_and_len(
        records in proptest::collection::vec(arb_record(), 0..20),
        n in 0usize..25,
    ) {
        let base = "/T?$filter=a ne 'b'&$orderby=c desc";
        let filtered = execute(&records, base);
        let out = execute(&records, &format!("{base}&$top={n}"));
        prop_assert_eq!(out.len(), n.min(filtered.len()));
        prop_assert_eq!(&out[..], &filtered[..out.len()]);
    }

    #[test]
    fn prop_execution_never_panics(
        records in proptest::collection::vec(arb_record(), 0..8),
        query in "[/?$&=a-d ,'0-9]{0,40}",
    ) {
        let _ = execute(&records, &query);
    }
}
