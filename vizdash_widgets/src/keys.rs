// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping and value key resolution.
//!
//! Data sources label columns differently, so the keys a widget reads are resolved per result
//! set rather than fixed up front.

extern crate alloc;

use alloc::string::String;

use vizdash_query::Record;

/// Grouping key used when a widget does not name one.
pub const DEFAULT_GROUP_KEY: &str = "name";
/// Value key used when a widget does not name one.
pub const DEFAULT_VALUE_KEY: &str = "value";
/// A row carrying this field is in actual-vs-target shape.
pub const TARGET_FIELD: &str = "target";
/// Value key of actual-vs-target shaped results.
pub const ACTUAL_FIELD: &str = "actual";

/// How the value key of a result set was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKeyStrategy {
    /// The caller's key, or [`DEFAULT_VALUE_KEY`].
    Explicit(String),
    /// Rows carry a [`TARGET_FIELD`]; the value key is forced to [`ACTUAL_FIELD`].
    ActualVsTarget,
}

impl ValueKeyStrategy {
    /// Chooses a strategy for `rows`.
    ///
    /// If any row has a [`TARGET_FIELD`] the caller's key is overridden.
    pub fn resolve(rows: &[Record], requested: Option<&str>) -> Self {
        if rows.iter().any(|r| r.contains(TARGET_FIELD)) {
            return Self::ActualVsTarget;
        }
        Self::Explicit(non_empty(requested).unwrap_or(DEFAULT_VALUE_KEY).into())
    }

    /// The field that holds the value.
    pub fn value_key(&self) -> &str {
        match self {
            Self::Explicit(key) => key,
            Self::ActualVsTarget => ACTUAL_FIELD,
        }
    }
}

/// Resolves the grouping key, defaulting to [`DEFAULT_GROUP_KEY`].
pub fn resolve_group_key(requested: Option<&str>) -> &str {
    non_empty(requested).unwrap_or(DEFAULT_GROUP_KEY)
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        assert_eq!(resolve_group_key(None), "name");
        assert_eq!(resolve_group_key(Some(" ")), "name");
        assert_eq!(resolve_group_key(Some("ShipCountry")), "ShipCountry");

        let s = ValueKeyStrategy::resolve(&[], None);
        assert_eq!(s.value_key(), "value");
    }

    #[test]
    fn target_field_forces_actual() {
        let rows = vec![
            Record::new().with("name", "Q1").with("revenue", 10.0),
            Record::new()
                .with("name", "Q2")
                .with("actual", 12.0)
                .with("target", 15.0),
        ];
        let s = ValueKeyStrategy::resolve(&rows, Some("revenue"));
        assert_eq!(s, ValueKeyStrategy::ActualVsTarget);
        assert_eq!(s.value_key(), "actual");
    }

    #[test]
    fn explicit_key_is_kept_without_target() {
        let rows = vec![Record::new().with("name", "Q1").with("revenue", 10.0)];
        let s = ValueKeyStrategy::resolve(&rows, Some("revenue"));
        assert_eq!(s, ValueKeyStrategy::Explicit("revenue".into()));
    }
}
