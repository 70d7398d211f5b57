// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget specifications.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use vizdash_query::normalize_query;

/// How a widget presents its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WidgetKind {
    /// A chart over the result rows.
    #[default]
    Chart,
    /// A single number: the result's total.
    Kpi,
}

/// What a widget shows, as configured by the UI layer.
///
/// Unset keys fall back to the defaults in [`crate::keys`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WidgetSpec {
    /// Entity (table) the widget reads.
    pub entity: String,
    /// Generated query fragment; normalized against `entity` before use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub query: Option<String>,
    /// Grouping key (`xKey`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_key: Option<String>,
    /// Value key (`mainKey`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub value_key: Option<String>,
    /// Free-text filter typed by the user.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter: Option<String>,
    /// Maximum number of rows to fetch.
    #[cfg_attr(feature = "serde", serde(default))]
    pub limit: Option<usize>,
    /// Presentation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: WidgetKind,
}

impl WidgetSpec {
    /// Creates a spec that reads all of `entity`.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Sets the generated query fragment.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the grouping key.
    #[must_use]
    pub fn with_group_key(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    /// Sets the value key.
    #[must_use]
    pub fn with_value_key(mut self, key: impl Into<String>) -> Self {
        self.value_key = Some(key.into());
        self
    }

    /// Sets the free-text filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the presentation.
    #[must_use]
    pub fn with_kind(mut self, kind: WidgetKind) -> Self {
        self.kind = kind;
        self
    }

    /// The query string to fetch with.
    ///
    /// The generated fragment is normalized against the entity; with no fragment the whole entity
    /// is read. A configured limit is appended as `$top` unless the query already has one.
    pub fn query_string(&self) -> String {
        let entity = self.entity.trim();
        let fragment = self.query.as_deref().map_or("", str::trim);
        let mut query = if fragment.is_empty() {
            format!("/{entity}")
        } else {
            normalize_query(fragment, Some(entity))
        };
        if let Some(limit) = self.limit
            && !has_directive(&query, "$top")
        {
            query.push(if query.contains('?') { '&' } else { '?' });
            query.push_str(&format!("$top={limit}"));
        }
        query
    }
}

fn has_directive(query: &str, key: &str) -> bool {
    let Some((_, params)) = query.split_once('?') else {
        return false;
    };
    params
        .split('&')
        .any(|pair| pair.split_once('=').map_or(pair, |(k, _)| k) == key)
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    extern crate std;

    use super::*;

    #[test]
    fn spec_from_ui_json() {
        let json = r#"{"entity":"Orders","groupKey":"ShipCountry","valueKey":"Freight","limit":20,"kind":"kpi"}"#;
        let spec: WidgetSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec,
            WidgetSpec::new("Orders")
                .with_group_key("ShipCountry")
                .with_value_key("Freight")
                .with_limit(20)
                .with_kind(WidgetKind::Kpi)
        );
    }
}
