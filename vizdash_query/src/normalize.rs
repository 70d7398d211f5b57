// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-effort repair of generated query fragments.

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// Anchors a possibly malformed query fragment to `/<entity>`.
///
/// Rules, first match wins:
/// 1. empty query or unknown entity: returned unchanged,
/// 2. `$...` (bare directives): `/<entity>?$...`,
/// 3. `?...` (bare parameters): `/<entity>?...`,
/// 4. no leading `/`: `/` is prefixed if the fragment already starts with the entity name
///    (ASCII case-insensitive), otherwise the whole fragment is treated as parameters,
/// 5. anything starting with `/` (including a bare `/<entity>`) is returned unchanged.
///
/// Surrounding whitespace is trimmed. The output is not validated beyond these rules.
///
/// ```
/// use vizdash_query::normalize_query;
///
/// assert_eq!(normalize_query("$select=Freight", Some("Orders")), "/Orders?$select=Freight");
/// assert_eq!(normalize_query("/Orders", Some("Orders")), "/Orders");
/// ```
pub fn normalize_query(query: &str, entity: Option<&str>) -> String {
    let trimmed = query.trim();
    let entity = entity.map(str::trim).filter(|e| !e.is_empty());
    let Some(entity) = entity.filter(|_| !trimmed.is_empty()) else {
        return query.into();
    };

    if trimmed.starts_with('$') {
        return format!("/{entity}?{trimmed}");
    }
    if trimmed.starts_with('?') {
        return format!("/{entity}{trimmed}");
    }
    if !trimmed.starts_with('/') {
        let named = trimmed
            .get(..entity.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(entity));
        if named {
            return format!("/{trimmed}");
        }
        return format!("/{entity}?{trimmed}");
    }
    trimmed.into()
}
