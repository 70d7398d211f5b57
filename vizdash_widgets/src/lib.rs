// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dashboard widgets on top of `vizdash_query`.
//!
//! A widget is described by a [`WidgetSpec`] (entity, generated query fragment, grouping and
//! value keys, free-text filter, row limit). Loading a widget:
//! - builds an anchored query string from the spec,
//! - fetches rows from a [`RecordSource`],
//! - post-processes them with [`aggregate`]: key resolution, free-text filtering, collapsing of
//!   duplicate categories, and `total`/`average` for KPI display.
//!
//! [`Dashboard`] keeps per-widget state and discards loads that finish after the widget changed
//! or was removed.

#![no_std]

extern crate alloc;

mod aggregate;
mod dashboard;
pub mod keys;
mod result;
mod source;
mod spec;

pub use aggregate::{TextFilter, aggregate, group_rows, has_duplicate_keys, summarize};
pub use dashboard::{Dashboard, DashboardError, LoadTicket, Widget, WidgetId, load_widget};
pub use keys::ValueKeyStrategy;
pub use result::WidgetResult;
pub use source::{MemorySource, RecordSource, SourceError};
pub use spec::{WidgetKind, WidgetSpec};
