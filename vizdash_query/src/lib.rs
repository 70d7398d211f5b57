// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Records and query execution for dashboard widgets.
//!
//! This crate provides:
//! - schema-flexible [`Record`]s holding scalar [`Value`]s,
//! - a single [`coerce`] module that owns every number/string conversion,
//! - an OData-ish query dialect (`$filter`, `$orderby`, `$select`, `$top`) parsed into a
//!   [`QuerySpec`] and executed locally against an in-memory collection, and
//! - [`normalize_query`], which anchors generated query fragments to an entity path.
//!
//! Execution is tolerant by construction: malformed directives are skipped and unsupported
//! filters match every row, so a sloppy generated query still produces a result.

#![no_std]

extern crate alloc;

pub mod coerce;
mod executor;
mod normalize;
mod query;
mod record;
mod schema;
mod value;

pub use executor::execute;
pub use normalize::normalize_query;
pub use query::{CompareOp, Filter, Predicate, QuerySpec, SortKey, SortOrder};
pub use record::{Record, RecordCollection};
pub use schema::{FieldDescriptor, FieldType, Schema};
pub use value::Value;
