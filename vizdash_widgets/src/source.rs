// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where widget rows come from.
//!
//! Remote services (HTTP tabular APIs, spreadsheet uploads) live outside this crate and implement
//! [`RecordSource`]. [`MemorySource`] answers queries locally with the
//! [`vizdash_query`] executor.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;

use hashbrown::HashMap;
use vizdash_query::{QuerySpec, Record, RecordCollection, Schema};

/// Errors returned by a [`RecordSource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The query's path does not name an entity.
    #[error("query {0:?} does not name an entity")]
    MissingEntity(String),
    /// The named entity does not exist in the source.
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),
    /// The source could not answer, e.g. a transport failure in a remote adapter.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Something that can answer a query string with records.
pub trait RecordSource {
    /// Fetches the records for `query` (shape `/<entity>?<directives>`).
    fn fetch(&self, query: &str) -> Result<RecordCollection, SourceError>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn fetch(&self, query: &str) -> Result<RecordCollection, SourceError> {
        (**self).fetch(query)
    }
}

impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    fn fetch(&self, query: &str) -> Result<RecordCollection, SourceError> {
        (**self).fetch(query)
    }
}

/// Named record collections held in memory, e.g. a parsed spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<String, RecordCollection>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a collection, returning the previous one.
    pub fn insert(
        &mut self,
        entity: impl Into<String>,
        records: RecordCollection,
    ) -> Option<RecordCollection> {
        self.collections.insert(entity.into(), records)
    }

    /// Builder-style [`MemorySource::insert`].
    #[must_use]
    pub fn with(mut self, entity: impl Into<String>, records: RecordCollection) -> Self {
        self.insert(entity, records);
        self
    }

    /// Returns a collection by name.
    ///
    /// An exact match wins; otherwise names are compared ASCII case-insensitively, since
    /// generated queries do not always preserve case. When several names differ from `entity`
    /// only in case, the lexicographically smallest one answers.
    pub fn get(&self, entity: &str) -> Option<&[Record]> {
        if let Some(records) = self.collections.get(entity) {
            return Some(records.as_slice());
        }
        self.collections
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(entity))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, records)| records.as_slice())
    }

    /// Iterates entity names (in no particular order).
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Infers the schema of a collection.
    pub fn schema(&self, entity: &str) -> Option<Schema> {
        self.get(entity).map(Schema::infer)
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, query: &str) -> Result<RecordCollection, SourceError> {
        let spec = QuerySpec::parse(query);
        let Some(entity) = spec.entity() else {
            return Err(SourceError::MissingEntity(query.into()));
        };
        let records = self
            .get(entity)
            .ok_or_else(|| SourceError::UnknownEntity(entity.into()))?;
        Ok(spec.apply(records))
    }
}
