// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema-flexible records.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::Value;

/// An ordered sequence of records representing one entity's data.
pub type RecordCollection = Vec<Record>;

/// One row of data: an insertion-ordered mapping from field name to [`Value`].
///
/// No field is guaranteed to be present. Lookups are linear, which is the right trade-off for
/// the handful of columns a widget row carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `n` fields.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    /// Returns the value of a field, or `None` if the field is absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Returns `true` if the field is present (even if its value is null).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Sets a field, returning the previous value.
    ///
    /// Replacing a field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        if let Some((_, slot)) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            return Some(core::mem::replace(slot, value));
        }
        self.fields.push((name, value));
        None
    }

    /// Builder-style [`Record::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Iterates field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a record holding only the named fields that this record has.
    ///
    /// Output fields follow the order of `names`; names this record lacks are skipped, and a
    /// name listed twice is kept once.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut out = Self::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if out.contains(name) {
                continue;
            }
            if let Some(v) = self.get(name) {
                out.fields.push((name.into(), v.clone()));
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    extern crate alloc;

    use alloc::string::String;
    use core::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Record;
    use crate::Value;

    impl Serialize for Record {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    struct RecordVisitor;

    impl<'de> Visitor<'de> for RecordVisitor {
        type Value = Record;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to scalar values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
            let mut out = Record::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((k, v)) = access.next_entry::<String, Value>()? {
                out.insert(k, v);
            }
            Ok(out)
        }
    }

    impl<'de> Deserialize<'de> for Record {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(RecordVisitor)
        }
    }
}
