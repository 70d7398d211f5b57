// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field descriptors.
//!
//! A [`Schema`] describes a record collection's shape for catalogs and prompts. It is never
//! enforced: records may carry fields a schema lacks, lack fields it lists, or hold values of a
//! different type than declared.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Record, Value};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// Free text.
    String,
    /// Numeric.
    Number,
    /// Date or timestamp, carried as text.
    Date,
    /// Boolean.
    Boolean,
}

/// Name, declared type and optional description of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Human description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Create a descriptor without a description.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered list of field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    /// Descriptors in field order.
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Infers a schema from records.
    ///
    /// Fields are listed in first-seen order. Each field is typed from its first non-null value;
    /// a field that is only ever null is typed as [`FieldType::String`].
    pub fn infer(records: &[Record]) -> Self {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        // Fields seen so far that have only carried nulls.
        let mut untyped: Vec<usize> = Vec::new();

        for record in records {
            for (name, value) in record.iter() {
                match fields.iter().position(|f| f.name == name) {
                    Some(idx) => {
                        if !value.is_null()
                            && let Some(pos) = untyped.iter().position(|&i| i == idx)
                        {
                            untyped.swap_remove(pos);
                            fields[idx].field_type = infer_type(value);
                        }
                    }
                    None => {
                        if value.is_null() {
                            untyped.push(fields.len());
                        }
                        fields.push(FieldDescriptor::new(name, infer_type(value)));
                    }
                }
            }
        }

        Self { fields }
    }

    /// Returns the descriptor for `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the names of fields with the given type, in order.
    pub fn fields_of_type(&self, field_type: FieldType) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(move |f| f.field_type == field_type)
            .map(|f| f.name.as_str())
    }
}

fn infer_type(value: &Value) -> FieldType {
    match value {
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
        Value::Text(s) if looks_like_date(s) => FieldType::Date,
        Value::Text(_) | Value::Null => FieldType::String,
    }
}

/// ISO dates (`YYYY-MM-DD`, optionally followed by a time) and OData v2 `/Date(ms)/` literals.
fn looks_like_date(s: &str) -> bool {
    if let Some(ms) = s.strip_prefix("/Date(").and_then(|r| r.strip_suffix(")/")) {
        let ms = ms.trim_start_matches('-');
        return !ms.is_empty() && ms.bytes().all(|b| b.is_ascii_digit() || b == b'+');
    }
    let b = s.as_bytes();
    if b.len() < 10 {
        return false;
    }
    let digits = |r: core::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    digits(0..4)
        && b[4] == b'-'
        && digits(5..7)
        && b[7] == b'-'
        && digits(8..10)
        && (b.len() == 10 || b[10] == b'T' || b[10] == b' ')
}
