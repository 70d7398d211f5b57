// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query strings and their parsed directives.
//!
//! A query string has the shape `path?$filter=..&$orderby=..&$select=..&$top=..`. Only the four
//! `$`-prefixed keys listed there are recognized; keys are case-sensitive, the first occurrence of
//! a key wins, and unknown keys are ignored.
//!
//! Parsing never fails. A directive whose value is malformed is dropped (logged at `debug`) and the
//! remaining directives still apply. A `$filter` that is not a single `<field> <op> <literal>`
//! comparison parses to [`Filter::Unsupported`], which matches every row.

extern crate alloc;

use alloc::string::String;

use smallvec::SmallVec;

use crate::Record;
use crate::coerce;

/// Comparison operators accepted by `$filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `eq`, string equality.
    Eq,
    /// `ne`, string inequality.
    Ne,
    /// `gt`, numeric `>`.
    Gt,
    /// `lt`, numeric `<`.
    Lt,
    /// `ge`, numeric `>=`.
    Ge,
    /// `le`, numeric `<=`.
    Le,
}

impl CompareOp {
    /// Parses an operator keyword. Keywords are lowercase only.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "ge" => Some(Self::Ge),
            "le" => Some(Self::Le),
            _ => None,
        }
    }
}

/// A single `<field> <op> <literal>` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Field to read.
    pub field: String,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right-hand literal, with surrounding quotes removed.
    pub literal: String,
}

impl Predicate {
    /// Evaluates the predicate against a record.
    ///
    /// `eq`/`ne` compare string forms. The ordering operators coerce both sides to numbers and are
    /// `false` when either side is not numeric.
    pub fn matches(&self, record: &Record) -> bool {
        let value = record.get(&self.field);
        match self.op {
            CompareOp::Eq => coerce::to_text(value) == self.literal.as_str(),
            CompareOp::Ne => coerce::to_text(value) != self.literal.as_str(),
            CompareOp::Gt | CompareOp::Lt | CompareOp::Ge | CompareOp::Le => {
                let (Some(lhs), Some(rhs)) =
                    (coerce::to_number(value), coerce::parse_number(&self.literal))
                else {
                    return false;
                };
                match self.op {
                    CompareOp::Gt => lhs > rhs,
                    CompareOp::Lt => lhs < rhs,
                    CompareOp::Ge => lhs >= rhs,
                    _ => lhs <= rhs,
                }
            }
        }
    }
}

/// A parsed `$filter` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// A single comparison.
    Condition(Predicate),
    /// Anything else, such as compound `and`/`or` expressions or function calls.
    ///
    /// This is a known limitation: there is no boolean-expression evaluator, so unsupported
    /// filters fail open and match every row. The raw text is kept for diagnostics.
    Unsupported(String),
}

impl Filter {
    /// Parses a filter expression.
    ///
    /// The text must split into exactly three whitespace-separated tokens, and the middle one
    /// must be an operator keyword. Quotes around the literal are stripped, so a quoted literal
    /// containing spaces is more than three tokens and is unsupported.
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.split_whitespace();
        let (Some(field), Some(op), Some(literal), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Self::Unsupported(text.into());
        };
        let Some(op) = CompareOp::parse(op) else {
            return Self::Unsupported(text.into());
        };
        Self::Condition(Predicate {
            field: field.into(),
            op,
            literal: strip_quotes(literal).into(),
        })
    }

    /// Returns `true` if the record passes this filter.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Condition(p) => p.matches(record),
            Self::Unsupported(_) => true,
        }
    }
}

/// Removes leading and trailing `'`/`"` characters, matched or not.
fn strip_quotes(literal: &str) -> &str {
    literal.trim_matches(['\'', '"'])
}

/// Sort direction for `$orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// One `<field> [asc|desc]` key of an `$orderby` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub order: SortOrder,
}

impl SortKey {
    fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let field = parts.next()?;
        let order = match parts.next() {
            None => SortOrder::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            field: field.into(),
            order,
        })
    }
}

/// The parsed directives of a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    /// The part before `?`.
    pub path: String,
    /// `$filter`.
    pub filter: Option<Filter>,
    /// `$orderby`, most significant key first. Empty when absent.
    pub order_by: SmallVec<[SortKey; 1]>,
    /// `$select`, in listed order. Empty when absent.
    pub select: SmallVec<[String; 4]>,
    /// `$top`.
    pub top: Option<usize>,
}

impl QuerySpec {
    /// Parses a query string.
    pub fn parse(query: &str) -> Self {
        let (path, params) = query.split_once('?').unwrap_or((query, ""));
        let mut spec = Self {
            path: path.into(),
            ..Self::default()
        };

        let mut seen_filter = false;
        let mut seen_order = false;
        let mut seen_select = false;
        let mut seen_top = false;

        for pair in params.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key);
            let value = decode_component(raw);
            match key.as_str() {
                "$filter" if !seen_filter => {
                    seen_filter = true;
                    spec.filter = parse_filter(&value);
                }
                "$orderby" if !seen_order => {
                    seen_order = true;
                    spec.order_by = parse_order_by(&value).unwrap_or_default();
                }
                "$select" if !seen_select => {
                    seen_select = true;
                    spec.select = parse_select(&value).unwrap_or_default();
                }
                "$top" if !seen_top => {
                    seen_top = true;
                    spec.top = parse_top(&value);
                }
                _ => {}
            }
        }
        spec
    }

    /// Returns the entity named by the first path segment.
    ///
    /// A key predicate such as `Orders(10248)` yields `Orders`.
    pub fn entity(&self) -> Option<&str> {
        let segment = self.path.split('/').find(|s| !s.trim().is_empty())?.trim();
        let name = segment.split_once('(').map_or(segment, |(name, _)| name);
        (!name.is_empty()).then_some(name)
    }
}

fn parse_filter(value: &str) -> Option<Filter> {
    if value.trim().is_empty() {
        log::debug!("skipping empty $filter");
        return None;
    }
    let filter = Filter::parse(value);
    if let Filter::Unsupported(text) = &filter {
        log::warn!("unsupported $filter {text:?}; matching all rows");
    }
    Some(filter)
}

fn parse_order_by(value: &str) -> Option<SmallVec<[SortKey; 1]>> {
    let keys: Option<SmallVec<[SortKey; 1]>> = value.split(',').map(SortKey::parse).collect();
    match keys {
        Some(keys) if !keys.is_empty() => Some(keys),
        _ => {
            log::debug!("skipping malformed $orderby {value:?}");
            None
        }
    }
}

fn parse_select(value: &str) -> Option<SmallVec<[String; 4]>> {
    let fields: SmallVec<[String; 4]> = value
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect();
    if fields.is_empty() {
        log::debug!("skipping empty $select");
        return None;
    }
    Some(fields)
}

fn parse_top(value: &str) -> Option<usize> {
    let top = value.trim().parse::<usize>().ok();
    if top.is_none() {
        log::debug!("skipping malformed $top {value:?}");
    }
    top
}

/// Decodes a URL query component, treating `+` as a space.
#[cfg(feature = "std")]
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Without `std`, components are taken verbatim apart from `+` as a space.
#[cfg(not(feature = "std"))]
fn decode_component(raw: &str) -> String {
    raw.replace('+', " ")
}
