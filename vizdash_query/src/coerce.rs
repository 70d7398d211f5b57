// Copyright 2026 the VizDash Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric and string coercion shared by filtering, sorting and aggregation.
//!
//! Every place that reads a record field as a number or as a string goes through this module.
//! Absent fields are passed as `None` and coerce exactly like [`Value::Null`].
//!
//! There are two fallbacks for values that are not numeric, selected by [`NumericFallback`]:
//! totals treat them as `0`, while grouping sums count them as `1` so that a grouped widget over
//! a non-numeric value column degrades to a frequency count.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;

use crate::Value;

/// What a non-numeric value contributes to a numeric accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFallback {
    /// Contributes `0` (used for totals and averages).
    Zero,
    /// Contributes `1` (used for grouping sums).
    Unit,
}

impl NumericFallback {
    /// The numeric contribution of a non-numeric value.
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Unit => 1.0,
        }
    }
}

/// Parses a complete string as a finite number.
///
/// Leading and trailing whitespace is ignored. Empty strings, partial numbers (`"12abc"`) and
/// non-finite results (`"inf"`, `"NaN"`, `"1e400"`) are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerces a field value to a number.
///
/// - numbers pass through (NaN is not numeric),
/// - text is parsed with [`parse_number`],
/// - booleans become `1`/`0`,
/// - null and absent values are not numeric.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) if n.is_nan() => None,
        Value::Number(n) => Some(*n),
        Value::Text(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => None,
    }
}

/// Coerces a field value to a number, substituting `fallback` for non-numeric values.
pub fn number_or(value: Option<&Value>, fallback: NumericFallback) -> f64 {
    to_number(value).unwrap_or(fallback.value())
}

/// Coerces a field value to its string form.
///
/// Integral numbers print without a fractional part (`5.0` prints as `5`), and negative zero
/// prints as `0`.
pub fn to_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        Some(Value::Text(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(format_number(*n)),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        Some(Value::Bool(false)) => Cow::Borrowed("false"),
        Some(Value::Null) | None => Cow::Borrowed("null"),
    }
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    format!("{n}")
}

/// Natural ordering of two field values.
///
/// Two numbers compare numerically; anything else compares by string form. Absent and null
/// values order before every present value and equal to each other.
pub fn natural_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (a, b) => to_text(a).cmp(&to_text(b)),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn text_numbers_parse_only_when_complete() {
        assert_eq!(to_number(Some(&Value::from(" 12.5 "))), Some(12.5));
        assert_eq!(to_number(Some(&Value::from("12abc"))), None);
        assert_eq!(to_number(Some(&Value::from(""))), None);
        assert_eq!(to_number(Some(&Value::from("inf"))), None);
        assert_eq!(to_number(Some(&Value::Number(f64::NAN))), None);
        assert_eq!(to_number(Some(&Value::Bool(true))), Some(1.0));
        assert_eq!(to_number(None), None);
    }

    #[test]
    fn fallbacks_differ_between_totals_and_grouping() {
        let text = Value::from("n/a");
        assert_eq!(number_or(Some(&text), NumericFallback::Zero), 0.0);
        assert_eq!(number_or(Some(&text), NumericFallback::Unit), 1.0);
        assert_eq!(number_or(None, NumericFallback::Unit), 1.0);
        assert_eq!(number_or(Some(&Value::from(4.0)), NumericFallback::Unit), 4.0);
    }

    #[test]
    fn numbers_print_without_trailing_fraction() {
        assert_eq!(to_text(Some(&Value::from(5.0))), "5");
        assert_eq!(to_text(Some(&Value::from(2.5))), "2.5");
        assert_eq!(to_text(Some(&Value::from(-0.0))), "0");
        assert_eq!(to_text(Some(&Value::Null)), "null");
        assert_eq!(to_text(None), "null");
    }

    #[test]
    fn natural_order_is_numeric_only_for_two_numbers() {
        let two = Value::from(2.0);
        let ten = Value::from(10.0);
        assert_eq!(natural_cmp(Some(&two), Some(&ten)), Ordering::Less);

        let two_text = Value::from("2");
        let ten_text = Value::from("10");
        assert_eq!(natural_cmp(Some(&two_text), Some(&ten_text)), Ordering::Greater);

        assert_eq!(natural_cmp(None, Some(&two)), Ordering::Less);
        assert_eq!(natural_cmp(Some(&Value::Null), None), Ordering::Equal);
    }
}
