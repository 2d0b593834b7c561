//! Predicate library
//!
//! A closed set of pure predicates over JSON values. Unary predicates
//! inspect the subject only; binary predicates compare the subject
//! against a second operand.

use crate::condition::cache;
use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Number of operands a predicate consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

/// Predicate selected on a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    IsNone,
    IsNotNone,
    IsEmpty,
    IsNotEmpty,
    IsBool,
    IsInteger,
    IsNumber,
    IsString,
    IsEqual,
    IsNotEqual,
    IsLess,
    IsLessEqual,
    IsGreater,
    IsGreaterEqual,
    IsMatch,
}

impl Predicate {
    pub const ALL: [Predicate; 15] = [
        Predicate::IsNone,
        Predicate::IsNotNone,
        Predicate::IsEmpty,
        Predicate::IsNotEmpty,
        Predicate::IsBool,
        Predicate::IsInteger,
        Predicate::IsNumber,
        Predicate::IsString,
        Predicate::IsEqual,
        Predicate::IsNotEqual,
        Predicate::IsLess,
        Predicate::IsLessEqual,
        Predicate::IsGreater,
        Predicate::IsGreaterEqual,
        Predicate::IsMatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Predicate::IsNone => "is_none",
            Predicate::IsNotNone => "is_not_none",
            Predicate::IsEmpty => "is_empty",
            Predicate::IsNotEmpty => "is_not_empty",
            Predicate::IsBool => "is_bool",
            Predicate::IsInteger => "is_integer",
            Predicate::IsNumber => "is_number",
            Predicate::IsString => "is_string",
            Predicate::IsEqual => "is_equal",
            Predicate::IsNotEqual => "is_not_equal",
            Predicate::IsLess => "is_less",
            Predicate::IsLessEqual => "is_less_equal",
            Predicate::IsGreater => "is_greater",
            Predicate::IsGreaterEqual => "is_greater_equal",
            Predicate::IsMatch => "is_match",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Predicate::IsNone
            | Predicate::IsNotNone
            | Predicate::IsEmpty
            | Predicate::IsNotEmpty
            | Predicate::IsBool
            | Predicate::IsInteger
            | Predicate::IsNumber
            | Predicate::IsString => Arity::Unary,
            _ => Arity::Binary,
        }
    }

    /// Apply the predicate. Unary predicates ignore `b`; a binary
    /// predicate given no second operand compares against null.
    pub fn apply(self, a: &Value, b: Option<&Value>) -> bool {
        let b = b.unwrap_or(&Value::Null);
        match self {
            Predicate::IsNone => a.is_null(),
            Predicate::IsNotNone => !a.is_null(),
            Predicate::IsEmpty => is_empty(a),
            Predicate::IsNotEmpty => !is_empty(a),
            Predicate::IsBool => a.is_boolean(),
            Predicate::IsInteger => is_integer(a),
            Predicate::IsNumber => a.is_number(),
            Predicate::IsString => a.is_string(),
            Predicate::IsEqual => is_equal(a, b),
            Predicate::IsNotEqual => !is_equal(a, b),
            Predicate::IsLess => compare_holds(a, b, |o| o == Ordering::Less),
            Predicate::IsLessEqual => compare_holds(a, b, |o| o != Ordering::Greater),
            Predicate::IsGreater => compare_holds(a, b, |o| o == Ordering::Greater),
            Predicate::IsGreaterEqual => compare_holds(a, b, |o| o != Ordering::Less),
            Predicate::IsMatch => match (a, b) {
                (Value::String(haystack), Value::String(pattern)) => {
                    cache::is_match(pattern, haystack)
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn is_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Ordering between two scalars: numbers numerically, strings lexically
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Exact numeric ordering; integers are never rounded through f64
fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    match (as_integer(x), as_integer(y)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => compare_integer_float(x, y.as_f64()?),
        (None, Some(y)) => compare_integer_float(y, x.as_f64()?).map(Ordering::reverse),
        (None, None) => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

#[inline]
fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn compare_integer_float(int: i128, float: f64) -> Option<Ordering> {
    // 2^127: every i64/u64 lies strictly inside (-2^127, 2^127)
    const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    if float.is_nan() {
        return None;
    }
    if float >= I128_BOUND {
        return Some(Ordering::Less);
    }
    if float < -I128_BOUND {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(float - whole)),
        other => Some(other),
    }
}

/// Evaluate an ordering test; an array subject holds only if every
/// element holds
fn compare_holds(a: &Value, b: &Value, test: impl Fn(Ordering) -> bool) -> bool {
    match a {
        Value::Array(items) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|item| compare(item, b).is_some_and(&test))
        }
        _ => compare(a, b).is_some_and(test),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arity() {
        assert_eq!(Predicate::IsEmpty.arity(), Arity::Unary);
        assert_eq!(Predicate::IsString.arity(), Arity::Unary);
        assert_eq!(Predicate::IsGreater.arity(), Arity::Binary);
        assert_eq!(Predicate::IsMatch.arity(), Arity::Binary);
    }

    #[test]
    fn test_none_and_empty() {
        assert!(Predicate::IsNone.apply(&Value::Null, None));
        assert!(!Predicate::IsNone.apply(&json!(0), None));
        assert!(Predicate::IsEmpty.apply(&json!(""), None));
        assert!(Predicate::IsEmpty.apply(&json!([]), None));
        assert!(Predicate::IsEmpty.apply(&json!({}), None));
        assert!(Predicate::IsEmpty.apply(&Value::Null, None));
        assert!(!Predicate::IsEmpty.apply(&json!(0), None));
        assert!(!Predicate::IsEmpty.apply(&json!(false), None));
        assert!(Predicate::IsNotEmpty.apply(&json!("x"), None));
    }

    #[test]
    fn test_type_predicates() {
        assert!(Predicate::IsBool.apply(&json!(true), None));
        assert!(Predicate::IsInteger.apply(&json!(3), None));
        assert!(!Predicate::IsInteger.apply(&json!(3.5), None));
        assert!(!Predicate::IsInteger.apply(&json!(true), None));
        assert!(Predicate::IsNumber.apply(&json!(3.5), None));
        assert!(Predicate::IsString.apply(&json!("3"), None));
        assert!(!Predicate::IsString.apply(&json!(3), None));
    }

    #[test]
    fn test_equality() {
        assert!(Predicate::IsEqual.apply(&json!(1), Some(&json!(1.0))));
        assert!(Predicate::IsEqual.apply(&json!("a"), Some(&json!("a"))));
        assert!(Predicate::IsEqual.apply(&json!([1, 2]), Some(&json!([1, 2]))));
        assert!(Predicate::IsNotEqual.apply(&json!("1"), Some(&json!(1))));
    }

    #[test]
    fn test_ordering() {
        assert!(Predicate::IsGreater.apply(&json!(5), Some(&json!(3))));
        assert!(!Predicate::IsGreater.apply(&json!(3), Some(&json!(3))));
        assert!(Predicate::IsGreaterEqual.apply(&json!(3), Some(&json!(3.0))));
        assert!(Predicate::IsLess.apply(&json!(2.5), Some(&json!(3))));
        assert!(Predicate::IsLessEqual.apply(&json!("abc"), Some(&json!("abd"))));
        assert!(Predicate::IsLess.apply(&json!(-1), Some(&json!(u64::MAX))));
    }

    #[test]
    fn test_integer_float_comparison_is_exact() {
        let above = json!(9_007_199_254_740_993i64);
        let float = json!(9_007_199_254_740_992.0);
        assert!(!Predicate::IsEqual.apply(&above, Some(&float)));
        assert!(Predicate::IsGreater.apply(&above, Some(&float)));
        assert!(Predicate::IsLess.apply(&float, Some(&above)));

        let exact = json!(9_007_199_254_740_992i64);
        assert!(Predicate::IsEqual.apply(&exact, Some(&float)));
        assert!(Predicate::IsEqual.apply(&float, Some(&exact)));

        assert!(Predicate::IsLess.apply(&json!(2), Some(&json!(2.5))));
        assert!(Predicate::IsGreater.apply(&json!(-2), Some(&json!(-2.5))));
        assert!(Predicate::IsLess.apply(&json!(u64::MAX), Some(&json!(1e300))));
        assert!(Predicate::IsGreater.apply(&json!(i64::MIN), Some(&json!(-1e300))));
    }

    #[test]
    fn test_ordering_mismatched_types_is_false() {
        assert!(!Predicate::IsGreater.apply(&json!("5"), Some(&json!(3))));
        assert!(!Predicate::IsLess.apply(&Value::Null, Some(&json!(3))));
        assert!(!Predicate::IsLess.apply(&json!(3), None));
    }

    #[test]
    fn test_array_ordering() {
        assert!(Predicate::IsGreater.apply(&json!([4, 5, 6]), Some(&json!(3))));
        assert!(!Predicate::IsGreater.apply(&json!([1, 5, 6]), Some(&json!(3))));
        assert!(!Predicate::IsGreater.apply(&json!([]), Some(&json!(3))));
    }

    #[test]
    fn test_match() {
        assert!(Predicate::IsMatch.apply(&json!("order-123"), Some(&json!(r"\d{3}"))));
        assert!(!Predicate::IsMatch.apply(&json!("order"), Some(&json!(r"\d"))));
        assert!(!Predicate::IsMatch.apply(&json!(123), Some(&json!(r"\d"))));
        assert!(!Predicate::IsMatch.apply(&json!("["), Some(&json!("["))));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Predicate::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Predicate::ALL.len());
    }
}
