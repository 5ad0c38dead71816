//! Condition evaluation against JSON records.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::{Condition, ConditionValue, Operator};

/// Evaluate `condition` against `record`.
///
/// Never fails: comparisons between mismatched types evaluate to `false`.
pub fn evaluate(record: &Value, condition: &Condition) -> bool {
    let actual = resolve_path(record, condition.field());
    let expected = condition.value();

    match condition.operator() {
        Operator::Eq => strict_eq(actual, expected),
        Operator::Ne => !strict_eq(actual, expected),
        Operator::Gt => compare_numbers(actual, expected) == Some(Ordering::Greater),
        Operator::Lt => compare_numbers(actual, expected) == Some(Ordering::Less),
        Operator::Ge => matches!(
            compare_numbers(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Le => matches!(
            compare_numbers(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::Contains => string_pair(actual, expected).is_some_and(|(s, n)| s.contains(n)),
        Operator::StartsWith => {
            string_pair(actual, expected).is_some_and(|(s, p)| s.starts_with(p))
        }
        Operator::EndsWith => string_pair(actual, expected).is_some_and(|(s, p)| s.ends_with(p)),
    }
}

/// Resolve a dot-separated path on a record.
///
/// Returns `None` (undefined) when a segment is missing or when an
/// intermediate value is not an object. Array elements are not addressable.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Type-and-value equality. Undefined only equals undefined; numbers compare
/// by value regardless of their integer/float representation.
fn strict_eq(actual: Option<&Value>, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (None, ConditionValue::Undefined) => true,
        (Some(Value::Number(a)), ConditionValue::Json(Value::Number(b))) => numbers_eq(a, b),
        (Some(a), ConditionValue::Json(b)) => a == b,
        _ => false,
    }
}

fn numbers_eq(a: &Number, b: &Number) -> bool {
    number_cmp(a, b) == Some(Ordering::Equal)
}

/// Exact ordering when both sides are integers, `f64` ordering otherwise.
fn number_cmp(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Numeric ordering, only when both sides are numbers.
fn compare_numbers(actual: Option<&Value>, expected: &ConditionValue) -> Option<Ordering> {
    match (actual?, expected) {
        (Value::Number(a), ConditionValue::Json(Value::Number(b))) => number_cmp(a, b),
        _ => None,
    }
}

fn string_pair<'a>(
    actual: Option<&'a Value>,
    expected: &'a ConditionValue,
) -> Option<(&'a str, &'a str)> {
    match (actual?, expected) {
        (Value::String(s), ConditionValue::Json(Value::String(needle))) => {
            Some((s.as_str(), needle.as_str()))
        }
        _ => None,
    }
}
