//! Condition string parser.
//!
//! Operator detection is a plain substring scan, not a tokenizer: symbols are
//! tried longest first, and the first occurrence of the first symbol found
//! anywhere in the input splits it into field and value. A value that itself
//! contains a longer operator symbol therefore splits in the wrong place
//! (`note = a>=b` splits on `>=`).

use serde_json::{Number, Value};

use super::{Condition, ConditionValue, Operator};

/// Parse a raw condition string without consulting any cache.
///
/// Returns `None` when no operator symbol occurs in `raw`.
pub fn parse_condition(raw: &str) -> Option<Condition> {
    let (operator, index) = Operator::match_order()
        .iter()
        .find_map(|&op| raw.find(op.symbol()).map(|i| (op, i)))?;

    let field = raw[..index].trim();
    let literal = raw[index + operator.symbol().len()..].trim();

    Some(Condition::new(
        field,
        operator,
        parse_literal(strip_quotes(literal)),
    ))
}

/// Remove one layer of matching `"` or `'` quotes.
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Type a dequoted literal: keywords, then numbers, then plain strings.
fn parse_literal(s: &str) -> ConditionValue {
    match s {
        "true" => ConditionValue::Json(Value::Bool(true)),
        "false" => ConditionValue::Json(Value::Bool(false)),
        "null" => ConditionValue::Json(Value::Null),
        "undefined" => ConditionValue::Undefined,
        _ => ConditionValue::Json(
            parse_number(s)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(s.to_string())),
        ),
    }
}

/// Integers stay integers; other finite decimals become `f64`.
fn parse_number(s: &str) -> Option<Number> {
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
