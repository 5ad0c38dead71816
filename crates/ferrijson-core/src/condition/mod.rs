//! String condition language: `field operator value`.
//!
//! A condition such as `age >= 18` or `profile.role = "admin"` is parsed into
//! a [`Condition`] and evaluated against a JSON record. Parsing is memoized in
//! a [`ConditionCache`]; evaluation never fails and degrades to `false` on
//! type mismatches.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod cache;
pub mod eval;
pub mod parser;

pub use cache::ConditionCache;
pub use eval::{evaluate, resolve_path};
pub use parser::parse_condition;

/// The closed set of comparison operators understood in condition strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

/// Operators tried by the parser: longest symbol first, declaration order
/// among symbols of equal length.
static MATCH_ORDER: LazyLock<Vec<Operator>> = LazyLock::new(|| {
    let mut ops = Operator::ALL.to_vec();
    ops.sort_by_key(|op| std::cmp::Reverse(op.symbol().len()));
    ops
});

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// The symbol written in condition strings.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
        }
    }

    /// Look up an operator by its exact symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Operators in the order the parser searches for them.
    pub fn match_order() -> &'static [Operator] {
        &MATCH_ORDER
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a condition.
///
/// `Undefined` is distinct from JSON `null`: it only equals a field that is
/// absent from the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionValue {
    Undefined,
    Json(Value),
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        ConditionValue::Json(value)
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Undefined => f.write_str("undefined"),
            ConditionValue::Json(Value::String(s)) => write!(f, "\"{s}\""),
            ConditionValue::Json(v) => write!(f, "{v}"),
        }
    }
}

/// A parsed `field operator value` triple.
///
/// `field` may be a dot-separated path into nested objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    field: String,
    operator: Operator,
    value: ConditionValue,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    /// Evaluate this condition against a record.
    pub fn matches(&self, record: &Value) -> bool {
        evaluate(record, self)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// A record filter: either a condition string or an arbitrary closure.
///
/// Closures receive the raw record; they bypass parsing, caching and
/// dot-path resolution.
pub enum Predicate<'p> {
    Condition(&'p str),
    Func(Box<dyn Fn(&Value) -> bool + 'p>),
}

impl<'p> Predicate<'p> {
    pub fn func(f: impl Fn(&Value) -> bool + 'p) -> Self {
        Predicate::Func(Box::new(f))
    }
}

impl<'p> From<&'p str> for Predicate<'p> {
    fn from(raw: &'p str) -> Self {
        Predicate::Condition(raw)
    }
}

impl<'p> From<&'p String> for Predicate<'p> {
    fn from(raw: &'p String) -> Self {
        Predicate::Condition(raw.as_str())
    }
}

impl fmt::Debug for Predicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Condition(raw) => f.debug_tuple("Condition").field(raw).finish(),
            Predicate::Func(_) => f.write_str("Func(..)"),
        }
    }
}
