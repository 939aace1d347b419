//! Value comparison for condition leaves.
//!
//! Numeric comparison is used whenever both sides are numeric (a
//! number, or text that parses as a decimal). Otherwise equality is
//! structural and membership is list- or substring-based. Comparisons
//! never fail: operands of the wrong kind simply do not satisfy the
//! operator.

use std::cmp::Ordering;

use quickcluster_core::{Operator, Value};

/// Applies `op` with the submitted value on the left and the schema
/// literal on the right.
pub fn compare_values(actual: &Value, op: Operator, literal: &Value) -> bool {
    match op {
        Operator::Eq => values_equal(actual, literal),
        Operator::Ne => !values_equal(actual, literal),
        Operator::Lt => ordering(actual, literal) == Some(Ordering::Less),
        Operator::Le => matches!(
            ordering(actual, literal),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::Gt => ordering(actual, literal) == Some(Ordering::Greater),
        Operator::Ge => matches!(
            ordering(actual, literal),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::In => is_member(actual, literal),
        Operator::NotIn => !is_member(actual, literal),
    }
}

fn ordering(l: &Value, r: &Value) -> Option<Ordering> {
    Some(l.as_decimal()?.cmp(&r.as_decimal()?))
}

/// Structural equality with numeric and boolean-text coercion.
pub fn values_equal(l: &Value, r: &Value) -> bool {
    if let (Some(a), Some(b)) = (l.as_decimal(), r.as_decimal()) {
        return a == b;
    }
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Bool(b), Value::Text(t)) | (Value::Text(t), Value::Bool(b)) => {
            parse_bool(t) == Some(*b)
        }
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

/// `actual in literal`.
///
/// - literal is a list: the value (or every element of a list value)
///   is one of its elements
/// - value is a list: it contains the literal
/// - both are text: the value is a substring of the literal
fn is_member(actual: &Value, literal: &Value) -> bool {
    match (actual, literal) {
        (Value::List(selected), Value::List(allowed)) => selected
            .iter()
            .all(|s| allowed.iter().any(|a| values_equal(s, a))),
        (_, Value::List(allowed)) => allowed.iter().any(|a| values_equal(actual, a)),
        (Value::List(items), _) => items.iter().any(|i| values_equal(i, literal)),
        (Value::Text(needle), Value::Text(haystack)) => haystack.contains(needle.as_str()),
        _ => values_equal(actual, literal),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
