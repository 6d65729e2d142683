//! Value ordering for predicates, sorting and cursors
//!
//! Ordering rules:
//! - null < bool < number < string < array < object
//! - Same type: natural ordering; integers compare exactly
//! - Arrays compare element-wise, objects are equal to each other

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::query::Operator;

/// Rank of a value's type class
pub fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let (a_rank, b_rank) = (type_rank(a), type_rank(b));
    if a_rank != b_rank {
        return a_rank.cmp(&b_rank);
    }

    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_values(x, y))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        _ => Ordering::Equal,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Evaluates `actual <op> expected`. `actual` is `None` for a missing field.
///
/// Missing fields only satisfy `== null`. Range operators only match values
/// of the same type class.
pub fn matches(actual: Option<&Value>, op: Operator, expected: &Value) -> bool {
    let actual = match actual {
        Some(v) => v,
        None => return op == Operator::Equal && expected.is_null(),
    };

    match op {
        Operator::Equal => compare_values(actual, expected) == Ordering::Equal,
        Operator::NotEqual => compare_values(actual, expected) != Ordering::Equal,
        _ if type_rank(actual) != type_rank(expected) => false,
        Operator::LessThan => compare_values(actual, expected) == Ordering::Less,
        Operator::LessThanOrEqual => compare_values(actual, expected) != Ordering::Greater,
        Operator::GreaterThan => compare_values(actual, expected) == Ordering::Greater,
        Operator::GreaterThanOrEqual => compare_values(actual, expected) != Ordering::Less,
    }
}
