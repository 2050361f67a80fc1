use std::cmp::Ordering;

use serde_json::Value;

use super::condition::Operator;

/// Numeric view of a JSON value. Booleans and numeric strings are not coerced.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Compare two numeric JSON values using an ordering operator.
///
/// Returns `None` when either side is not a number or `op` is not one of
/// `lt`, `lte`, `gt`, `gte`, `eq`, `neq`.
#[must_use]
pub fn compare_numbers(left: &Value, op: Operator, right: &Value) -> Option<bool> {
    let ord = as_number(left)?.partial_cmp(&as_number(right)?)?;
    Some(match op {
        Operator::Eq => ord == Ordering::Equal,
        Operator::Neq => ord != Ordering::Equal,
        Operator::Gt => ord == Ordering::Greater,
        Operator::Gte => ord != Ordering::Less,
        Operator::Lt => ord == Ordering::Less,
        Operator::Lte => ord != Ordering::Greater,
        _ => return None,
    })
}

/// Structural equality where integers and floats with the same magnitude are equal.
#[must_use]
pub fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            compare_numbers(left, Operator::Eq, right).unwrap_or(false)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        _ => left == right,
    }
}

/// `null`, a missing value and the empty string all count as blank.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Short JSON type name used in diagnostics.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value for explanation text. Integral floats print without a
/// fractional part so `180.0` reads as `180`.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(display).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}

/// Build a JSON number from an arithmetic result, rounded to cents.
///
/// When the value being replaced was an integer and the result is integral,
/// the integer representation is kept.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn price_value(amount: f64, previous: &Value) -> Value {
    let rounded = (amount * 100.0).round() / 100.0;
    let was_integer = previous.as_i64().is_some() || previous.as_u64().is_some();
    if was_integer && rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        Value::from(rounded as i64)
    } else {
        Value::from(rounded)
    }
}
