//! Value semantics shared by both engines
//!
//! Subjects and facility arguments are `serde_json::Value`s; expressions run
//! over `evalexpr` values. JSON null becomes the empty value `()`, arrays
//! become tuples and objects become tuples of `(key, value)` pairs.

use crate::error::{EvaluationError, FacilityError};
use evalexpr::Value as EvalValue;
use regex::Regex;
use serde_json::{Number, Value};

/// Returns the type name of a value as reported in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Type name of an evaluator value, using the JSON vocabulary
pub fn eval_type_name(value: &EvalValue) -> &'static str {
    match value {
        EvalValue::Empty => "null",
        EvalValue::Boolean(_) => "boolean",
        EvalValue::Int(_) => "integer",
        EvalValue::Float(_) => "float",
        EvalValue::String(_) => "string",
        EvalValue::Tuple(_) => "array",
    }
}

/// Converts a JSON value into an evaluator value
pub fn to_eval(value: &Value) -> EvalValue {
    match value {
        Value::Null => EvalValue::Empty,
        Value::Bool(b) => EvalValue::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => EvalValue::Int(i),
            None => EvalValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => EvalValue::String(s.clone()),
        Value::Array(items) => EvalValue::Tuple(items.iter().map(to_eval).collect()),
        Value::Object(map) => EvalValue::Tuple(
            map.iter()
                .map(|(key, item)| EvalValue::Tuple(vec![EvalValue::String(key.clone()), to_eval(item)]))
                .collect(),
        ),
    }
}

/// Converts an evaluator value back into JSON
///
/// Non-finite floats have no JSON form and become null.
pub fn from_eval(value: &EvalValue) -> Value {
    match value {
        EvalValue::Empty => Value::Null,
        EvalValue::Boolean(b) => Value::Bool(*b),
        EvalValue::Int(i) => Value::from(*i),
        EvalValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        EvalValue::String(s) => Value::String(s.clone()),
        EvalValue::Tuple(items) => Value::Array(items.iter().map(from_eval).collect()),
    }
}

/// Renders a value for template output; strings are not quoted
pub fn to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Structural equality, comparing integers and floats numerically
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => lhs == rhs,
    }
}

/// Returns true for null, the empty string, and empty arrays and objects
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn invalid_argument(function: &str, message: String) -> FacilityError {
    FacilityError::InvalidArgument {
        function: function.to_string(),
        message,
    }
}

/// Returns the size of a string (in chars), array or object; null has size 0
pub fn size(function: &str, value: &Value) -> Result<i64, FacilityError> {
    let len = match value {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        other => {
            return Err(invalid_argument(
                function,
                format!("{} has no size", type_name(other)),
            ));
        }
    };
    i64::try_from(len).map_err(|_| invalid_argument(function, "size overflows".to_string()))
}

/// Membership test
///
/// Arrays test element equality, strings test substrings, objects test keys.
pub fn contains(function: &str, container: &Value, item: &Value) -> Result<bool, FacilityError> {
    match container {
        Value::Array(items) => Ok(items.iter().any(|candidate| values_equal(candidate, item))),
        Value::String(s) => Ok(s.contains(to_display(item).as_str())),
        Value::Object(map) => Ok(item.as_str().is_some_and(|key| map.contains_key(key))),
        other => Err(invalid_argument(
            function,
            format!("cannot search in {}", type_name(other)),
        )),
    }
}

/// Whole-string regular expression match
pub fn regex_matches(function: &str, text: &str, pattern: &str) -> Result<bool, FacilityError> {
    let anchored = format!("^(?:{})$", pattern);
    let regex = Regex::new(&anchored)
        .map_err(|e| invalid_argument(function, format!("invalid pattern '{}': {}", pattern, e)))?;
    Ok(regex.is_match(text))
}

/// Permissive conversion of a value to a boolean
///
/// Booleans pass through, numbers are true when non-zero, and the strings
/// `true|on|yes|1` / `false|off|no|0` (trimmed, case-insensitive) convert.
/// Null, unrecognized strings, arrays and objects do not convert.
pub fn coerce_to_bool(value: &Value) -> Result<bool, EvaluationError> {
    let not_convertible = || EvaluationError::NotConvertible {
        actual: type_name(value),
        value: value.to_string(),
    };

    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            _ => Err(not_convertible()),
        },
        Value::Null | Value::Array(_) | Value::Object(_) => Err(not_convertible()),
    }
}
