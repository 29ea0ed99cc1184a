//! Parsers: assertions that also transform the value.
//!
//! A parser has the shape `(&Value) -> Result<Value, AssertionError>`. It
//! validates its input like an assertion and returns a new value; the input
//! is never modified. Parsers plug into chains with
//! [`RuleChain::transform`](crate::RuleChain::transform).

use serde_json::{json, Value};

use crate::assert::{as_str, parse_numeric};
use crate::error::AssertionError;
use crate::value::{number_value, type_name};

/// Converts a numeric string to a number. Numbers pass through unchanged.
///
/// ```rust
/// use vouch::parse::to_number;
/// use serde_json::json;
///
/// assert_eq!(to_number(&json!("5")).unwrap(), json!(5));
/// assert_eq!(to_number(&json!(" 2.5 ")).unwrap(), json!(2.5));
/// assert_eq!(to_number(&json!("five")).unwrap_err().name, "E_STRING_NOT_NUMERIC");
/// ```
pub fn to_number(value: &Value) -> Result<Value, AssertionError> {
    if value.is_number() {
        return Ok(value.clone());
    }
    let n = parse_numeric(value)?;
    number_value(n).ok_or_else(|| {
        AssertionError::new("E_STRING_NOT_NUMERIC", "expected a numeric string").with_value(value)
    })
}

/// Converts a numeric string or number to an integer, rejecting fractions.
pub fn to_integer(value: &Value) -> Result<Value, AssertionError> {
    let number = to_number(value)?;
    match number.as_f64() {
        Some(n) if n.fract() == 0.0 => Ok(number),
        _ => Err(AssertionError::new("E_NOT_INTEGER", "expected an integer")
            .with_value(value)
            .with_schema(json!({ "type": "integer" }))),
    }
}

/// Converts common boolean spellings (`true`/`false`, `1`/`0`, `yes`/`no`,
/// `on`/`off`, case-insensitive) to a boolean. Booleans pass through.
pub fn to_boolean(value: &Value) -> Result<Value, AssertionError> {
    if value.is_boolean() {
        return Ok(value.clone());
    }
    match as_str(value)?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
        _ => Err(
            AssertionError::new("E_STRING_NOT_BOOLEAN", "expected a boolean string")
                .with_value(value),
        ),
    }
}

/// Renders strings, numbers and booleans as a string.
pub fn to_string_value(value: &Value) -> Result<Value, AssertionError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(AssertionError::new(
            "E_NOT_SCALAR",
            format!("expected a string, number or boolean, got {}", type_name(value)),
        )
        .with_value(value)),
    }
}

/// Uppercases a string.
pub fn to_upper_case(value: &Value) -> Result<Value, AssertionError> {
    Ok(Value::String(as_str(value)?.to_uppercase()))
}

/// Lowercases a string.
pub fn to_lower_case(value: &Value) -> Result<Value, AssertionError> {
    Ok(Value::String(as_str(value)?.to_lowercase()))
}

/// Strips leading and trailing whitespace from a string.
pub fn trim(value: &Value) -> Result<Value, AssertionError> {
    Ok(Value::String(as_str(value)?.trim().to_string()))
}

/// Parses a string as JSON.
pub fn parse_json(value: &Value) -> Result<Value, AssertionError> {
    serde_json::from_str(as_str(value)?).map_err(|e| {
        AssertionError::new("E_STRING_NOT_JSON", format!("expected a JSON string: {e}"))
            .with_value(value)
            .with_context("line", json!(e.line()))
            .with_context("column", json!(e.column()))
    })
}

/// Returns a parser splitting a string on `separator` into an array of strings.
pub fn split(
    separator: impl Into<String>,
) -> impl Fn(&Value) -> Result<Value, AssertionError> + Clone + Send + Sync + 'static {
    let separator = separator.into();
    move |value| {
        let parts = as_str(value)?
            .split(separator.as_str())
            .map(|part| Value::String(part.to_string()))
            .collect();
        Ok(Value::Array(parts))
    }
}
