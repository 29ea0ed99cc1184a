//! Base type assertions.
//!
//! Every refined assertion in the crate starts by calling one of these, so a
//! value of the wrong type is always reported with the most basic error.

use serde_json::{json, Map, Value};

use crate::error::AssertionError;
use crate::value::type_name;

fn not_type(code: &str, expected: &str, value: &Value) -> AssertionError {
    AssertionError::new(
        code,
        format!("expected {}, got {}", expected, type_name(value)),
    )
    .with_value(value)
}

/// Asserts that the value is a string.
///
/// ```rust
/// use vouch::assert::assert_string;
/// use serde_json::json;
///
/// assert!(assert_string(&json!("hello")).is_ok());
/// assert_eq!(assert_string(&json!(42)).unwrap_err().name, "E_NOT_STRING");
/// ```
pub fn assert_string(value: &Value) -> Result<(), AssertionError> {
    as_str(value).map(|_| ())
}

/// Asserts that the value is a number.
pub fn assert_number(value: &Value) -> Result<(), AssertionError> {
    as_f64(value).map(|_| ())
}

/// Asserts that the value is a number without a fractional part.
pub fn assert_integer(value: &Value) -> Result<(), AssertionError> {
    as_integer(value).map(|_| ())
}

/// Asserts that the value is a boolean.
pub fn assert_boolean(value: &Value) -> Result<(), AssertionError> {
    match value {
        Value::Bool(_) => Ok(()),
        _ => Err(not_type("E_NOT_BOOLEAN", "boolean", value)
            .with_schema(json!({ "type": "boolean" }))),
    }
}

/// Asserts that the value is an array.
pub fn assert_array(value: &Value) -> Result<(), AssertionError> {
    as_array(value).map(|_| ())
}

/// Asserts that the value is an object.
pub fn assert_object(value: &Value) -> Result<(), AssertionError> {
    as_object(value).map(|_| ())
}

/// Asserts that the value is `null`.
///
/// JSON has no separate "undefined", so `null` also stands for an absent field.
pub fn assert_null(value: &Value) -> Result<(), AssertionError> {
    if value.is_null() {
        Ok(())
    } else {
        Err(not_type("E_NOT_NULL", "null", value).with_schema(json!({ "type": "null" })))
    }
}

/// Asserts that the value is present (not `null`).
pub fn assert_not_null(value: &Value) -> Result<(), AssertionError> {
    if value.is_null() {
        Err(AssertionError::new("E_IS_NULL", "expected a value, got null")
            .with_value(value)
            .with_schema(json!({ "not": { "type": "null" } })))
    } else {
        Ok(())
    }
}

pub(crate) fn as_str(value: &Value) -> Result<&str, AssertionError> {
    value.as_str().ok_or_else(|| {
        not_type("E_NOT_STRING", "string", value).with_schema(json!({ "type": "string" }))
    })
}

pub(crate) fn as_f64(value: &Value) -> Result<f64, AssertionError> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            not_type("E_NOT_NUMBER", "number", value).with_schema(json!({ "type": "number" }))
        })
}

pub(crate) fn as_integer(value: &Value) -> Result<f64, AssertionError> {
    let n = as_f64(value)?;
    if n.fract() == 0.0 {
        Ok(n)
    } else {
        Err(AssertionError::new("E_NOT_INTEGER", format!("expected an integer, got {n}"))
            .with_value(value)
            .with_schema(json!({ "type": "integer" })))
    }
}

pub(crate) fn as_array(value: &Value) -> Result<&Vec<Value>, AssertionError> {
    value.as_array().ok_or_else(|| {
        not_type("E_NOT_ARRAY", "array", value).with_schema(json!({ "type": "array" }))
    })
}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>, AssertionError> {
    value.as_object().ok_or_else(|| {
        not_type("E_NOT_OBJECT", "object", value).with_schema(json!({ "type": "object" }))
    })
}
