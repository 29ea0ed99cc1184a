//! Numeric refinements.
//!
//! Non-numbers never reach a range, sign or parity check: they fail with
//! `E_NOT_NUMBER` (or `E_NOT_INTEGER` for parity) first.

use serde_json::{json, Value};

use super::types::{as_f64, as_integer};
use crate::error::AssertionError;
use crate::value::MAX_SAFE_INTEGER;

fn number_error(code: &str, message: String, value: &Value) -> AssertionError {
    AssertionError::new(code, message).with_value(value)
}

/// Returns an assertion requiring a number in `min..=max`.
///
/// ```rust
/// use vouch::assert::assert_number_in_range;
/// use serde_json::json;
///
/// let percent = assert_number_in_range(0.0, 100.0);
/// assert!(percent(&json!(42)).is_ok());
/// assert_eq!(percent(&json!(101)).unwrap_err().name, "E_NUMBER_OUT_OF_RANGE");
/// assert_eq!(percent(&json!("42")).unwrap_err().name, "E_NOT_NUMBER");
/// ```
pub fn assert_number_in_range(
    min: f64,
    max: f64,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let n = as_f64(value)?;
        if n >= min && n <= max {
            Ok(())
        } else {
            Err(number_error(
                "E_NUMBER_OUT_OF_RANGE",
                format!("expected a number between {min} and {max}, got {n}"),
                value,
            )
            .with_context("min", json!(min))
            .with_context("max", json!(max))
            .with_schema(json!({ "type": "number", "minimum": min, "maximum": max })))
        }
    }
}

/// Returns an assertion requiring a number strictly greater than `bound`.
pub fn assert_number_greater_than(
    bound: f64,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let n = as_f64(value)?;
        if n > bound {
            Ok(())
        } else {
            Err(number_error(
                "E_NUMBER_NOT_GREATER",
                format!("expected a number greater than {bound}, got {n}"),
                value,
            )
            .with_context("bound", json!(bound))
            .with_schema(json!({ "type": "number", "exclusiveMinimum": bound })))
        }
    }
}

/// Returns an assertion requiring a number strictly less than `bound`.
pub fn assert_number_less_than(
    bound: f64,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let n = as_f64(value)?;
        if n < bound {
            Ok(())
        } else {
            Err(number_error(
                "E_NUMBER_NOT_LESS",
                format!("expected a number less than {bound}, got {n}"),
                value,
            )
            .with_context("bound", json!(bound))
            .with_schema(json!({ "type": "number", "exclusiveMaximum": bound })))
        }
    }
}

/// Asserts that the value is a number greater than zero.
pub fn assert_number_positive(value: &Value) -> Result<(), AssertionError> {
    let n = as_f64(value)?;
    if n > 0.0 {
        Ok(())
    } else {
        Err(number_error(
            "E_NUMBER_NOT_POSITIVE",
            format!("expected a positive number, got {n}"),
            value,
        ))
    }
}

/// Asserts that the value is a number less than zero.
pub fn assert_number_negative(value: &Value) -> Result<(), AssertionError> {
    let n = as_f64(value)?;
    if n < 0.0 {
        Ok(())
    } else {
        Err(number_error(
            "E_NUMBER_NOT_NEGATIVE",
            format!("expected a negative number, got {n}"),
            value,
        ))
    }
}

/// Asserts that the value is a number greater than or equal to zero.
pub fn assert_number_non_negative(value: &Value) -> Result<(), AssertionError> {
    let n = as_f64(value)?;
    if n >= 0.0 {
        Ok(())
    } else {
        Err(number_error(
            "E_NUMBER_NEGATIVE",
            format!("expected a non-negative number, got {n}"),
            value,
        ))
    }
}

/// Asserts that the value is an even integer.
pub fn assert_number_even(value: &Value) -> Result<(), AssertionError> {
    let n = as_integer(value)?;
    if n % 2.0 == 0.0 {
        Ok(())
    } else {
        Err(number_error("E_NUMBER_NOT_EVEN", format!("expected an even number, got {n}"), value))
    }
}

/// Asserts that the value is an odd integer.
pub fn assert_number_odd(value: &Value) -> Result<(), AssertionError> {
    let n = as_integer(value)?;
    if n % 2.0 != 0.0 {
        Ok(())
    } else {
        Err(number_error("E_NUMBER_NOT_ODD", format!("expected an odd number, got {n}"), value))
    }
}

/// Asserts that the value is an integer a double can represent exactly.
pub fn assert_integer_safe(value: &Value) -> Result<(), AssertionError> {
    let n = as_integer(value)?;
    if n.abs() <= MAX_SAFE_INTEGER {
        Ok(())
    } else {
        Err(number_error(
            "E_NUMBER_UNSAFE_INTEGER",
            format!("expected an integer within ±{MAX_SAFE_INTEGER}, got {n}"),
            value,
        ))
    }
}
