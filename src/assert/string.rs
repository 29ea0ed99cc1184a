//! String refinements.
//!
//! Each assertion first checks that the value is a string (`E_NOT_STRING`)
//! and only then applies its own refinement.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use super::types::as_str;
use crate::error::AssertionError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern is valid")
});

fn format_error(code: &str, format: &str, value: &Value) -> AssertionError {
    AssertionError::new(code, format!("expected a string in {format} format"))
        .with_value(value)
        .with_schema(json!({ "type": "string", "format": format }))
}

/// Asserts that the value is a string with at least one character.
pub fn assert_string_not_empty(value: &Value) -> Result<(), AssertionError> {
    if as_str(value)?.is_empty() {
        return Err(
            AssertionError::new("E_STRING_EMPTY", "expected a non-empty string")
                .with_value(value)
                .with_schema(json!({ "type": "string", "minLength": 1 })),
        );
    }
    Ok(())
}

/// Asserts that the value is a string containing something other than whitespace.
pub fn assert_string_not_blank(value: &Value) -> Result<(), AssertionError> {
    if as_str(value)?.trim().is_empty() {
        return Err(
            AssertionError::new("E_STRING_BLANK", "expected a string with visible characters")
                .with_value(value)
                .with_schema(json!({ "type": "string", "pattern": r"\S" })),
        );
    }
    Ok(())
}

/// Asserts that the value looks like an email address (`local@domain.tld`).
///
/// ```rust
/// use vouch::assert::assert_string_email;
/// use serde_json::json;
///
/// assert!(assert_string_email(&json!("a@b.com")).is_ok());
/// assert_eq!(
///     assert_string_email(&json!("a@b")).unwrap_err().name,
///     "E_STRING_NOT_EMAIL"
/// );
/// ```
pub fn assert_string_email(value: &Value) -> Result<(), AssertionError> {
    if EMAIL.is_match(as_str(value)?) {
        Ok(())
    } else {
        Err(format_error("E_STRING_NOT_EMAIL", "email", value))
    }
}

/// Asserts that the value is an absolute URL with a host.
pub fn assert_string_url(value: &Value) -> Result<(), AssertionError> {
    match url::Url::parse(as_str(value)?) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(format_error("E_STRING_NOT_URL", "uri", value)),
    }
}

/// Asserts that the value is a hyphenated UUID (any version, any case).
pub fn assert_string_uuid(value: &Value) -> Result<(), AssertionError> {
    if UUID.is_match(as_str(value)?) {
        Ok(())
    } else {
        Err(format_error("E_STRING_NOT_UUID", "uuid", value))
    }
}

/// Asserts that the value is a string holding a finite decimal number.
pub fn assert_string_numeric(value: &Value) -> Result<(), AssertionError> {
    parse_numeric(value).map(|_| ())
}

/// Asserts that the value is a string with no uppercase characters.
pub fn assert_string_lowercase(value: &Value) -> Result<(), AssertionError> {
    let s = as_str(value)?;
    if s == s.to_lowercase() {
        Ok(())
    } else {
        Err(AssertionError::new("E_STRING_NOT_LOWERCASE", "expected a lowercase string")
            .with_value(value))
    }
}

/// Asserts that the value is a string with no lowercase characters.
pub fn assert_string_uppercase(value: &Value) -> Result<(), AssertionError> {
    let s = as_str(value)?;
    if s == s.to_uppercase() {
        Ok(())
    } else {
        Err(AssertionError::new("E_STRING_NOT_UPPERCASE", "expected an uppercase string")
            .with_value(value))
    }
}

/// Returns an assertion requiring the string to match `pattern`.
///
/// ```rust
/// use vouch::assert::assert_string_matching;
/// use regex::Regex;
/// use serde_json::json;
///
/// let digits = assert_string_matching(Regex::new(r"^\d+$").unwrap());
/// assert!(digits(&json!("123")).is_ok());
/// assert_eq!(digits(&json!("12a")).unwrap_err().name, "E_STRING_NOT_MATCHING");
/// ```
pub fn assert_string_matching(
    pattern: Regex,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| check_matching(value, &pattern)
}

pub(crate) fn check_matching(value: &Value, pattern: &Regex) -> Result<(), AssertionError> {
    if pattern.is_match(as_str(value)?) {
        Ok(())
    } else {
        Err(AssertionError::new(
            "E_STRING_NOT_MATCHING",
            format!("expected a string matching '{}'", pattern.as_str()),
        )
        .with_value(value)
        .with_context("pattern", pattern.as_str())
        .with_schema(json!({ "type": "string", "pattern": pattern.as_str() })))
    }
}

/// Returns an assertion requiring between `min` and `max` characters (inclusive).
///
/// Length is measured in Unicode scalar values, not bytes.
pub fn assert_string_length_between(
    min: usize,
    max: usize,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let len = as_str(value)?.chars().count();
        if (min..=max).contains(&len) {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_STRING_LENGTH_OUT_OF_RANGE",
                format!("expected between {min} and {max} characters, got {len}"),
            )
            .with_value(value)
            .with_context("min", json!(min))
            .with_context("max", json!(max))
            .with_context("length", json!(len))
            .with_schema(json!({ "type": "string", "minLength": min, "maxLength": max })))
        }
    }
}

/// Returns an assertion requiring the string to start with `prefix`.
pub fn assert_string_starts_with(
    prefix: impl Into<String>,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    let prefix = prefix.into();
    move |value| {
        if as_str(value)?.starts_with(prefix.as_str()) {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_STRING_MISSING_PREFIX",
                format!("expected a string starting with '{prefix}'"),
            )
            .with_value(value)
            .with_context("prefix", prefix.as_str()))
        }
    }
}

/// Parses a numeric string, rejecting empty input and non-finite results.
pub(crate) fn parse_numeric(value: &Value) -> Result<f64, AssertionError> {
    let s = as_str(value)?.trim();
    match s.parse::<f64>() {
        Ok(n) if !s.is_empty() && n.is_finite() => Ok(n),
        _ => Err(
            AssertionError::new("E_STRING_NOT_NUMERIC", "expected a numeric string")
                .with_value(value),
        ),
    }
}
