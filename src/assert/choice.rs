//! Membership and equality assertions.

use serde_json::{json, Value};

use crate::error::AssertionError;

fn not_allowed(value: &Value, allowed: &[Value]) -> AssertionError {
    let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
    AssertionError::new(
        "E_VALUE_NOT_ALLOWED",
        format!("expected one of {}, got {}", listed.join(", "), value),
    )
    .with_value(value)
    .with_context("allowed", Value::Array(allowed.to_vec()))
    .with_schema(json!({ "enum": allowed }))
}

/// Returns an assertion requiring the value to equal one of `allowed`.
///
/// The allowed values are copied when the assertion is created, so later
/// changes to the caller's collection do not affect it.
///
/// ```rust
/// use vouch::assert::assert_one_of;
/// use serde_json::json;
///
/// let role = assert_one_of([json!("admin"), json!("user")]);
/// assert!(role(&json!("user")).is_ok());
/// assert_eq!(role(&json!("root")).unwrap_err().name, "E_VALUE_NOT_ALLOWED");
/// ```
pub fn assert_one_of<I>(
    allowed: I,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static
where
    I: IntoIterator<Item = Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().collect();
    move |value| assert_in(value, &allowed)
}

/// Asserts that `value` equals one of `allowed`.
///
/// This is the bound form of [`assert_one_of`], meant for
/// [`Rule::bind`](crate::Rule::bind) where the allowed set is supplied as
/// bound parameters.
pub fn assert_in(value: &Value, allowed: &[Value]) -> Result<(), AssertionError> {
    if allowed.contains(value) {
        Ok(())
    } else {
        Err(not_allowed(value, allowed))
    }
}

/// Returns an assertion requiring the value to equal `expected`.
pub fn assert_equals(
    expected: Value,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        if *value == expected {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_VALUE_NOT_EQUAL",
                format!("expected {expected}, got {value}"),
            )
            .with_value(value)
            .with_context("expected", expected.clone())
            .with_schema(json!({ "const": expected })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_snapshots_config() {
        let mut allowed = vec![json!(1), json!(2)];
        let assertion = assert_one_of(allowed.clone());
        allowed.push(json!(3));

        assert!(assertion(&json!(2)).is_ok());
        assert!(assertion(&json!(3)).is_err());
    }

    #[test]
    fn test_in_context() {
        let error = assert_in(&json!("x"), &[json!("a"), json!("b")]).unwrap_err();
        assert_eq!(error.name, "E_VALUE_NOT_ALLOWED");
        assert_eq!(error.message, r#"expected one of "a", "b", got "x""#);
        assert_eq!(
            error.get("allowed").and_then(|d| d.as_value()),
            Some(&json!(["a", "b"]))
        );
        assert_eq!(error.schema, Some(json!({ "enum": ["a", "b"] })));
    }

    #[test]
    fn test_equals_is_type_strict() {
        let assertion = assert_equals(json!(1));
        assert!(assertion(&json!(1)).is_ok());
        assert_eq!(assertion(&json!("1")).unwrap_err().name, "E_VALUE_NOT_EQUAL");
    }
}
