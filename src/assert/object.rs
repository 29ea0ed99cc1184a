//! Object refinements and per-value validation.

use serde_json::{json, Value};

use super::types::as_object;
use crate::error::AssertionError;
use crate::rule::{Rule, RuleMap};

/// Asserts that the value is an object with at least one property.
pub fn assert_object_not_empty(value: &Value) -> Result<(), AssertionError> {
    if as_object(value)?.is_empty() {
        return Err(AssertionError::new("E_OBJECT_EMPTY", "expected a non-empty object")
            .with_value(value)
            .with_schema(json!({ "type": "object", "minProperties": 1 })));
    }
    Ok(())
}

/// Returns an assertion requiring the object to have property `key`.
pub fn assert_object_has_key(
    key: impl Into<String>,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    let key = key.into();
    move |value| {
        if as_object(value)?.contains_key(&key) {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_OBJECT_MISSING_KEY",
                format!("expected an object with property '{key}'"),
            )
            .with_value(value)
            .with_context("key", key.as_str())
            .with_schema(json!({ "type": "object", "required": [key] })))
        }
    }
}

/// Returns an assertion rejecting properties outside `allowed`.
///
/// ```rust
/// use vouch::assert::assert_object_keys_in;
/// use serde_json::json;
///
/// let assertion = assert_object_keys_in(["id", "name"]);
/// assert!(assertion(&json!({"id": 1})).is_ok());
///
/// let error = assertion(&json!({"id": 1, "admin": true})).unwrap_err();
/// assert_eq!(error.name, "E_OBJECT_UNEXPECTED_KEYS");
/// ```
pub fn assert_object_keys_in<I, K>(
    allowed: I,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
    move |value| {
        let unexpected: Vec<&String> = as_object(value)?
            .keys()
            .filter(|k| !allowed.contains(k))
            .collect();

        if unexpected.is_empty() {
            Ok(())
        } else {
            let names: Vec<&str> = unexpected.iter().map(|k| k.as_str()).collect();
            Err(AssertionError::new(
                "E_OBJECT_UNEXPECTED_KEYS",
                format!("unexpected properties: {}", names.join(", ")),
            )
            .with_value(value)
            .with_context("unexpected", json!(names))
            .with_context("allowed", json!(allowed)))
        }
    }
}

/// Returns a rule map applying `rule` to every property value of an object.
///
/// Failures are collected into an `E_OBJECT_VALUES_ASSERTION_FAILED` error
/// keyed by property name.
pub fn assert_object_values(rule: impl Into<Rule>) -> RuleMap {
    RuleMap::object_values(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::assert_number;
    use crate::rule::Validate;

    fn code(result: Result<(), AssertionError>) -> String {
        result.unwrap_err().name
    }

    #[test]
    fn test_not_empty() {
        assert!(assert_object_not_empty(&json!({"a": 1})).is_ok());
        assert_eq!(code(assert_object_not_empty(&json!({}))), "E_OBJECT_EMPTY");
        assert_eq!(code(assert_object_not_empty(&json!([1]))), "E_NOT_OBJECT");
    }

    #[test]
    fn test_has_key() {
        let assertion = assert_object_has_key("id");
        assert!(assertion(&json!({"id": null})).is_ok());
        let error = assertion(&json!({"name": "x"})).unwrap_err();
        assert_eq!(error.name, "E_OBJECT_MISSING_KEY");
        assert_eq!(error.get("key").and_then(|d| d.as_value()), Some(&json!("id")));
    }

    #[test]
    fn test_keys_in_lists_unexpected() {
        let assertion = assert_object_keys_in(vec!["a".to_string()]);
        let error = assertion(&json!({"a": 1, "b": 2, "c": 3})).unwrap_err();
        assert_eq!(
            error.get("unexpected").and_then(|d| d.as_value()),
            Some(&json!(["b", "c"]))
        );
    }

    #[test]
    fn test_object_values() {
        let numbers = assert_object_values(Rule::assert(assert_number));
        assert_eq!(
            numbers.apply(&json!({"x": 1, "y": 2})).unwrap(),
            json!({"x": 1, "y": 2})
        );

        let error = numbers.apply(&json!({"x": 1, "y": "2"})).unwrap_err();
        assert_eq!(error.name, "E_OBJECT_VALUES_ASSERTION_FAILED");
        assert_eq!(error.context.len(), 1);
        assert_eq!(error.field("y").unwrap().name, "E_NOT_NUMBER");
    }

    #[test]
    fn test_object_values_rejects_arrays() {
        let numbers = assert_object_values(Rule::assert(assert_number));
        assert_eq!(numbers.apply(&json!([1])).unwrap_err().name, "E_NOT_OBJECT");
    }
}
