//! Array refinements and per-item validation.

use indexmap::IndexMap;
use serde_json::{json, Value};

use super::types::as_array;
use crate::error::AssertionError;
use crate::rule::{Rule, RuleMap};

/// Asserts that the value is an array with at least one item.
pub fn assert_array_not_empty(value: &Value) -> Result<(), AssertionError> {
    if as_array(value)?.is_empty() {
        return Err(AssertionError::new("E_ARRAY_EMPTY", "expected a non-empty array")
            .with_value(value)
            .with_schema(json!({ "type": "array", "minItems": 1 })));
    }
    Ok(())
}

/// Returns an assertion requiring exactly `len` items.
pub fn assert_array_length(
    len: usize,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let actual = as_array(value)?.len();
        if actual == len {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_ARRAY_LENGTH_MISMATCH",
                format!("expected an array of {len} items, got {actual}"),
            )
            .with_value(value)
            .with_context("expected", json!(len))
            .with_context("length", json!(actual))
            .with_schema(json!({ "type": "array", "minItems": len, "maxItems": len })))
        }
    }
}

/// Returns an assertion requiring between `min` and `max` items (inclusive).
pub fn assert_array_length_between(
    min: usize,
    max: usize,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        let len = as_array(value)?.len();
        if (min..=max).contains(&len) {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_ARRAY_LENGTH_OUT_OF_RANGE",
                format!("expected between {min} and {max} items, got {len}"),
            )
            .with_value(value)
            .with_context("min", json!(min))
            .with_context("max", json!(max))
            .with_context("length", json!(len))
            .with_schema(json!({ "type": "array", "minItems": min, "maxItems": max })))
        }
    }
}

/// Asserts that no two items of the array are equal.
///
/// The error context lists the index groups of every duplicated item.
pub fn assert_array_unique(value: &Value) -> Result<(), AssertionError> {
    let items = as_array(value)?;
    let duplicates: Vec<Value> = group_indices(items)
        .into_values()
        .filter(|indices| indices.len() > 1)
        .map(|indices| json!(indices))
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::new(
            "E_ARRAY_NOT_UNIQUE",
            format!("expected unique items, found {} duplicated value(s)", duplicates.len()),
        )
        .with_value(value)
        .with_context("duplicates", Value::Array(duplicates))
        .with_schema(json!({ "type": "array", "uniqueItems": true })))
    }
}

/// Returns an assertion requiring the array to contain `expected`.
pub fn assert_array_includes(
    expected: Value,
) -> impl Fn(&Value) -> Result<(), AssertionError> + Clone + Send + Sync + 'static {
    move |value| {
        if as_array(value)?.contains(&expected) {
            Ok(())
        } else {
            Err(AssertionError::new(
                "E_ARRAY_MISSING_VALUE",
                format!("expected the array to include {expected}"),
            )
            .with_value(value)
            .with_context("expected", expected.clone())
            .with_schema(json!({ "type": "array", "contains": { "const": expected } })))
        }
    }
}

/// Returns a rule map applying `rule` to every item of an array.
///
/// Every item is checked, and all failures are reported together in an
/// `E_ARRAY_ITEMS_ASSERTION_FAILED` error keyed by index. On success a new
/// array of the (possibly transformed) items is returned; the input is left
/// untouched.
///
/// ```rust
/// use vouch::assert::{assert_array_of, assert_string};
/// use vouch::{Rule, Validate};
/// use serde_json::json;
///
/// let strings = assert_array_of(Rule::assert(assert_string));
/// assert_eq!(strings.apply(&json!(["a", "b"])).unwrap(), json!(["a", "b"]));
///
/// let error = strings.apply(&json!(["a", 1, 2])).unwrap_err();
/// assert_eq!(error.name, "E_ARRAY_ITEMS_ASSERTION_FAILED");
/// assert!(error.field("1").is_some());
/// assert!(error.field("2").is_some());
/// ```
pub fn assert_array_of(rule: impl Into<Rule>) -> RuleMap {
    RuleMap::array_items(rule)
}

fn group_indices(items: &[Value]) -> IndexMap<String, Vec<usize>> {
    let mut seen: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (i, item) in items.iter().enumerate() {
        seen.entry(item.to_string()).or_default().push(i);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(result: Result<(), AssertionError>) -> String {
        result.unwrap_err().name
    }

    #[test]
    fn test_not_empty() {
        assert!(assert_array_not_empty(&json!([0])).is_ok());
        assert_eq!(code(assert_array_not_empty(&json!([]))), "E_ARRAY_EMPTY");
        assert_eq!(code(assert_array_not_empty(&json!("[]"))), "E_NOT_ARRAY");
    }

    #[test]
    fn test_exact_length() {
        let pair = assert_array_length(2);
        assert!(pair(&json!([1, 2])).is_ok());
        let error = pair(&json!([1])).unwrap_err();
        assert_eq!(error.name, "E_ARRAY_LENGTH_MISMATCH");
        assert_eq!(error.get("length").and_then(|d| d.as_value()), Some(&json!(1)));
    }

    #[test]
    fn test_length_between() {
        let assertion = assert_array_length_between(1, 2);
        assert!(assertion(&json!([1])).is_ok());
        assert_eq!(code(assertion(&json!([]))), "E_ARRAY_LENGTH_OUT_OF_RANGE");
        assert_eq!(code(assertion(&json!([1, 2, 3]))), "E_ARRAY_LENGTH_OUT_OF_RANGE");
    }

    #[test]
    fn test_unique_reports_duplicate_groups() {
        assert!(assert_array_unique(&json!([1, "1", [1]])).is_ok());

        let error = assert_array_unique(&json!(["a", "b", "a", {"k": 1}, {"k": 1}])).unwrap_err();
        assert_eq!(error.name, "E_ARRAY_NOT_UNIQUE");
        assert_eq!(
            error.get("duplicates").and_then(|d| d.as_value()),
            Some(&json!([[0, 2], [3, 4]]))
        );
    }

    #[test]
    fn test_includes() {
        let assertion = assert_array_includes(json!("admin"));
        assert!(assertion(&json!(["user", "admin"])).is_ok());
        assert_eq!(code(assertion(&json!(["user"]))), "E_ARRAY_MISSING_VALUE");
    }
}
