//! Structured assertion failures.
//!
//! This module provides [`AssertionError`], the single failure type produced by
//! every assertion, parser and composite rule in the crate.

use std::fmt::{self, Display};
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::path::FieldPath;

/// Ordered context attached to an [`AssertionError`].
pub type Context = IndexMap<String, Detail>;

static ERROR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^E_[A-Z_]+$").expect("error code pattern is valid"));

/// Returns true if `name` follows the `E_<UPPER_SNAKE>` error code convention.
///
/// ```rust
/// use vouch::is_error_code;
///
/// assert!(is_error_code("E_NOT_STRING"));
/// assert!(!is_error_code("not_string"));
/// ```
pub fn is_error_code(name: &str) -> bool {
    ERROR_CODE.is_match(name)
}

/// A single entry of an error's context.
///
/// Leaf assertions record plain JSON values (the offending value, bounds,
/// allowed sets). Composite rules record the underlying errors themselves so
/// callers can inspect every branch or field that failed.
#[derive(Debug, Clone)]
pub enum Detail {
    /// A plain JSON value.
    Value(Value),
    /// The error produced for a single field of a rule map.
    Error(Box<AssertionError>),
    /// An ordered list of errors, e.g. every failed alternative of a rule set.
    Errors(Vec<AssertionError>),
}

impl Detail {
    /// Returns the JSON value if this detail holds one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Detail::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the nested error if this detail holds one.
    pub fn as_error(&self) -> Option<&AssertionError> {
        match self {
            Detail::Error(e) => Some(&**e),
            _ => None,
        }
    }

    /// Returns the error list if this detail holds one.
    pub fn as_errors(&self) -> Option<&[AssertionError]> {
        match self {
            Detail::Errors(errors) => Some(errors.as_slice()),
            _ => None,
        }
    }

    /// Serializes this detail, expanding nested errors recursively.
    pub fn to_json(&self) -> Value {
        match self {
            Detail::Value(v) => v.clone(),
            Detail::Error(e) => e.to_json(),
            Detail::Errors(errors) => Value::Array(errors.iter().map(|e| e.to_json()).collect()),
        }
    }
}

impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        Detail::Value(value)
    }
}

impl From<&str> for Detail {
    fn from(value: &str) -> Self {
        Detail::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Detail {
    fn from(value: String) -> Self {
        Detail::Value(Value::String(value))
    }
}

impl From<AssertionError> for Detail {
    fn from(error: AssertionError) -> Self {
        Detail::Error(Box::new(error))
    }
}

impl From<Vec<AssertionError>> for Detail {
    fn from(errors: Vec<AssertionError>) -> Self {
        Detail::Errors(errors)
    }
}

/// The upstream error an [`AssertionError`] was derived from.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another structured assertion failure.
    Assertion(Box<AssertionError>),
    /// Any other error, e.g. one raised by a user-supplied closure.
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl Cause {
    /// Wraps an arbitrary error as a cause.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Cause::Other(Arc::new(error))
    }

    /// Returns the structured error if the cause is one.
    pub fn as_assertion(&self) -> Option<&AssertionError> {
        match self {
            Cause::Assertion(e) => Some(&**e),
            Cause::Other(_) => None,
        }
    }

    /// Serializes the cause. Plain errors only carry their message.
    pub fn to_json(&self) -> Value {
        match self {
            Cause::Assertion(e) => e.to_json(),
            Cause::Other(e) => json!({ "message": e.to_string() }),
        }
    }
}

impl From<AssertionError> for Cause {
    fn from(error: AssertionError) -> Self {
        Cause::Assertion(Box::new(error))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Cause {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match error.downcast::<AssertionError>() {
            Ok(assertion) => Cause::Assertion(assertion),
            Err(other) => Cause::Other(Arc::from(other)),
        }
    }
}

/// A structured assertion failure.
///
/// - **name**: machine-readable code such as `E_NOT_STRING`; branch on this
/// - **message**: human-readable description
/// - **context**: ordered details (offending value, bounds, nested errors)
/// - **cause**: optional upstream error
/// - **schema**: optional JSON-Schema-like description of what would have passed
///
/// # Example
///
/// ```rust
/// use vouch::AssertionError;
/// use serde_json::json;
///
/// let error = AssertionError::new("E_NUMBER_OUT_OF_RANGE", "expected a number between 1 and 5")
///     .with_value(&json!(9))
///     .with_context("min", json!(1))
///     .with_context("max", json!(5));
///
/// assert_eq!(error.name, "E_NUMBER_OUT_OF_RANGE");
/// assert_eq!(error.value(), Some(&json!(9)));
/// ```
#[derive(Debug, Clone)]
pub struct AssertionError {
    /// Machine-readable error code (`E_<UPPER_SNAKE>`).
    pub name: String,
    /// Human-readable error message.
    pub message: String,
    /// Ordered details about the failure.
    pub context: Context,
    /// The upstream error, if any.
    pub cause: Option<Cause>,
    /// Description of the shape that would have passed.
    pub schema: Option<Value>,
    positional: bool,
}

impl AssertionError {
    /// Creates a new error with an empty context.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            context: Context::new(),
            cause: None,
            schema: None,
            positional: false,
        }
    }

    /// Adds a context entry and returns self for chaining.
    ///
    /// Setting a key twice keeps its original position and replaces its value.
    pub fn with_context(mut self, key: impl Into<String>, detail: impl Into<Detail>) -> Self {
        self.context.insert(key.into(), detail.into());
        self
    }

    /// Records the offending value under the `value` key.
    pub fn with_value(self, value: &Value) -> Self {
        self.with_context("value", value.clone())
    }

    /// Sets the upstream cause and returns self for chaining.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sets the schema description and returns self for chaining.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Marks the nested errors in the context as keyed by array position.
    ///
    /// Rule maps set this when they fail on an array input; [`leaves`](Self::leaves)
    /// then renders those keys as `[n]` rather than as property names.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Returns true if the context keys are array positions.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Returns the context entry for `key`.
    pub fn get(&self, key: &str) -> Option<&Detail> {
        self.context.get(key)
    }

    /// Returns the offending value recorded by the failing assertion.
    pub fn value(&self) -> Option<&Value> {
        self.get("value").and_then(Detail::as_value)
    }

    /// Returns the per-alternative errors of a rule set failure, in declaration order.
    ///
    /// Errors that are not rule set aggregates return an empty slice.
    pub fn causes(&self) -> &[AssertionError] {
        self.get("causes")
            .and_then(Detail::as_errors)
            .unwrap_or_default()
    }

    /// Returns the error recorded for a single field of a rule map failure.
    pub fn field(&self, key: &str) -> Option<&AssertionError> {
        self.get(key).and_then(Detail::as_error)
    }

    /// Returns the structured cause, if the cause is an `AssertionError`.
    pub fn cause_assertion(&self) -> Option<&AssertionError> {
        self.cause.as_ref().and_then(Cause::as_assertion)
    }

    /// Flattens nested rule map failures into their innermost errors.
    ///
    /// Each returned pair holds the path of the failing field, relative to the
    /// value this error was raised for. A non-aggregate error yields itself at
    /// the root path.
    ///
    /// ```rust
    /// use vouch::{AssertionError, FieldPath};
    ///
    /// let inner = AssertionError::new("E_NOT_STRING", "expected a string");
    /// let email = AssertionError::new("E_RULE_MAP_ASSERTION_FAILED", "1 field failed validation: email")
    ///     .with_context("email", inner);
    /// let users = AssertionError::new("E_ARRAY_ITEMS_ASSERTION_FAILED", "1 field failed validation: 0")
    ///     .with_context("0", email)
    ///     .positional();
    ///
    /// let leaves = users.leaves();
    /// assert_eq!(leaves.len(), 1);
    /// assert_eq!(leaves[0].0.to_string(), "[0].email");
    /// assert_eq!(leaves[0].1.name, "E_NOT_STRING");
    /// ```
    pub fn leaves(&self) -> Vec<(FieldPath, &AssertionError)> {
        let mut out = Vec::new();
        self.collect_leaves(FieldPath::root(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: FieldPath, out: &mut Vec<(FieldPath, &'a AssertionError)>) {
        let mut nested = self
            .context
            .iter()
            .filter_map(|(key, detail)| detail.as_error().map(|e| (key, e)))
            .peekable();

        if nested.peek().is_none() {
            out.push((path, self));
            return;
        }

        for (key, error) in nested {
            let child = match key.parse::<usize>() {
                Ok(index) if self.positional => path.push_index(index),
                _ => path.push_key(key),
            };
            error.collect_leaves(child, out);
        }
    }

    /// Serializes the error to its JSON form.
    ///
    /// The layout is `{"name", "message", "context", "cause"?, "schema"?}` and is
    /// the stable shape consumers rely on.
    pub fn to_json(&self) -> Value {
        let context: Map<String, Value> = self
            .context
            .iter()
            .map(|(k, d)| (k.clone(), d.to_json()))
            .collect();

        let mut out = Map::new();
        out.insert("name".to_string(), Value::String(self.name.clone()));
        out.insert("message".to_string(), Value::String(self.message.clone()));
        out.insert("context".to_string(), Value::Object(context));
        if let Some(cause) = &self.cause {
            out.insert("cause".to_string(), cause.to_json());
        }
        if let Some(schema) = &self.schema {
            out.insert("schema".to_string(), schema.clone());
        }
        Value::Object(out)
    }
}

impl Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for AssertionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Some(Cause::Assertion(e)) => Some(&**e as &(dyn std::error::Error + 'static)),
            Some(Cause::Other(e)) => Some(&**e as &(dyn std::error::Error + 'static)),
            None => None,
        }
    }
}

// Rules are shared across threads, so the errors they produce must be too.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<AssertionError>();
    assert_sync::<AssertionError>();
};
