//! The unit of composition.
//!
//! A [`Rule`] is one step of a chain: an assertion, a transform, a bound
//! assertion, a regex pattern, a regex replacement, or a nested composite.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{json, Value};

use super::traits::Validate;
use crate::assert::{as_str, check_matching};
use crate::error::{AssertionError, RuleError};
use crate::interop::Describe;

/// Shared assertion closure.
pub type AssertFn = Arc<dyn Fn(&Value) -> Result<(), AssertionError> + Send + Sync>;
/// Shared transform closure.
pub type TransformFn = Arc<dyn Fn(&Value) -> Result<Value, AssertionError> + Send + Sync>;
/// Shared assertion closure taking bound trailing parameters.
pub type BoundFn = Arc<dyn Fn(&Value, &[Value]) -> Result<(), AssertionError> + Send + Sync>;

/// A single validation step.
///
/// Rules are cheap to clone and carry no mutable state.
///
/// # Example
///
/// ```rust
/// use vouch::assert::{assert_in, assert_string};
/// use vouch::{Rule, Validate};
/// use serde_json::json;
///
/// let string = Rule::assert(assert_string);
/// let slug = Rule::pattern(r"^[a-z0-9-]+$").unwrap();
/// let color = Rule::bind(assert_in, vec![json!("red"), json!("green")]).unwrap();
///
/// assert!(string.apply(&json!("x")).is_ok());
/// assert_eq!(slug.apply(&json!("Not A Slug")).unwrap_err().name, "E_STRING_NOT_MATCHING");
/// assert_eq!(color.apply(&json!("blue")).unwrap_err().name, "E_VALUE_NOT_ALLOWED");
/// ```
#[derive(Clone)]
pub enum Rule {
    /// Checks the value; on success the value passes through unchanged.
    Assert(AssertFn),
    /// Checks and converts the value, returning a new one.
    Transform(TransformFn),
    /// An assertion with trailing parameters bound up front.
    Bound {
        assertion: BoundFn,
        params: Arc<[Value]>,
    },
    /// Requires a string matching the pattern (`E_STRING_NOT_MATCHING`).
    Pattern(Regex),
    /// Replaces every match of the pattern in a string input.
    Replace { pattern: Regex, replacement: String },
    /// A nested chain, set, map or customized assertion.
    Nested(Arc<dyn Validate>),
}

impl Rule {
    /// Creates a rule from an assertion function.
    pub fn assert<F>(assertion: F) -> Self
    where
        F: Fn(&Value) -> Result<(), AssertionError> + Send + Sync + 'static,
    {
        Rule::Assert(Arc::new(assertion))
    }

    /// Creates a rule from a transform (parser) function.
    pub fn transform<F>(transform: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, AssertionError> + Send + Sync + 'static,
    {
        Rule::Transform(Arc::new(transform))
    }

    /// Binds `params` as the trailing arguments of `assertion`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingParameters` if `params` is empty.
    pub fn bind<F>(assertion: F, params: Vec<Value>) -> Result<Self, RuleError>
    where
        F: Fn(&Value, &[Value]) -> Result<(), AssertionError> + Send + Sync + 'static,
    {
        if params.is_empty() {
            return Err(RuleError::MissingParameters);
        }
        Ok(Rule::Bound {
            assertion: Arc::new(assertion),
            params: params.into(),
        })
    }

    /// Compiles `pattern` into a string-matching rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if the regex does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, RuleError> {
        Regex::new(pattern)
            .map(Rule::Pattern)
            .map_err(|e| RuleError::invalid_pattern(pattern, e))
    }

    /// Compiles `pattern` into a substitution rule.
    ///
    /// `replacement` follows `regex` replacement syntax (`$1`, `${name}`).
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if the regex does not compile.
    pub fn replace(pattern: &str, replacement: impl Into<String>) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|e| RuleError::invalid_pattern(pattern, e))?;
        Ok(Rule::Replace {
            pattern: regex,
            replacement: replacement.into(),
        })
    }

    /// Wraps any composite rule.
    pub fn nested<V>(rule: V) -> Self
    where
        V: Validate + 'static,
    {
        Rule::Nested(Arc::new(rule))
    }

    /// Applies the rule to an owned value, avoiding a copy for pure assertions.
    pub(crate) fn apply_owned(&self, value: Value) -> Result<Value, AssertionError> {
        match self {
            Rule::Assert(assertion) => assertion(&value).map(|_| value),
            Rule::Bound { assertion, params } => assertion(&value, &params[..]).map(|_| value),
            Rule::Pattern(regex) => check_matching(&value, regex).map(|_| value),
            _ => self.apply(&value),
        }
    }
}

impl Validate for Rule {
    fn apply(&self, value: &Value) -> Result<Value, AssertionError> {
        match self {
            Rule::Assert(assertion) => assertion(value).map(|_| value.clone()),
            Rule::Transform(transform) => transform(value),
            Rule::Bound { assertion, params } => {
                assertion(value, &params[..]).map(|_| value.clone())
            }
            Rule::Pattern(regex) => check_matching(value, regex).map(|_| value.clone()),
            Rule::Replace {
                pattern,
                replacement,
            } => {
                let s = as_str(value)?;
                Ok(Value::String(
                    pattern.replace_all(s, replacement.as_str()).into_owned(),
                ))
            }
            Rule::Nested(rule) => rule.apply(value),
        }
    }
}

impl Describe for Rule {
    fn describe(&self) -> Value {
        match self {
            Rule::Pattern(regex) => json!({ "type": "string", "pattern": regex.as_str() }),
            Rule::Replace { .. } => json!({ "type": "string" }),
            Rule::Nested(rule) => rule.describe(),
            Rule::Assert(_) | Rule::Transform(_) | Rule::Bound { .. } => json!({}),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Assert(_) => f.write_str("Assert"),
            Rule::Transform(_) => f.write_str("Transform"),
            Rule::Bound { params, .. } => f.debug_struct("Bound").field("params", params).finish(),
            Rule::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Rule::Replace {
                pattern,
                replacement,
            } => f
                .debug_struct("Replace")
                .field("pattern", &pattern.as_str())
                .field("replacement", replacement)
                .finish(),
            Rule::Nested(_) => f.write_str("Nested"),
        }
    }
}

impl From<Regex> for Rule {
    fn from(regex: Regex) -> Self {
        Rule::Pattern(regex)
    }
}
