//! Traits for rule polymorphism.
//!
//! This module provides the [`Validate`] trait that lets chains, sets, maps and
//! customized assertions be nested inside one another.

use serde_json::Value;
use crate::error::AssertionError;
use crate::interop::Describe;
use crate::ValidationResult;

/// A composed rule that can be applied to a JSON value.
///
/// `Validate` is implemented by [`Rule`](super::Rule), [`RuleChain`](super::RuleChain),
/// [`RuleSet`](super::RuleSet), [`RuleMap`](super::RuleMap) and
/// [`CustomAssertion`](crate::CustomAssertion). Any implementor can be nested
/// into another rule with [`Rule::nested`](super::Rule::nested).
///
/// The `Send + Sync` bounds allow a rule to be built once and shared across
/// threads.
///
/// # Example
///
/// ```rust
/// use vouch::assert::assert_string;
/// use vouch::parse::to_upper_case;
/// use vouch::{RuleChain, Validate};
/// use serde_json::json;
///
/// let shout = RuleChain::new().assert(assert_string).transform(to_upper_case);
/// assert_eq!(shout.apply(&json!("hi")).unwrap(), json!("HI"));
/// ```
pub trait Validate: Describe + Send + Sync {
    /// Applies the rule, returning the (possibly transformed) value.
    ///
    /// The input is never modified; a successful result is always a new value.
    fn apply(&self, value: &Value) -> Result<Value, AssertionError>;

    /// Applies the rule and reports the outcome as a `Validation`.
    fn validate(&self, value: &Value) -> ValidationResult {
        match self.apply(value) {
            Ok(v) => ValidationResult::Success(v),
            Err(e) => ValidationResult::Failure(e),
        }
    }

    /// Applies the rule for its verdict only, discarding any transformed value.
    fn check(&self, value: &Value) -> Result<(), AssertionError> {
        self.apply(value).map(|_| ())
    }
}
