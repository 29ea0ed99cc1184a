//! Alternative rule composition.

use serde_json::{json, Value};

use super::chain::RuleChain;
use super::primitive::Rule;
use super::traits::Validate;
use crate::error::AssertionError;
use crate::interop::describe::{combine, is_unconstrained};
use crate::interop::Describe;

/// Ordered alternatives: the first chain that accepts the value wins.
///
/// Every chain is tried against the original input. If none accepts it, the
/// set fails with `E_RULE_SET_ASSERTION_FAILED`; the error keeps the input
/// under `value` and every chain's error, in declaration order, under
/// `causes`. A set with no chains rejects every value.
///
/// # Example
///
/// ```rust
/// use vouch::assert::{assert_null, assert_string};
/// use vouch::parse::to_number;
/// use vouch::{RuleChain, RuleSet, Validate};
/// use serde_json::json;
///
/// let nullable_number = RuleSet::new()
///     .or(RuleChain::new().assert(assert_null))
///     .or(RuleChain::new().assert(assert_string).transform(to_number));
///
/// assert_eq!(nullable_number.apply(&json!(null)).unwrap(), json!(null));
/// assert_eq!(nullable_number.apply(&json!("5")).unwrap(), json!(5));
///
/// let error = nullable_number.apply(&json!(5)).unwrap_err();
/// let names: Vec<_> = error.causes().iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, ["E_NOT_NULL", "E_NOT_STRING"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    chains: Vec<RuleChain>,
}

impl RuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative. A single rule is promoted to a one-rule chain.
    pub fn or(mut self, chain: impl Into<RuleChain>) -> Self {
        self.chains.push(chain.into());
        self
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chains(&self) -> &[RuleChain] {
        &self.chains
    }
}

impl Validate for RuleSet {
    fn apply(&self, value: &Value) -> Result<Value, AssertionError> {
        let mut causes = Vec::with_capacity(self.chains.len());
        for chain in &self.chains {
            match chain.apply(value) {
                Ok(out) => return Ok(out),
                Err(e) => causes.push(e),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(alternatives = causes.len(), "no rule chain accepted the value");

        let message = format!(
            "value did not match any of {} rule chain{}",
            self.chains.len(),
            if self.chains.len() == 1 { "" } else { "s" }
        );
        Err(AssertionError::new("E_RULE_SET_ASSERTION_FAILED", message)
            .with_value(value)
            .with_context("causes", causes))
    }
}

impl Describe for RuleSet {
    fn describe(&self) -> Value {
        if self.chains.is_empty() {
            return json!({ "not": {} });
        }
        let schemas: Vec<Value> = self.chains.iter().map(Describe::describe).collect();
        if schemas.iter().any(is_unconstrained) {
            return json!({});
        }
        combine("anyOf", schemas)
    }
}

impl From<RuleSet> for Rule {
    fn from(set: RuleSet) -> Self {
        Rule::nested(set)
    }
}

impl From<RuleSet> for RuleChain {
    fn from(set: RuleSet) -> Self {
        RuleChain::from(Rule::from(set))
    }
}
