//! Sequential rule composition.

use serde_json::Value;

use super::primitive::Rule;
use super::traits::Validate;
use crate::error::{AssertionError, RuleError};
use crate::interop::describe::combine;
use crate::interop::Describe;

/// An ordered sequence of rules applied left to right.
///
/// Each rule receives the output of the previous one. The first failure
/// stops the chain and is returned untouched; later rules never run. An
/// empty chain accepts every value.
///
/// # Example
///
/// ```rust
/// use vouch::assert::{assert_string, assert_string_not_empty};
/// use vouch::parse::to_upper_case;
/// use vouch::{RuleChain, Validate};
/// use serde_json::json;
///
/// let chain = RuleChain::new()
///     .assert(assert_string)
///     .assert(assert_string_not_empty)
///     .transform(to_upper_case);
///
/// assert_eq!(chain.apply(&json!("abc")).unwrap(), json!("ABC"));
/// assert_eq!(chain.apply(&json!(123)).unwrap_err().name, "E_NOT_STRING");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends any rule, including nested chains, sets and maps.
    pub fn then(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Appends an assertion.
    pub fn assert<F>(self, assertion: F) -> Self
    where
        F: Fn(&Value) -> Result<(), AssertionError> + Send + Sync + 'static,
    {
        self.then(Rule::assert(assertion))
    }

    /// Appends a transform.
    pub fn transform<F>(self, transform: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, AssertionError> + Send + Sync + 'static,
    {
        self.then(Rule::transform(transform))
    }

    /// Appends an assertion with bound trailing parameters.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MissingParameters` if `params` is empty.
    pub fn bind<F>(self, assertion: F, params: Vec<Value>) -> Result<Self, RuleError>
    where
        F: Fn(&Value, &[Value]) -> Result<(), AssertionError> + Send + Sync + 'static,
    {
        Ok(self.then(Rule::bind(assertion, params)?))
    }

    /// Appends a regex match requirement.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if the regex does not compile.
    pub fn pattern(self, pattern: &str) -> Result<Self, RuleError> {
        Ok(self.then(Rule::pattern(pattern)?))
    }

    /// Appends a regex substitution.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if the regex does not compile.
    pub fn replace(self, pattern: &str, replacement: impl Into<String>) -> Result<Self, RuleError> {
        Ok(self.then(Rule::replace(pattern, replacement)?))
    }

    /// Returns the number of rules in the chain.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Validate for RuleChain {
    fn apply(&self, value: &Value) -> Result<Value, AssertionError> {
        let Some((first, rest)) = self.rules.split_first() else {
            return Ok(value.clone());
        };

        let mut current = first.apply(value);
        for (step, rule) in rest.iter().enumerate() {
            current = rule.apply_owned(current.inspect_err(|e| trace_stop(step, e))?);
        }
        current.inspect_err(|e| trace_stop(self.rules.len() - 1, e))
    }
}

#[cfg(feature = "tracing")]
fn trace_stop(step: usize, error: &AssertionError) {
    tracing::trace!(step, error = %error.name, "rule chain stopped");
}

#[cfg(not(feature = "tracing"))]
fn trace_stop(_step: usize, _error: &AssertionError) {}

impl Describe for RuleChain {
    fn describe(&self) -> Value {
        combine("allOf", self.rules.iter().map(Describe::describe))
    }
}

impl From<Rule> for RuleChain {
    fn from(rule: Rule) -> Self {
        RuleChain { rules: vec![rule] }
    }
}

impl From<Vec<Rule>> for RuleChain {
    fn from(rules: Vec<Rule>) -> Self {
        RuleChain { rules }
    }
}

impl FromIterator<Rule> for RuleChain {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleChain {
            rules: iter.into_iter().collect(),
        }
    }
}

impl From<RuleChain> for Rule {
    fn from(chain: RuleChain) -> Self {
        Rule::nested(chain)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::assert::{assert_number, assert_string, assert_string_not_empty};
    use crate::parse::{to_number, to_upper_case, trim};

    #[test]
    fn test_empty_chain_returns_input() {
        let chain = RuleChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply(&json!({"a": 1})).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_output_feeds_next_rule() {
        let chain = RuleChain::new()
            .transform(trim)
            .transform(to_number)
            .assert(assert_number);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.apply(&json!(" 42 ")).unwrap(), json!(42));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let chain = RuleChain::new()
            .assert(assert_string)
            .assert(assert_string_not_empty)
            .transform(to_upper_case)
            .transform(move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(v.clone())
            });

        let error = chain.apply(&json!(123)).unwrap_err();
        assert_eq!(error.name, "E_NOT_STRING");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let error = chain.apply(&json!("")).unwrap_err();
        assert_eq!(error.name, "E_STRING_EMPTY");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(chain.apply(&json!("ok")).unwrap(), json!("OK"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallible_builders() {
        let chain = RuleChain::new()
            .assert(assert_string)
            .replace(r"-+", "-")
            .and_then(|c| c.pattern(r"^[a-z-]+$"))
            .unwrap();
        assert_eq!(chain.apply(&json!("a---b")).unwrap(), json!("a-b"));
        assert!(RuleChain::new().pattern("(").is_err());
        assert!(RuleChain::new().bind(|_, _| Ok(()), vec![]).is_err());
    }

    #[test]
    fn test_nested_chain() {
        let inner = RuleChain::new().transform(trim);
        let outer = RuleChain::new().then(inner).transform(to_upper_case);
        assert_eq!(outer.apply(&json!(" a ")).unwrap(), json!("A"));
    }

    #[test]
    fn test_input_is_not_modified() {
        let chain = RuleChain::new().transform(to_upper_case);
        let input = json!("abc");
        let _ = chain.apply(&input);
        assert_eq!(input, json!("abc"));
    }

    #[test]
    fn test_describe_combines_rules() {
        let chain = RuleChain::new()
            .assert(assert_string)
            .pattern("^a")
            .unwrap();
        assert_eq!(chain.describe(), json!({"type": "string", "pattern": "^a"}));

        let two = RuleChain::new()
            .pattern("^a")
            .and_then(|c| c.pattern("b$"))
            .unwrap();
        assert_eq!(
            two.describe(),
            json!({"allOf": [
                {"type": "string", "pattern": "^a"},
                {"type": "string", "pattern": "b$"}
            ]})
        );
    }

    #[test]
    fn test_collect_from_rules() {
        let chain: RuleChain = vec![Rule::assert(assert_string), Rule::transform(trim)]
            .into_iter()
            .collect();
        assert_eq!(chain.rules().len(), 2);
    }
}
