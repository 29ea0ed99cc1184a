//! Post-hoc customization of assertions.
//!
//! [`wrap_assert`], [`wrap_parser`] and [`wrap_factory`] turn any assertion
//! into one whose failure can be renamed, reworded, re-caused or annotated
//! without touching the original logic. Every `with_*` call returns a new
//! value; the receiver is left as it was.
//!
//! # Example
//!
//! ```rust
//! use vouch::assert::assert_string_email;
//! use vouch::{wrap_assert, Customize, Validate};
//! use serde_json::json;
//!
//! let contact = wrap_assert(assert_string_email)
//!     .with_name("E_CONTACT_INVALID")
//!     .with_message("please enter a valid email address");
//!
//! let error = contact.check(&json!("nope")).unwrap_err();
//! assert_eq!(error.name, "E_CONTACT_INVALID");
//! assert_eq!(error.message, "please enter a valid email address");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{AssertionError, Cause, Context, Detail};
use crate::interop::Describe;
use crate::rule::{Rule, RuleChain, Validate};

/// Any error a wrapped closure may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fallback name for plain errors raised inside a wrapped assertion.
pub const FALLBACK_NAME: &str = "E_ASSERTION_FAILED";

type WrappedFn = Arc<dyn Fn(&Value) -> Result<Option<Value>, BoxError> + Send + Sync>;

/// Accumulated customization. Unset fields leave the original error alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    name: Option<String>,
    message: Option<String>,
    cause: Option<Cause>,
    context: Option<Context>,
}

impl Overrides {
    /// Layers `later` on top of `self`; fields set in `later` win.
    pub fn then(&self, later: &Overrides) -> Overrides {
        Overrides {
            name: later.name.clone().or_else(|| self.name.clone()),
            message: later.message.clone().or_else(|| self.message.clone()),
            cause: later.cause.clone().or_else(|| self.cause.clone()),
            context: later.context.clone().or_else(|| self.context.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.message.is_none()
            && self.cause.is_none()
            && self.context.is_none()
    }

    /// Rewrites a failure raised by the wrapped closure.
    fn apply(&self, error: BoxError) -> AssertionError {
        match error.downcast::<AssertionError>() {
            Ok(typed) => {
                let mut error = *typed;
                if let Some(name) = &self.name {
                    error.name = name.clone();
                }
                if let Some(message) = &self.message {
                    error.message = message.clone();
                }
                if let Some(cause) = &self.cause {
                    error.cause = Some(cause.clone());
                }
                if let Some(context) = &self.context {
                    for (key, detail) in context {
                        error.context.insert(key.clone(), detail.clone());
                    }
                }
                error
            }
            Err(plain) => {
                let name = self.name.as_deref().unwrap_or(FALLBACK_NAME);
                let message = self.message.clone().unwrap_or_else(|| plain.to_string());
                let mut error = AssertionError::new(name, message);
                error.context = self.context.clone().unwrap_or_default();
                error.cause = Some(match &self.cause {
                    Some(cause) => cause.clone(),
                    None => Cause::from(plain),
                });
                error
            }
        }
    }
}

/// Fluent customization shared by wrapped assertions and factories.
pub trait Customize: Sized {
    /// The overrides accumulated so far.
    fn overrides(&self) -> &Overrides;

    /// Returns a copy carrying `overrides` instead of the current ones.
    fn with_overrides(&self, overrides: Overrides) -> Self;

    /// Replaces the error name.
    fn with_name(&self, name: impl Into<String>) -> Self {
        let mut overrides = self.overrides().clone();
        overrides.name = Some(name.into());
        self.with_overrides(overrides)
    }

    /// Replaces the error message.
    fn with_message(&self, message: impl Into<String>) -> Self {
        let mut overrides = self.overrides().clone();
        overrides.message = Some(message.into());
        self.with_overrides(overrides)
    }

    /// Replaces the error cause.
    fn with_cause(&self, cause: impl Into<Cause>) -> Self {
        let mut overrides = self.overrides().clone();
        overrides.cause = Some(cause.into());
        self.with_overrides(overrides)
    }

    /// Sets context entries merged over the original error's context.
    ///
    /// A later call replaces the entries of an earlier one.
    fn with_context<K, D>(&self, context: impl IntoIterator<Item = (K, D)>) -> Self
    where
        K: Into<String>,
        D: Into<Detail>,
    {
        let mut overrides = self.overrides().clone();
        overrides.context = Some(
            context
                .into_iter()
                .map(|(k, d)| (k.into(), d.into()))
                .collect(),
        );
        self.with_overrides(overrides)
    }
}

/// An assertion or parser with customizable failures.
///
/// Behaves exactly like the wrapped closure through [`Validate`].
#[derive(Clone)]
pub struct CustomAssertion {
    inner: WrappedFn,
    overrides: Overrides,
}

impl CustomAssertion {
    fn new(inner: WrappedFn) -> Self {
        CustomAssertion {
            inner,
            overrides: Overrides::default(),
        }
    }
}

impl Customize for CustomAssertion {
    fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    fn with_overrides(&self, overrides: Overrides) -> Self {
        CustomAssertion {
            inner: Arc::clone(&self.inner),
            overrides,
        }
    }
}

impl Validate for CustomAssertion {
    fn apply(&self, value: &Value) -> Result<Value, AssertionError> {
        match (self.inner)(value) {
            Ok(None) => Ok(value.clone()),
            Ok(Some(out)) => Ok(out),
            Err(error) => {
                let error = self.overrides.apply(error);
                #[cfg(feature = "tracing")]
                tracing::trace!(error = %error.name, "wrapped assertion failed");
                Err(error)
            }
        }
    }
}

impl Describe for CustomAssertion {
    fn describe(&self) -> Value {
        json!({})
    }
}

impl fmt::Debug for CustomAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAssertion")
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl From<CustomAssertion> for Rule {
    fn from(assertion: CustomAssertion) -> Self {
        Rule::nested(assertion)
    }
}

impl From<CustomAssertion> for RuleChain {
    fn from(assertion: CustomAssertion) -> Self {
        RuleChain::from(Rule::from(assertion))
    }
}

/// Wraps an assertion.
///
/// The closure may fail with an [`AssertionError`] or any other error type;
/// plain errors become `E_ASSERTION_FAILED` unless renamed.
pub fn wrap_assert<F, E>(assertion: F) -> CustomAssertion
where
    F: Fn(&Value) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    CustomAssertion::new(Arc::new(
        move |value: &Value| -> Result<Option<Value>, BoxError> {
            assertion(value).map(|_| None).map_err(Into::into)
        },
    ))
}

/// Wraps a parser, keeping its transformed output.
pub fn wrap_parser<F, E>(parser: F) -> CustomAssertion
where
    F: Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    CustomAssertion::new(Arc::new(
        move |value: &Value| -> Result<Option<Value>, BoxError> {
            parser(value).map(Some).map_err(Into::into)
        },
    ))
}

/// A parameterized assertion whose customization carries over to everything
/// it builds.
///
/// `O` is what [`build`](Self::build) returns: a [`CustomAssertion`] or, for
/// curried factories, another `CustomFactory`.
pub struct CustomFactory<P, O = CustomAssertion> {
    factory: Arc<dyn Fn(P) -> O + Send + Sync>,
    overrides: Overrides,
}

impl<P, O: Customize> CustomFactory<P, O> {
    /// Wraps a function producing customizable values.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(P) -> O + Send + Sync + 'static,
    {
        CustomFactory {
            factory: Arc::new(factory),
            overrides: Overrides::default(),
        }
    }

    /// Applies the factory and layers this factory's overrides on the result.
    pub fn build(&self, params: P) -> O {
        let built = (self.factory)(params);
        let merged = built.overrides().then(&self.overrides);
        built.with_overrides(merged)
    }
}

impl<P, O> Customize for CustomFactory<P, O> {
    fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    fn with_overrides(&self, overrides: Overrides) -> Self {
        CustomFactory {
            factory: Arc::clone(&self.factory),
            overrides,
        }
    }
}

impl<P, O> Clone for CustomFactory<P, O> {
    fn clone(&self) -> Self {
        self.with_overrides(self.overrides.clone())
    }
}

impl<P, O> fmt::Debug for CustomFactory<P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFactory")
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

/// Wraps an assertion factory such as
/// [`assert_number_in_range`](crate::assert::assert_number_in_range).
///
/// ```rust
/// use vouch::assert::assert_string_length_between;
/// use vouch::{wrap_factory, Customize, Validate};
/// use serde_json::json;
///
/// let username =
///     wrap_factory(|(min, max): (usize, usize)| assert_string_length_between(min, max))
///         .with_name("E_USERNAME_LENGTH");
///
/// let short = username.build((3, 16));
/// assert_eq!(short.check(&json!("al")).unwrap_err().name, "E_USERNAME_LENGTH");
/// ```
pub fn wrap_factory<P, F, A, E>(factory: F) -> CustomFactory<P>
where
    F: Fn(P) -> A + Send + Sync + 'static,
    A: Fn(&Value) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    CustomFactory::new(move |params| wrap_assert(factory(params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{assert_number_in_range, assert_string};
    use crate::parse::to_number;

    #[test]
    fn test_behaves_like_wrapped_assertion() {
        let wrapped = wrap_assert(assert_string);
        assert_eq!(wrapped.apply(&json!("a")).unwrap(), json!("a"));
        let error = wrapped.apply(&json!(1)).unwrap_err();
        assert_eq!(error.name, "E_NOT_STRING");
        assert!(error.cause.is_none());
    }

    #[test]
    fn test_parser_output_is_kept() {
        let wrapped = wrap_parser(to_number).with_name("E_BAD_NUMBER");
        assert_eq!(wrapped.apply(&json!("4")).unwrap(), json!(4));
        assert_eq!(wrapped.apply(&json!("x")).unwrap_err().name, "E_BAD_NUMBER");
    }

    #[test]
    fn test_last_override_wins() {
        let wrapped = wrap_assert(assert_string).with_message("A").with_message("B");
        assert_eq!(wrapped.check(&json!(1)).unwrap_err().message, "B");
    }

    #[test]
    fn test_receiver_is_not_modified() {
        let base = wrap_assert(assert_string);
        let named = base.with_name("E_CUSTOM");
        assert!(base.overrides().is_empty());
        assert_eq!(base.check(&json!(1)).unwrap_err().name, "E_NOT_STRING");
        assert_eq!(named.check(&json!(1)).unwrap_err().name, "E_CUSTOM");
    }

    #[test]
    fn test_different_fields_combine() {
        let error = wrap_assert(assert_string)
            .with_name("E_LABEL")
            .with_context([("field", "label")])
            .check(&json!(null))
            .unwrap_err();
        assert_eq!(error.name, "E_LABEL");
        assert_eq!(error.message, "expected string, got null");
        assert_eq!(error.get("field").and_then(Detail::as_value), Some(&json!("label")));
        assert_eq!(error.value(), Some(&json!(null)));
    }

    #[test]
    fn test_context_override_key_wins() {
        let error = wrap_assert(assert_string)
            .with_context([("value", json!("hidden"))])
            .check(&json!(5))
            .unwrap_err();
        assert_eq!(error.value(), Some(&json!("hidden")));
        assert_eq!(error.context.len(), 1);
    }

    #[test]
    fn test_plain_error_becomes_typed() {
        let wrapped = wrap_assert(|v: &Value| {
            if v.is_string() {
                Ok(())
            } else {
                Err("not text")
            }
        });
        let error = wrapped.check(&json!(1)).unwrap_err();
        assert_eq!(error.name, FALLBACK_NAME);
        assert_eq!(error.message, "not text");
        assert!(error.context.is_empty());
        assert!(matches!(error.cause, Some(Cause::Other(_))));
    }

    #[test]
    fn test_plain_error_with_overrides() {
        let error = wrap_assert(|_: &Value| Err::<(), _>("boom"))
            .with_name("E_BOOM")
            .with_cause(AssertionError::new("E_ROOT", "root"))
            .check(&json!(1))
            .unwrap_err();
        assert_eq!(error.name, "E_BOOM");
        assert_eq!(error.message, "boom");
        assert_eq!(error.cause_assertion().map(|c| c.name.as_str()), Some("E_ROOT"));
    }

    #[test]
    fn test_factory_customization_reaches_built_assertion() {
        let range = wrap_factory(|(min, max): (f64, f64)| assert_number_in_range(min, max))
            .with_message("rating must be 1-5");
        let rating = range.build((1.0, 5.0));
        assert!(rating.check(&json!(3)).is_ok());
        let error = rating.check(&json!(9)).unwrap_err();
        assert_eq!(error.name, "E_NUMBER_OUT_OF_RANGE");
        assert_eq!(error.message, "rating must be 1-5");
    }

    #[test]
    fn test_curried_factory() {
        let curried: CustomFactory<f64, CustomFactory<f64>> = CustomFactory::new(|min: f64| {
            wrap_factory(move |max: f64| assert_number_in_range(min, max))
        })
        .with_name("E_OUTER");

        let inner = curried.build(0.0).with_message("inner message");
        let error = inner.build(10.0).check(&json!(11)).unwrap_err();
        assert_eq!(error.name, "E_OUTER");
        assert_eq!(error.message, "inner message");
    }

    #[test]
    fn test_nests_in_chains() {
        let chain = RuleChain::new()
            .then(wrap_assert(assert_string).with_name("E_NEED_TEXT"))
            .transform(to_number);
        assert_eq!(chain.apply(&json!(1)).unwrap_err().name, "E_NEED_TEXT");
        assert_eq!(chain.apply(&json!("2")).unwrap(), json!(2));
    }
}
