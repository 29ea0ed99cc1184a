//! Error types for assertion failures and rule configuration mistakes.
//!
//! Runtime failures are reported as [`AssertionError`], a structured value with
//! a stable machine-readable name, a message and an ordered context map.
//! Malformed rule definitions are rejected at build time with [`RuleError`].

mod assertion_error;
mod rule_error;

pub use assertion_error::{is_error_code, AssertionError, Cause, Context, Detail};
pub use rule_error::RuleError;
