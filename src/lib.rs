//! # Vouch
//!
//! Composable assertions over JSON values with structured, inspectable errors.
//!
//! ## Overview
//!
//! Every check in this crate is a plain function from `&serde_json::Value` to
//! `Result`. Failures are [`AssertionError`]s with a stable machine-readable
//! name (`E_NOT_STRING`, `E_NUMBER_OUT_OF_RANGE`, ...), a message, an ordered
//! context and optional cause and schema.
//!
//! Small checks compose into bigger ones:
//!
//! - [`RuleChain`]: run rules in order, threading transformed values through
//! - [`RuleSet`]: accept the first of several alternatives
//! - [`RuleMap`]: validate each field of an object or array, collecting every
//!   failure
//! - [`wrap_assert`]: rename or reword any assertion's failure
//!
//! ## Core Types
//!
//! - [`AssertionError`]: a single failure; aggregates nest their field errors
//! - [`FieldPath`]: a location inside nested data (e.g., `users[0].email`)
//! - [`Rule`]: one step of a chain
//! - [`Validate`]: implemented by everything that can be applied to a value
//!
//! ## Example
//!
//! ```rust
//! use vouch::assert::{assert_array_of, assert_number, assert_string, assert_string_email};
//! use vouch::{Rule, RuleChain, RuleMap, Validate};
//! use serde_json::json;
//!
//! let user = RuleMap::schema()
//!     .field("name", Rule::assert(assert_string))
//!     .field(
//!         "email",
//!         RuleChain::new().assert(assert_string).assert(assert_string_email),
//!     )
//!     .field("scores", assert_array_of(Rule::assert(assert_number)));
//!
//! let error = user
//!     .apply(&json!({"name": "Ann", "email": "nope", "scores": [1, "2"]}))
//!     .unwrap_err();
//! assert_eq!(error.name, "E_SCHEMA_MISMATCH");
//!
//! let paths: Vec<String> = error.leaves().iter().map(|(p, _)| p.to_string()).collect();
//! assert_eq!(paths, ["email", "scores[1]"]);
//! ```

pub mod assert;
pub mod css;
pub mod error;
pub mod form;
pub mod interop;
pub mod parse;
pub mod path;
pub mod rule;
mod value;
pub mod wrap;

pub use error::{is_error_code, AssertionError, Cause, Context, Detail, RuleError};
pub use form::FormData;
pub use interop::Describe;
pub use path::{FieldPath, Segment};
pub use rule::{FieldKey, Rule, RuleChain, RuleMap, RuleSet, Validate, ALL_INDICES, ALL_PROPERTIES};
pub use wrap::{wrap_assert, wrap_factory, wrap_parser, CustomAssertion, CustomFactory, Customize};

/// Type alias for validation results using AssertionError
pub type ValidationResult<T = serde_json::Value> = stillwater::Validation<T, AssertionError>;
