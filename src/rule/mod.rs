//! Rule composition.
//!
//! Primitive assertions and parsers compose into three shapes:
//!
//! - [`RuleChain`]: rules applied in sequence, each receiving the previous
//!   output, stopping at the first failure
//! - [`RuleSet`]: alternative chains, the first success wins
//! - [`RuleMap`]: a rule per object property or array index, with every
//!   failure collected
//!
//! All of them implement [`Validate`] and nest freely through [`Rule::nested`]
//! or the `From` conversions into [`Rule`].
//!
//! # Example
//!
//! ```rust
//! use vouch::assert::{assert_number_in_range, assert_string, assert_string_email};
//! use vouch::parse::{to_number, trim};
//! use vouch::{Rule, RuleChain, RuleMap, Validate};
//! use serde_json::json;
//!
//! let signup = RuleMap::new()
//!     .field(
//!         "email",
//!         RuleChain::new().transform(trim).assert(assert_string_email),
//!     )
//!     .field(
//!         "age",
//!         RuleChain::new()
//!             .assert(assert_string)
//!             .transform(to_number)
//!             .assert(assert_number_in_range(13.0, 120.0)),
//!     );
//!
//! let out = signup
//!     .apply(&json!({"email": " ann@example.com ", "age": "31"}))
//!     .unwrap();
//! assert_eq!(out, json!({"email": "ann@example.com", "age": 31}));
//! ```

mod chain;
mod map;
mod primitive;
mod set;
pub mod traits;

pub use chain::RuleChain;
pub use map::{FieldKey, RuleMap, ALL_INDICES, ALL_PROPERTIES};
pub use primitive::{AssertFn, BoundFn, Rule, TransformFn};
pub use set::RuleSet;
pub use traits::Validate;
