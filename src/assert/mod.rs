//! Primitive assertions and assertion factories.
//!
//! An assertion is a function `(&Value) -> Result<(), AssertionError>`: it
//! either accepts the value or fails with a structured error. Factories such
//! as [`assert_number_in_range`] take configuration and return an assertion
//! closure that owns a copy of it.
//!
//! Refined assertions always check the base type first, so a value of the
//! wrong type is reported as `E_NOT_STRING`, `E_NOT_NUMBER`, ... rather than
//! as a failed refinement.
//!
//! # Example
//!
//! ```rust
//! use vouch::assert::{assert_number_in_range, assert_string_email};
//! use serde_json::json;
//!
//! assert!(assert_string_email(&json!("alice@example.com")).is_ok());
//!
//! let rating = assert_number_in_range(1.0, 5.0);
//! let error = rating(&json!(7)).unwrap_err();
//! assert_eq!(error.name, "E_NUMBER_OUT_OF_RANGE");
//! ```

mod array;
mod choice;
mod number;
mod object;
mod string;
mod types;

pub use array::{
    assert_array_includes, assert_array_length, assert_array_length_between,
    assert_array_not_empty, assert_array_of, assert_array_unique,
};
pub use choice::{assert_equals, assert_in, assert_one_of};
pub use number::{
    assert_integer_safe, assert_number_even, assert_number_greater_than, assert_number_in_range,
    assert_number_less_than, assert_number_negative, assert_number_non_negative,
    assert_number_odd, assert_number_positive,
};
pub use object::{
    assert_object_has_key, assert_object_keys_in, assert_object_not_empty, assert_object_values,
};
pub use string::{
    assert_string_email, assert_string_length_between, assert_string_lowercase,
    assert_string_matching, assert_string_not_blank, assert_string_not_empty,
    assert_string_numeric, assert_string_starts_with, assert_string_uppercase,
    assert_string_url, assert_string_uuid,
};
pub use types::{
    assert_array, assert_boolean, assert_integer, assert_not_null, assert_null, assert_number,
    assert_object, assert_string,
};

pub(crate) use string::{check_matching, parse_numeric};
pub(crate) use types::{as_array, as_object, as_str};
