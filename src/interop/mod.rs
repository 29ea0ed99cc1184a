//! Interoperability with schema description formats.
//!
//! Rules can describe the shape they accept as a JSON-Schema-like document.
//! Descriptions are informational only; they are attached to `E_SCHEMA_MISMATCH`
//! errors and never executed.

pub mod describe;

pub use describe::Describe;
