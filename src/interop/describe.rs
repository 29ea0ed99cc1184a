//! JSON-Schema-like descriptions of rules.

use serde_json::{Map, Value};

/// Trait for rules that can describe the values they accept.
///
/// The output loosely follows JSON Schema draft 2020-12. Opaque rules such as
/// arbitrary closures describe themselves as the empty schema `{}`.
pub trait Describe {
    /// Returns a JSON-Schema-like description of accepted values.
    fn describe(&self) -> Value;
}

/// Returns true for the empty schema `{}`, which accepts anything.
pub(crate) fn is_unconstrained(schema: &Value) -> bool {
    schema.as_object().is_some_and(Map::is_empty)
}

/// Combines descriptions under `keyword` (`allOf`, `anyOf`), dropping empty schemas.
///
/// A single remaining description is returned as-is.
pub(crate) fn combine(keyword: &str, schemas: impl IntoIterator<Item = Value>) -> Value {
    let mut parts: Vec<Value> = schemas
        .into_iter()
        .filter(|s| !is_unconstrained(s))
        .collect();

    match parts.len() {
        0 => Value::Object(Map::new()),
        1 => parts.remove(0),
        _ => {
            let mut out = Map::new();
            out.insert(keyword.to_string(), Value::Array(parts));
            Value::Object(out)
        }
    }
}
