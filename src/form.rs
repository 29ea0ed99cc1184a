//! Submitted form data.
//!
//! [`FormData`] keeps `application/x-www-form-urlencoded` style pairs in
//! submission order. Rule maps validate it through
//! [`RuleMap::apply_form`](crate::RuleMap::apply_form).

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered multi-valued form fields.
///
/// # Example
///
/// ```rust
/// use vouch::FormData;
/// use serde_json::json;
///
/// let form = FormData::parse("name=Ann+Lee&tag=a&tag=b");
/// assert_eq!(form.get("name"), Some("Ann Lee"));
/// assert_eq!(form.get_all("tag"), ["a", "b"]);
/// assert_eq!(form.to_value(), json!({"name": "Ann Lee", "tag": ["a", "b"]}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a urlencoded query or request body.
    ///
    /// Decoding is lossy and never fails; malformed escapes are kept literally.
    pub fn parse(input: &str) -> Self {
        url::form_urlencoded::parse(input.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect()
    }

    /// Appends a value, keeping any earlier values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder form of [`append`](Self::append).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Returns the first value submitted for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value submitted for `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the distinct field names in first-submission order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.entries {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }

    /// Number of submitted pairs, counting repeated names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the form to a JSON object.
    ///
    /// A field submitted once becomes a string; a repeated field becomes an
    /// array of strings.
    pub fn to_value(&self) -> Value {
        let mut grouped: IndexMap<&str, Vec<Value>> = IndexMap::new();
        for (k, v) in &self.entries {
            grouped
                .entry(k.as_str())
                .or_default()
                .push(Value::String(v.clone()));
        }

        let object: Map<String, Value> = grouped
            .into_iter()
            .map(|(k, mut values)| {
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    Value::Array(values)
                };
                (k.to_string(), value)
            })
            .collect();
        Value::Object(object)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormData {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_decodes_pairs() {
        let form = FormData::parse("?q=a%20b&empty=&flag");
        assert_eq!(form.get("q"), Some("a b"));
        assert_eq!(form.get("empty"), Some(""));
        assert_eq!(form.get("flag"), Some(""));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_repeated_names_keep_order() {
        let form = FormData::new().with("a", "1").with("b", "2").with("a", "3");
        assert_eq!(form.len(), 3);
        assert_eq!(form.keys(), ["a", "b"]);
        assert_eq!(form.get_all("a"), ["1", "3"]);
        assert_eq!(form.to_value(), json!({"a": ["1", "3"], "b": "2"}));
    }

    #[test]
    fn test_empty_form() {
        let form = FormData::parse("");
        assert!(form.is_empty());
        assert_eq!(form.to_value(), json!({}));
    }

    #[test]
    fn test_collect_from_pairs() {
        let form: FormData = vec![("x", "1")].into_iter().collect();
        assert_eq!(form.get("x"), Some("1"));
    }

    #[test]
    fn test_to_value_keeps_submission_order() {
        let form = FormData::parse("zeta=1&alpha=2&zeta=3");
        let value = form.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
