//! Field-wise rule composition for objects and arrays.
//!
//! A [`RuleMap`] assigns a rule to each field of a container. Unlike a chain,
//! a map never stops at the first failure: every field is evaluated and all
//! failures are reported together in one aggregate error whose context is
//! keyed by the failing field names.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use stillwater::{Semigroup, Validation};

use super::chain::RuleChain;
use super::primitive::Rule;
use super::traits::Validate;
use crate::assert::assert_not_null;
use crate::assert::{as_array, as_object};
use crate::error::AssertionError;
use crate::form::FormData;
use crate::interop::describe::is_unconstrained;
use crate::interop::Describe;

static NULL: Value = Value::Null;

/// Key of a [`RuleMap`] entry.
///
/// The wildcards are their own variants, so a property literally named
/// `"ALL_PROPERTIES"` is just a `Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// An object property (or, on an array, a numeric string index).
    Name(String),
    /// An array position (or, on an object, the stringified index).
    Index(usize),
    /// Every index of an array input.
    AllIndices,
    /// Every property of an object input.
    AllProperties,
}

/// Wildcard matching every index of an array.
pub const ALL_INDICES: FieldKey = FieldKey::AllIndices;

/// Wildcard matching every property of an object.
pub const ALL_PROPERTIES: FieldKey = FieldKey::AllProperties;

impl FieldKey {
    fn literal(&self) -> Option<String> {
        match self {
            FieldKey::Name(name) => Some(name.clone()),
            FieldKey::Index(index) => Some(index.to_string()),
            FieldKey::AllIndices | FieldKey::AllProperties => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => f.write_str(name),
            FieldKey::Index(index) => write!(f, "{index}"),
            FieldKey::AllIndices => f.write_str("ALL_INDICES"),
            FieldKey::AllProperties => f.write_str("ALL_PROPERTIES"),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapKind {
    Rules,
    Schema,
    ObjectValues,
    ArrayItems,
}

impl MapKind {
    fn code(self) -> &'static str {
        match self {
            MapKind::Rules => "E_RULE_MAP_ASSERTION_FAILED",
            MapKind::Schema => "E_SCHEMA_MISMATCH",
            MapKind::ObjectValues => "E_OBJECT_VALUES_ASSERTION_FAILED",
            MapKind::ArrayItems => "E_ARRAY_ITEMS_ASSERTION_FAILED",
        }
    }
}

/// Failing fields in evaluation order.
struct FieldFailures(Vec<(String, AssertionError)>);

impl Semigroup for FieldFailures {
    fn combine(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

/// Where an evaluated field lands in the output.
enum Slot {
    Property(String),
    Position(usize),
    Discard,
}

/// One field to evaluate: error key, output slot and input value.
struct Field<'a> {
    key: String,
    slot: Slot,
    input: Option<&'a Value>,
    rule: &'a Rule,
}

type Evaluated = (Slot, Option<Value>);

/// A map from field keys to rules.
///
/// Accepts objects and arrays. Literal keys are looked up directly and a
/// missing field is validated as `null`; wildcards expand over the fields
/// actually present, skipping any field that also has a literal entry.
///
/// On success the map returns a new container. Objects contain only the
/// evaluated properties (a missing field whose rule produced `null` is left
/// out); arrays keep every position and copy unvalidated items through.
///
/// # Example
///
/// ```rust
/// use vouch::assert::{assert_number, assert_string};
/// use vouch::{Rule, RuleMap, Validate};
/// use serde_json::json;
///
/// let person = RuleMap::new()
///     .field("name", Rule::assert(assert_string))
///     .field("age", Rule::assert(assert_number));
///
/// let error = person.apply(&json!({"name": false, "age": "25"})).unwrap_err();
/// assert_eq!(error.name, "E_RULE_MAP_ASSERTION_FAILED");
/// assert_eq!(error.message, "2 fields failed validation: name, age");
/// assert_eq!(error.field("age").unwrap().name, "E_NOT_NUMBER");
/// ```
#[derive(Debug, Clone)]
pub struct RuleMap {
    entries: IndexMap<FieldKey, Rule>,
    kind: MapKind,
}

impl Default for RuleMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleMap {
    /// Creates an empty map failing with `E_RULE_MAP_ASSERTION_FAILED`.
    pub fn new() -> Self {
        Self::with_kind(MapKind::Rules)
    }

    /// Creates an empty schema failing with `E_SCHEMA_MISMATCH`.
    ///
    /// Schema errors also carry the schema's description.
    pub fn schema() -> Self {
        Self::with_kind(MapKind::Schema)
    }

    pub(crate) fn object_values(rule: impl Into<Rule>) -> Self {
        Self::with_kind(MapKind::ObjectValues).each_property(rule)
    }

    pub(crate) fn array_items(rule: impl Into<Rule>) -> Self {
        Self::with_kind(MapKind::ArrayItems).each_index(rule)
    }

    fn with_kind(kind: MapKind) -> Self {
        RuleMap {
            entries: IndexMap::new(),
            kind,
        }
    }

    /// Adds a rule for an object property.
    pub fn field(self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.entry(FieldKey::Name(name.into()), rule)
    }

    /// Adds a rule for an array position.
    pub fn index(self, index: usize, rule: impl Into<Rule>) -> Self {
        self.entry(FieldKey::Index(index), rule)
    }

    /// Adds a rule for every array index without its own entry.
    pub fn each_index(self, rule: impl Into<Rule>) -> Self {
        self.entry(ALL_INDICES, rule)
    }

    /// Adds a rule for every object property without its own entry.
    pub fn each_property(self, rule: impl Into<Rule>) -> Self {
        self.entry(ALL_PROPERTIES, rule)
    }

    /// Adds a rule under any key. A repeated key replaces the earlier rule.
    ///
    /// `index(0, ..)` and `field("0", ..)` address the same field, so either
    /// one replaces the other.
    pub fn entry(mut self, key: impl Into<FieldKey>, rule: impl Into<Rule>) -> Self {
        let key = key.into();
        if let Some(literal) = key.literal() {
            self.entries
                .retain(|existing, _| existing.literal().as_deref() != Some(literal.as_str()));
        }
        self.entries.insert(key, rule.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.entries.keys()
    }

    /// Validates submitted form data.
    ///
    /// A field submitted once is validated as a string, a repeated field as
    /// an array of strings.
    pub fn apply_form(&self, form: &FormData) -> Result<Value, AssertionError> {
        self.apply(&form.to_value())
    }

    fn literals(&self) -> HashSet<String> {
        self.entries.keys().filter_map(FieldKey::literal).collect()
    }

    fn object_fields<'a>(&'a self, object: &'a Map<String, Value>) -> Vec<Field<'a>> {
        let literals = self.literals();
        let mut fields = Vec::new();
        for (key, rule) in &self.entries {
            match key {
                FieldKey::Name(_) | FieldKey::Index(_) => {
                    let name = key.to_string();
                    fields.push(Field {
                        input: object.get(&name),
                        slot: Slot::Property(name.clone()),
                        key: name,
                        rule,
                    });
                }
                FieldKey::AllProperties => {
                    fields.extend(
                        object
                            .iter()
                            .filter(|(name, _)| !literals.contains(*name))
                            .map(|(name, value)| Field {
                                key: name.clone(),
                                slot: Slot::Property(name.clone()),
                                input: Some(value),
                                rule,
                            }),
                    );
                }
                FieldKey::AllIndices => {}
            }
        }
        fields
    }

    fn array_fields<'a>(&'a self, items: &'a [Value]) -> Vec<Field<'a>> {
        let literals = self.literals();
        let mut fields = Vec::new();
        for (key, rule) in &self.entries {
            match key {
                FieldKey::Index(index) => fields.push(position(*index, items, rule)),
                FieldKey::Name(name) => match name.parse::<usize>() {
                    Ok(index) => fields.push(position(index, items, rule)),
                    Err(_) => fields.push(Field {
                        key: name.clone(),
                        slot: Slot::Discard,
                        input: None,
                        rule,
                    }),
                },
                FieldKey::AllIndices => {
                    fields.extend(
                        (0..items.len())
                            .filter(|index| !literals.contains(&index.to_string()))
                            .map(|index| position(index, items, rule)),
                    );
                }
                FieldKey::AllProperties => {}
            }
        }
        fields
    }

    fn evaluate(fields: Vec<Field<'_>>) -> Validation<Vec<Evaluated>, FieldFailures> {
        Validation::all_vec(fields.into_iter().map(evaluate_field).collect())
    }

    fn aggregate(&self, failures: FieldFailures, positional: bool) -> AssertionError {
        let keys: Vec<&str> = failures.0.iter().map(|(key, _)| key.as_str()).collect();
        let message = format!(
            "{} field{} failed validation: {}",
            keys.len(),
            if keys.len() == 1 { "" } else { "s" },
            keys.join(", ")
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(code = self.kind.code(), failed = keys.len(), "rule map rejected value");

        let mut error = AssertionError::new(self.kind.code(), message);
        for (key, cause) in failures.0 {
            error = error.with_context(key, cause);
        }
        if self.kind == MapKind::Schema {
            error = error.with_schema(self.describe());
        }
        if positional {
            error = error.positional();
        }
        error
    }

    fn apply_object(&self, object: &Map<String, Value>) -> Result<Value, AssertionError> {
        match Self::evaluate(self.object_fields(object)) {
            Validation::Success(evaluated) => {
                let mut out = Map::new();
                for (slot, value) in evaluated {
                    if let (Slot::Property(name), Some(value)) = (slot, value) {
                        out.insert(name, value);
                    }
                }
                Ok(Value::Object(out))
            }
            Validation::Failure(failures) => Err(self.aggregate(failures, false)),
        }
    }

    fn apply_array(&self, items: &[Value]) -> Result<Value, AssertionError> {
        match Self::evaluate(self.array_fields(items)) {
            Validation::Success(evaluated) => {
                let mut out = items.to_vec();
                for (slot, value) in evaluated {
                    if let (Slot::Position(index), Some(value)) = (slot, value) {
                        // Past-the-end values only extend the array when contiguous.
                        let len = out.len();
                        match out.get_mut(index) {
                            Some(item) => *item = value,
                            None if index == len => out.push(value),
                            None => {}
                        }
                    }
                }
                Ok(Value::Array(out))
            }
            Validation::Failure(failures) => Err(self.aggregate(failures, true)),
        }
    }
}

fn position<'a>(index: usize, items: &'a [Value], rule: &'a Rule) -> Field<'a> {
    Field {
        key: index.to_string(),
        slot: Slot::Position(index),
        input: items.get(index),
        rule,
    }
}

fn evaluate_field(field: Field<'_>) -> Validation<Evaluated, FieldFailures> {
    let present = field.input.is_some();
    match field.rule.apply(field.input.unwrap_or(&NULL)) {
        Ok(value) if !present && value.is_null() => Validation::Success((field.slot, None)),
        Ok(value) => Validation::Success((field.slot, Some(value))),
        Err(error) => Validation::Failure(FieldFailures(vec![(field.key, error)])),
    }
}

impl Validate for RuleMap {
    fn apply(&self, value: &Value) -> Result<Value, AssertionError> {
        assert_not_null(value)?;
        match self.kind {
            MapKind::ObjectValues => self.apply_object(as_object(value)?),
            MapKind::ArrayItems => self.apply_array(as_array(value)?),
            MapKind::Rules | MapKind::Schema => match value {
                Value::Array(items) => self.apply_array(items),
                other => self.apply_object(as_object(other)?),
            },
        }
    }
}

impl Describe for RuleMap {
    fn describe(&self) -> Value {
        let is_array = match self.kind {
            MapKind::ArrayItems => true,
            MapKind::ObjectValues => false,
            MapKind::Rules | MapKind::Schema => {
                !self.entries.is_empty()
                    && self
                        .entries
                        .keys()
                        .all(|k| matches!(k, FieldKey::Index(_) | FieldKey::AllIndices))
            }
        };

        let mut schema = Map::new();
        if is_array {
            schema.insert("type".into(), json!("array"));
            let mut prefix = Vec::new();
            for (key, rule) in &self.entries {
                match key {
                    FieldKey::AllIndices => {
                        schema.insert("items".into(), rule.describe());
                    }
                    FieldKey::Index(index) => prefix.push((*index, rule.describe())),
                    _ => {}
                }
            }
            prefix.sort_by_key(|(index, _)| *index);
            let contiguous = prefix.iter().enumerate().all(|(i, (index, _))| i == *index);
            if !prefix.is_empty() && contiguous {
                let items = prefix.into_iter().map(|(_, s)| s).collect();
                schema.insert("prefixItems".into(), Value::Array(items));
            }
        } else {
            schema.insert("type".into(), json!("object"));
            let mut properties = Map::new();
            for (key, rule) in &self.entries {
                match key {
                    FieldKey::AllProperties => {
                        let described = rule.describe();
                        if !is_unconstrained(&described) {
                            schema.insert("additionalProperties".into(), described);
                        }
                    }
                    FieldKey::Name(_) | FieldKey::Index(_) => {
                        properties.insert(key.to_string(), rule.describe());
                    }
                    FieldKey::AllIndices => {}
                }
            }
            if !properties.is_empty() {
                schema.insert("properties".into(), Value::Object(properties));
            }
        }
        Value::Object(schema)
    }
}

impl From<RuleMap> for Rule {
    fn from(map: RuleMap) -> Self {
        Rule::nested(map)
    }
}

impl From<RuleMap> for RuleChain {
    fn from(map: RuleMap) -> Self {
        RuleChain::from(Rule::from(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{assert_number, assert_string};
    use crate::parse::{to_number, to_upper_case};

    fn person() -> RuleMap {
        RuleMap::new()
            .field("name", Rule::assert(assert_string))
            .field("age", Rule::assert(assert_number))
    }

    #[test]
    fn test_valid_object_returns_new_object() {
        let input = json!({"name": "Ann", "age": 30});
        assert_eq!(person().apply(&input).unwrap(), input);
    }

    #[test]
    fn test_collects_every_failure() {
        let error = person().apply(&json!({"name": false, "age": "25"})).unwrap_err();
        let keys: Vec<&str> = error.context.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "age"]);
        assert_eq!(error.field("name").unwrap().name, "E_NOT_STRING");
        assert_eq!(error.field("age").unwrap().name, "E_NOT_NUMBER");
    }

    #[test]
    fn test_single_failure_message() {
        let error = person().apply(&json!({"name": "Ann", "age": "x"})).unwrap_err();
        assert_eq!(error.message, "1 field failed validation: age");
        assert_eq!(error.context.len(), 1);
    }

    #[test]
    fn test_missing_field_is_validated_as_null() {
        let error = person().apply(&json!({"name": "Ann"})).unwrap_err();
        assert_eq!(error.field("age").unwrap().name, "E_NOT_NUMBER");
        assert_eq!(error.field("age").unwrap().value(), Some(&json!(null)));
    }

    #[test]
    fn test_missing_optional_field_is_omitted() {
        let map = RuleMap::new()
            .field("name", Rule::assert(assert_string))
            .field("nickname", Rule::assert(|_| Ok(())));
        assert_eq!(map.apply(&json!({"name": "Ann"})).unwrap(), json!({"name": "Ann"}));
    }

    #[test]
    fn test_unlisted_properties_are_dropped() {
        let map = RuleMap::new().field("a", Rule::transform(to_number));
        assert_eq!(map.apply(&json!({"a": "1", "b": 2})).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_top_level_type_checks() {
        assert_eq!(person().apply(&json!(null)).unwrap_err().name, "E_IS_NULL");
        assert_eq!(person().apply(&json!("x")).unwrap_err().name, "E_NOT_OBJECT");
        assert_eq!(
            RuleMap::array_items(Rule::assert(assert_number))
                .apply(&json!({}))
                .unwrap_err()
                .name,
            "E_NOT_ARRAY"
        );
        assert_eq!(
            RuleMap::object_values(Rule::assert(assert_number))
                .apply(&json!([]))
                .unwrap_err()
                .name,
            "E_NOT_OBJECT"
        );
    }

    #[test]
    fn test_index_keys_on_array() {
        let pair = RuleMap::new()
            .index(0, Rule::assert(assert_string))
            .index(1, Rule::transform(to_number));
        assert_eq!(pair.apply(&json!(["a", "2", true])).unwrap(), json!(["a", 2, true]));

        let error = pair.apply(&json!([1])).unwrap_err();
        assert_eq!(error.message, "2 fields failed validation: 0, 1");
    }

    #[test]
    fn test_index_key_on_object_uses_string_key() {
        let map = RuleMap::new().index(0, Rule::transform(to_upper_case));
        assert_eq!(map.apply(&json!({"0": "a"})).unwrap(), json!({"0": "A"}));
    }

    #[test]
    fn test_literal_beats_wildcard() {
        let map = RuleMap::new()
            .each_property(Rule::assert(assert_number))
            .field("label", Rule::assert(assert_string));
        assert!(map.apply(&json!({"x": 1, "label": "a"})).is_ok());

        let error = map.apply(&json!({"x": "1", "label": 2})).unwrap_err();
        assert_eq!(error.field("x").unwrap().name, "E_NOT_NUMBER");
        assert_eq!(error.field("label").unwrap().name, "E_NOT_STRING");
    }

    #[test]
    fn test_wildcard_key_does_not_collide_with_literal_name() {
        let map = RuleMap::new().field("ALL_PROPERTIES", Rule::assert(assert_number));
        assert_eq!(map.apply(&json!({"other": "x"})).unwrap_err().context.len(), 1);
        assert!(map.apply(&json!({"ALL_PROPERTIES": 1, "other": "x"})).is_ok());
    }

    #[test]
    fn test_array_items_keep_positions() {
        let strings = RuleMap::array_items(Rule::transform(to_upper_case));
        let input = json!(["a", "b"]);
        assert_eq!(strings.apply(&input).unwrap(), json!(["A", "B"]));
        assert_eq!(input, json!(["a", "b"]));
    }

    #[test]
    fn test_schema_attaches_description() {
        let schema = RuleMap::schema().field("id", Rule::pattern("^[0-9]+$").unwrap());
        let error = schema.apply(&json!({"id": "x"})).unwrap_err();
        assert_eq!(error.name, "E_SCHEMA_MISMATCH");
        assert_eq!(
            error.schema,
            Some(json!({
                "type": "object",
                "properties": {"id": {"type": "string", "pattern": "^[0-9]+$"}}
            }))
        );
    }

    #[test]
    fn test_describe_array() {
        let items = RuleMap::array_items(Rule::pattern("^a").unwrap());
        assert_eq!(
            items.describe(),
            json!({"type": "array", "items": {"type": "string", "pattern": "^a"}})
        );
    }

    #[test]
    fn test_failures_combine_in_order() {
        let a = FieldFailures(vec![("a".into(), AssertionError::new("E_A", "a"))]);
        let b = FieldFailures(vec![("b".into(), AssertionError::new("E_B", "b"))]);
        let keys: Vec<String> = a.combine(b).0.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_each_property_follows_input_order() {
        let numbers = RuleMap::new().each_property(Rule::assert(assert_number));
        let error = numbers.apply(&json!({"zeta": "x", "alpha": "y"})).unwrap_err();
        assert_eq!(error.message, "2 fields failed validation: zeta, alpha");
    }

    #[test]
    fn test_index_past_end_is_not_padded() {
        let one = Rule::transform(|_: &Value| Ok(json!(1)));
        let far = RuleMap::new().index(usize::MAX, one.clone());
        assert_eq!(far.apply(&json!([])).unwrap(), json!([]));

        let next = RuleMap::new().index(1, one.clone());
        assert_eq!(next.apply(&json!(["a"])).unwrap(), json!(["a", 1]));

        let gap = RuleMap::new().index(1 << 40, one);
        assert_eq!(gap.apply(&json!(["a"])).unwrap(), json!(["a"]));
    }

    #[test]
    fn test_numeric_name_and_index_share_one_entry() {
        let map = RuleMap::new()
            .field("0", Rule::assert(assert_number))
            .index(0, Rule::assert(assert_string));
        assert_eq!(map.len(), 1);

        let error = map.apply(&json!([1])).unwrap_err();
        assert_eq!(error.message, "1 field failed validation: 0");
        assert_eq!(error.context.len(), 1);
        assert_eq!(error.field("0").unwrap().name, "E_NOT_STRING");
    }

    #[test]
    fn test_array_failure_is_positional() {
        let map = RuleMap::new().field("0", Rule::assert(assert_string));
        assert!(map.apply(&json!([1])).unwrap_err().is_positional());
        assert!(!map.apply(&json!({"0": 1})).unwrap_err().is_positional());
    }
}
