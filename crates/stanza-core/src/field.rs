/*
 * field.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Typed per-block field storage with coercion on write.
 */

//! Typed per-block field storage.
//!
//! Block types declare their fields with [`FieldSpec`]; each block instance
//! owns a [`FieldSet`] initialized from those declarations. State lives
//! outside the host runtime's field machinery entirely, because per-student
//! values are merged in after construction, which host-managed fields do
//! not support.
//!
//! Writes coerce by field kind and never fail: integers and floats that do
//! not parse fall back to zero, textual booleans compare case-insensitively
//! against `"true"`. Reads are exposed through
//! [`LightBlock::get`](crate::block::LightBlock::get) so that lazy state
//! loading has a single entry point.

use indexmap::IndexMap;
use serde_json::Value;

/// The primitive kinds a block field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Float,
    List,
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
    List(Vec<Value>),
}

impl FieldValue {
    /// The zero value for a field kind.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Integer => FieldValue::Integer(0),
            FieldKind::Boolean => FieldValue::Boolean(false),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::List => FieldValue::List(Vec::new()),
        }
    }

    /// Convert to a JSON value for the persisted blob.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::List(items) => Value::Array(items.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// A field declaration: name, kind, and an overridable default.
///
/// Not itself stateful; values live in the owning block's [`FieldSet`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    default: FieldValue,
}

impl FieldSpec {
    /// Declare a field with the kind's zero value as its default.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: FieldValue::default_for(kind),
        }
    }

    /// Override the declared default.
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn default(&self) -> &FieldValue {
        &self.default
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    kind: FieldKind,
    default: FieldValue,
    value: FieldValue,
}

/// The field values of one block instance, keyed by field name.
///
/// Iteration follows declaration order; the persisted JSON blob sorts its
/// keys, so equality checks against stored content are stable either way.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldEntry>,
}

impl FieldSet {
    /// Initialize every declared field to its default.
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        let fields = specs
            .iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    FieldEntry {
                        kind: spec.kind,
                        default: spec.default.clone(),
                        value: spec.default.clone(),
                    },
                )
            })
            .collect();
        Self { fields }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Current value of a declared field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).map(|entry| &entry.value)
    }

    /// Coerce and store a value. Returns false when no such field is
    /// declared; coercion itself never fails.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.fields.get_mut(name) {
            Some(entry) => {
                entry.value = coerce(entry.kind, &entry.default, value);
                true
            }
            None => false,
        }
    }

    /// Declared field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// JSON object of current values for the given field names.
    ///
    /// Names without a declared field are skipped.
    pub fn to_json(&self, names: &[String]) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        for name in names {
            if let Some(entry) = self.fields.get(name) {
                map.insert(name.clone(), entry.value.to_json());
            }
        }
        map
    }
}

/// Apply the write-coercion contract for a field kind.
///
/// Integer and Float substitute zero on parse failure; Boolean treats
/// textual input as a case-insensitive `"true"` test and keeps actual
/// booleans as-is. Input that a typed slot cannot represent at all falls
/// back to the declared default.
fn coerce(kind: FieldKind, default: &FieldValue, value: Value) -> FieldValue {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Null => default.clone(),
            other => FieldValue::Text(other.to_string()),
        },
        FieldKind::Integer => FieldValue::Integer(coerce_integer(&value)),
        FieldKind::Float => FieldValue::Float(coerce_float(&value)),
        FieldKind::Boolean => match value {
            Value::String(s) => FieldValue::Boolean(s.eq_ignore_ascii_case("true")),
            Value::Bool(b) => FieldValue::Boolean(b),
            _ => default.clone(),
        },
        FieldKind::List => match value {
            Value::Array(items) => FieldValue::List(items),
            _ => default.clone(),
        },
    }
}

fn coerce_integer(value: &Value) -> i64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn coerce_float(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_fields() -> FieldSet {
        FieldSet::from_specs(&[
            FieldSpec::new("kind", FieldKind::Text),
            FieldSpec::new("count", FieldKind::Integer),
            FieldSpec::new("done", FieldKind::Boolean),
            FieldSpec::new("weight", FieldKind::Float),
            FieldSpec::new("choices", FieldKind::List),
        ])
    }

    #[test]
    fn test_defaults() {
        let fields = item_fields();
        assert_eq!(fields.get("kind"), Some(&FieldValue::Text(String::new())));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(0)));
        assert_eq!(fields.get("done"), Some(&FieldValue::Boolean(false)));
        assert_eq!(fields.get("weight"), Some(&FieldValue::Float(0.0)));
        assert_eq!(fields.get("choices"), Some(&FieldValue::List(Vec::new())));
    }

    #[test]
    fn test_default_override() {
        let fields = FieldSet::from_specs(&[
            FieldSpec::new("count", FieldKind::Integer).with_default(FieldValue::Integer(5)),
        ]);
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn test_integer_coercion() {
        let mut fields = item_fields();

        assert!(fields.set("count", json!("42")));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(42)));

        fields.set("count", json!("abc"));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(0)));

        fields.set("count", json!(7));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(7)));

        fields.set("count", json!(null));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(0)));

        fields.set("count", json!(" 13 "));
        assert_eq!(fields.get("count"), Some(&FieldValue::Integer(13)));
    }

    #[test]
    fn test_boolean_coercion() {
        let mut fields = item_fields();

        fields.set("done", json!("TRUE"));
        assert_eq!(fields.get("done"), Some(&FieldValue::Boolean(true)));

        fields.set("done", json!("no"));
        assert_eq!(fields.get("done"), Some(&FieldValue::Boolean(false)));

        fields.set("done", json!(true));
        assert_eq!(fields.get("done"), Some(&FieldValue::Boolean(true)));
        assert_eq!(fields.get("done").and_then(FieldValue::as_boolean), Some(true));
    }

    #[test]
    fn test_float_coercion() {
        let mut fields = item_fields();

        fields.set("weight", json!("2.5"));
        assert_eq!(fields.get("weight"), Some(&FieldValue::Float(2.5)));

        fields.set("weight", json!("not a number"));
        assert_eq!(fields.get("weight"), Some(&FieldValue::Float(0.0)));

        fields.set("weight", json!(3));
        assert_eq!(fields.get("weight"), Some(&FieldValue::Float(3.0)));
        assert_eq!(fields.get("weight").and_then(FieldValue::as_float), Some(3.0));
    }

    #[test]
    fn test_text_and_list_stored_verbatim() {
        let mut fields = item_fields();

        fields.set("kind", json!("a"));
        assert_eq!(fields.get("kind"), Some(&FieldValue::Text("a".to_string())));
        assert_eq!(fields.get("kind").and_then(FieldValue::as_str), Some("a"));

        fields.set("choices", json!(["x", 2]));
        assert_eq!(
            fields.get("choices"),
            Some(&FieldValue::List(vec![json!("x"), json!(2)]))
        );
    }

    #[test]
    fn test_set_unknown_field() {
        let mut fields = item_fields();
        assert!(!fields.set("missing", json!(1)));
        assert_eq!(fields.get("missing"), None);
    }

    #[test]
    fn test_to_json_selects_named_fields() {
        let mut fields = item_fields();
        fields.set("count", json!(3));
        fields.set("kind", json!("b"));

        let names = vec![
            "kind".to_string(),
            "count".to_string(),
            "unknown".to_string(),
        ];
        let map = fields.to_json(&names);
        assert_eq!(map.len(), 2);
        assert_eq!(map["kind"], json!("b"));
        assert_eq!(map["count"], json!(3));
    }
}
