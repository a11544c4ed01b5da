//! Attribute values for declarative state
//!
//! A resource instance is recorded as a tree of [`Value`]s. Nested objects
//! appear as lists of objects, so a single nested block is a list of one
//! element and is addressed positionally (`items.0.coffee.0.id`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Top-level attributes of a resource instance, or one nested block
pub type Attributes = BTreeMap<String, Value>;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Unset
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<Value>),
    Object(Attributes),
}

impl Value {
    /// Build an object value from key/value pairs
    pub fn object<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Attributes> {
        match self {
            Self::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Follow a dotted path such as `coffee.0.name`
    ///
    /// Numeric segments index into lists, other segments into objects.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Self::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Object(attrs) => attrs.get(segment),
            _ => None,
        })
    }
}

/// Follow a dotted path from a set of top-level attributes
pub fn lookup<'a>(attrs: &'a Attributes, path: &str) -> Option<&'a Value> {
    let (head, rest) = split_path(path);
    let value = attrs.get(head)?;
    match rest {
        Some(rest) => value.lookup(rest),
        None => Some(value),
    }
}

/// Split `items.0.coffee` into (`items`, Some(`0.coffee`))
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Drop null entries recursively
pub fn prune(attrs: Attributes) -> Attributes {
    attrs
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, prune_value(v)))
        .collect()
}

fn prune_value(value: Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.into_iter().map(prune_value).collect()),
        Value::Object(attrs) => Value::Object(prune(attrs)),
        other => other,
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Attributes> for Value {
    fn from(attrs: Attributes) -> Self {
        Self::Object(attrs)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "<{}>", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_items() -> Value {
        Value::List(vec![Value::object([
            (
                "coffee",
                Value::List(vec![Value::object([
                    ("id", Value::from(1)),
                    ("name", Value::from("Packer Spiced Latte")),
                ])]),
            ),
            ("quantity", Value::from(4)),
        ])])
    }

    #[test]
    fn test_lookup_nested_path() {
        let items = order_items();
        assert_eq!(
            items.lookup("0.coffee.0.name").and_then(Value::as_str),
            Some("Packer Spiced Latte")
        );
        assert_eq!(items.lookup("0.quantity").and_then(Value::as_int), Some(4));
        assert!(items.lookup("1.quantity").is_none());
        assert!(items.lookup("0.coffee.x").is_none());
    }

    #[test]
    fn test_lookup_from_attributes() {
        let mut attrs = Attributes::new();
        attrs.insert("items".to_string(), order_items());
        assert_eq!(
            lookup(&attrs, "items.0.coffee.0.id").and_then(Value::as_int),
            Some(1)
        );
        assert!(lookup(&attrs, "missing").is_none());
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("items"), ("items", None));
        assert_eq!(split_path("items.0.quantity"), ("items", Some("0.quantity")));
    }

    #[test]
    fn test_prune_removes_nulls() {
        let mut attrs = Attributes::new();
        attrs.insert("a".to_string(), Value::Null);
        attrs.insert(
            "b".to_string(),
            Value::object([("c", Value::Null), ("d", Value::from(1))]),
        );

        let pruned = prune(attrs);
        assert!(!pruned.contains_key("a"));
        assert_eq!(pruned["b"], Value::object([("d", Value::from(1))]));
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = r#"{"coffee":[{"id":3}],"quantity":2,"note":null}"#;
        let value: Value = serde_json::from_str(json).unwrap();
        assert_eq!(value.lookup("coffee.0.id"), Some(&Value::Int(3)));
        assert!(value.lookup("note").unwrap().is_null());
        assert_eq!(Value::from(2).to_string(), "2");
    }
}
