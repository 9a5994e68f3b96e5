//! Query-carried values
//!
//! Everything a descriptor stores must survive a trip through a query
//! string, so values are limited to text, lists and key-sorted maps.
//! Numbers and booleans are accepted on entry and kept in their text form.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Key-sorted option map (processing options, encoding options)
pub type Options = BTreeMap<String, Value>;

/// A value that can be carried in a URL query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    List(Vec<Value>),
    Map(Options),
}

impl Value {
    /// Build a map value from key/value pairs
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(options(pairs))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Options> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Blank values are left out of URLs: whitespace-only text, empty lists
    /// and empty maps.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(text) => text.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// Drop empty lists and maps at any depth. `None` when nothing is left.
    ///
    /// Empty containers produce no query pairs, so a descriptor only
    /// survives a URL round trip once they are gone.
    pub fn pruned(self) -> Option<Value> {
        match self {
            Value::Text(text) => Some(Value::Text(text)),
            Value::List(items) => {
                let items: Vec<Value> = items.into_iter().filter_map(Value::pruned).collect();
                (!items.is_empty()).then_some(Value::List(items))
            }
            Value::Map(map) => {
                let map = prune_options(map);
                (!map.is_empty()).then_some(Value::Map(map))
            }
        }
    }

    /// Whether a list directly holds another list, which query strings
    /// cannot express.
    pub fn has_nested_list(&self) -> bool {
        match self {
            Value::Text(_) => false,
            Value::List(items) => items
                .iter()
                .any(|item| matches!(item, Value::List(_)) || item.has_nested_list()),
            Value::Map(map) => map.values().any(Value::has_nested_list),
        }
    }
}

/// [`Value::pruned`] applied to every entry of an option map
pub fn prune_options(map: Options) -> Options {
    map.into_iter()
        .filter_map(|(key, value)| value.pruned().map(|value| (key, value)))
        .collect()
}

/// Collect key/value pairs into an [`Options`] map
pub fn options<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Options
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            other => {
                let json = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

macro_rules! text_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Text(value.to_string())
                }
            }
        )*
    };
}

text_from_display!(i32, i64, u32, u64, usize, f32, f64, bool);

impl From<Options> for Value {
    fn from(value: Options) -> Self {
        Value::Map(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Text(text) => serde_json::Value::String(text.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Into::into).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), item.into()))
                    .collect(),
            ),
        }
    }
}

// Hand-written so YAML/JSON scalars (numbers, booleans) land as text.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, sequence or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Options::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}
