//! Settings blobs for widgets, columns and sections.
//!
//! Settings are schema-driven on the outside (see `pagewright-fields`) but
//! opaque to the tree itself. The one shape rule the model enforces is at
//! the wire boundary: the legacy backend emits `[]` where it means "empty
//! object", and the two are distinct on the wire, so deserialization
//! coerces an empty array into an empty map. Serialization always emits an
//! object.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A free-form settings object (`general`, `style`, `advanced`, or a
/// section/column `settings` blob)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsMap(Map<String, Value>);

impl SettingsMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build from a JSON value, applying the empty-array coercion.
    /// Non-object, non-empty-array values yield an empty map.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Shallow-merge `other` into `self`; keys in `other` win
    pub fn merge(&mut self, other: &SettingsMap) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for SettingsMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for SettingsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SettingsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingsVisitor;

        impl<'de> Visitor<'de> for SettingsVisitor {
            type Value = SettingsMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a settings object, an empty array, or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.insert(key, value);
                }
                Ok(SettingsMap(map))
            }

            // Legacy wire form: `[]` means "no settings"
            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                if access.next_element::<Value>()?.is_some() {
                    return Err(de::Error::custom(
                        "settings array must be empty (legacy empty-object form)",
                    ));
                }
                Ok(SettingsMap(Map::new()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SettingsMap(Map::new()))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SettingsMap(Map::new()))
            }
        }

        deserializer.deserialize_any(SettingsVisitor)
    }
}
