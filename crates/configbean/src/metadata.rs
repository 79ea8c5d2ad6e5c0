//! Metadata records that describe a configurable shape.
//!
//! A record is an ordered multimap from string keys to lists of strings. Key
//! shape decides meaning:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `@name` | attribute `name`; a `default:<text>` value supplies a default |
//! | `<name>` | element `name`; value is `leaf`, `collection:leaf`, `<type>` or `collection:<type>` |
//! | [`TARGET`] | mandatory target type name |
//! | [`KEYED_AS`] / [`KEY`] | optional key indexing, both or neither |
//! | [`TARGET_CONTRACTS`] | contracts to register under |
//! | [`SYMBOL_SPACES`] | symbol spaces this shape creates |
//! | [`INDEX_KEY`] | index entries; one prefixed by [`ELEMENT_NAME_PREFIX`] names the element |
//!
//! Any other key is carried but ignored by model construction.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fully-qualified name of the target type.
pub const TARGET: &str = "target";
/// Type name under which instances are indexed by key.
pub const KEYED_AS: &str = "keyed-as";
/// Name of the property acting as key.
pub const KEY: &str = "key";
/// Contracts the instance should be registered under.
pub const TARGET_CONTRACTS: &str = "target-contracts";
/// Type names for which this shape creates a symbol space.
pub const SYMBOL_SPACES: &str = "symbolSpaces";
/// Index entries of the injector.
pub const INDEX_KEY: &str = "index";
/// Index entry prefix that carries the element name of the shape.
pub const ELEMENT_NAME_PREFIX: &str = "ConfigInjector:";

pub(crate) const ATTRIBUTE_PREFIX: char = '@';
pub(crate) const DEFAULT_PREFIX: &str = "default:";
pub(crate) const COLLECTION_PREFIX: &str = "collection:";
pub(crate) const LEAF: &str = "leaf";

/// Ordered multimap of metadata entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    entries: Vec<(String, Vec<String>)>,
}

impl ConfigMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`. A new key goes to the end of the record.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// Replace all values under `key`, keeping its position if present.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// All values under `key`; empty when absent.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).first().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a record from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = ConfigMetadata::new();
        for (key, value) in iter {
            metadata.add(key, value);
        }
        metadata
    }
}

/// Scans a metadata value list for a `default:<text>` entry.
pub(crate) fn default_value(values: &[String]) -> Option<String> {
    values
        .iter()
        .find_map(|v| v.strip_prefix(DEFAULT_PREFIX))
        .map(str::to_string)
}

// A single value serializes as a string, anything else as a list, so records
// read naturally when hand-written in JSON.
impl Serialize for ConfigMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            match values.as_slice() {
                [single] => map.serialize_entry(key, single)?,
                many => map.serialize_entry(key, many)?,
            }
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValues {
    One(String),
    Many(Vec<String>),
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = ConfigMetadata;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of metadata keys to a string or a list of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut metadata = ConfigMetadata::new();
        while let Some((key, values)) = access.next_entry::<String, RawValues>()? {
            match values {
                RawValues::One(value) => metadata.add(key, value),
                RawValues::Many(values) => {
                    for value in values {
                        metadata.add(key.clone(), value);
                    }
                    if !metadata.contains_key(&key) {
                        metadata.set(key, Vec::new());
                    }
                }
            }
        }
        Ok(metadata)
    }

    // Also accept a list of [key, value] pairs, which keeps order even for
    // formats whose maps are unordered.
    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut metadata = ConfigMetadata::new();
        while let Some((key, value)) = access.next_element::<(String, String)>()? {
            metadata.add(key, value);
        }
        Ok(metadata)
    }
}

impl<'de> Deserialize<'de> for ConfigMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetadataVisitor)
    }
}
