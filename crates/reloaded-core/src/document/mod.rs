//! The parsed launcher configuration document (`ReloadedII.json`).
//!
//! The launcher owns the full schema of this file; the bootstrapper only ever
//! reads a handful of string fields from the top-level object.  Everything else
//! is ignored.
//!
//! # Bounded parsing
//!
//! A [`ConfigDocument`] holds at most [`MAX_FIELDS`] JSON nodes.  Every value
//! in the tree counts as one node: the root object, each nested object or
//! array, and each scalar.  A file over the bound is rejected with
//! [`DocumentError::TooManyFields`] rather than partially read.
//!
//! # Encoding
//!
//! The raw bytes are handed to `serde_json` unchanged, so string values must be
//! UTF-8.  A leading UTF-8 byte-order mark is skipped.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

/// Maximum number of JSON nodes a configuration document may contain.
pub const MAX_FIELDS: usize = 512;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Error type for parsing the configuration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes are not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON root is an array or scalar instead of an object.
    #[error("expected a JSON object at the document root, found {found}")]
    NotAnObject { found: &'static str },

    /// The document holds more nodes than [`MAX_FIELDS`].
    #[error("document has more than {max} fields")]
    TooManyFields { max: usize },
}

/// Error type for reading a single field out of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The top-level object has no property with this name.
    #[error("field `{0}` is missing from the configuration")]
    Missing(String),

    /// The property exists but its value is not a JSON string.
    #[error("field `{field}` must be a string, found {found}")]
    NotAString { field: String, found: &'static str },
}

/// Immutable, parsed `ReloadedII.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
    node_count: usize,
}

impl ConfigDocument {
    /// Parses raw file contents into a document.
    ///
    /// Nodes are counted as they are read, so a duplicated key still counts
    /// toward the bound.  When a key repeats, the first occurrence wins.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::Malformed`] if the bytes are not valid JSON.
    /// - [`DocumentError::NotAnObject`] if the root value is not an object.
    /// - [`DocumentError::TooManyFields`] if the tree exceeds [`MAX_FIELDS`].
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut counter = NodeCounter::new(MAX_FIELDS);
        let mut de = serde_json::Deserializer::from_slice(bytes);
        let value = CountingSeed {
            counter: &mut counter,
        }
        .deserialize(&mut de)
        .and_then(|value| de.end().map(|()| value))
        .map_err(|e| {
            if counter.overflowed {
                DocumentError::TooManyFields { max: MAX_FIELDS }
            } else {
                DocumentError::Malformed(e)
            }
        })?;

        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(DocumentError::NotAnObject {
                    found: kind_of(&other),
                })
            }
        };

        let node_count = counter.count;
        debug!(fields = root.len(), nodes = node_count, "parsed configuration document");
        Ok(Self { root, node_count })
    }

    /// Returns the string value of the top-level property `name`.
    ///
    /// # Errors
    ///
    /// [`FieldError::Missing`] when the property is absent and
    /// [`FieldError::NotAString`] when its value is any other JSON type
    /// (including `null`).
    pub fn string_field(&self, name: &str) -> Result<&str, FieldError> {
        match self.root.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(FieldError::NotAString {
                field: name.to_string(),
                found: kind_of(other),
            }),
            None => Err(FieldError::Missing(name.to_string())),
        }
    }

    /// Number of JSON nodes in the document, root included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}

// ── Bounded deserialization ───────────────────────────────────────────────────

/// Running node count shared by every nested [`CountingSeed`].
struct NodeCounter {
    count: usize,
    max: usize,
    overflowed: bool,
}

impl NodeCounter {
    fn new(max: usize) -> Self {
        Self {
            count: 0,
            max,
            overflowed: false,
        }
    }

    fn add<E: de::Error>(&mut self) -> Result<(), E> {
        self.count += 1;
        if self.count > self.max {
            self.overflowed = true;
            return Err(E::custom(format_args!("more than {} fields", self.max)));
        }
        Ok(())
    }
}

/// Deserializes one JSON value into a [`Value`], counting it and every node
/// below it.
struct CountingSeed<'c> {
    counter: &'c mut NodeCounter,
}

impl<'de, 'c> DeserializeSeed<'de> for CountingSeed<'c> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'c> Visitor<'de> for CountingSeed<'c> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        self.counter.add()?;
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let counter = self.counter;
        counter.add()?;

        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(CountingSeed {
            counter: &mut *counter,
        })? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let counter = self.counter;
        counter.add()?;

        let mut members = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(CountingSeed {
                counter: &mut *counter,
            })?;
            // First occurrence wins.
            members.entry(key).or_insert(value);
        }
        Ok(Value::Object(members))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
