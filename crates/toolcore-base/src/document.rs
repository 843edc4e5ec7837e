//! Ordered key/value JSON document with typed access and merge.
//!
//! [`Document`] wraps a `serde_json::Map` (indexmap-backed via the
//! `preserve_order` feature, so key order is stable on disk) and layers two
//! contracts on top of raw JSON access:
//!
//! - **Typed accessors** that fail explicitly: a missing key yields
//!   [`DocumentError::MissingKey`], a present key of the wrong JSON type
//!   yields [`DocumentError::TypeMismatch`]. Never silent coercion.
//! - **Merge** ([`Document::merge_from`]): overwrite-by-key semantics that
//!   preserve keys the incoming document does not mention. This is the
//!   primitive that lets differently shaped states share one file without
//!   clobbering each other's fields.
//!
//! Equality compares keys and values only; insertion order is irrelevant.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;

/// An ordered mapping from string keys to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Document(Map::new())
    }

    /// Number of keys in the document.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a key/value pair, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Raw access to the JSON value at `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterates over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn require(&self, key: &str) -> Result<&Value, DocumentError> {
        self.0.get(key).ok_or_else(|| DocumentError::MissingKey {
            key: key.to_string(),
        })
    }

    fn mismatch(key: &str, expected: &'static str) -> DocumentError {
        DocumentError::TypeMismatch {
            key: key.to_string(),
            expected,
        }
    }

    /// The signed integer at `key`.
    pub fn get_i64(&self, key: &str) -> Result<i64, DocumentError> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| Self::mismatch(key, "integer"))
    }

    /// The non-negative integer at `key`.
    pub fn get_u64(&self, key: &str) -> Result<u64, DocumentError> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| Self::mismatch(key, "non-negative integer"))
    }

    /// The string at `key`.
    pub fn get_str(&self, key: &str) -> Result<&str, DocumentError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| Self::mismatch(key, "string"))
    }

    /// The boolean at `key`.
    pub fn get_bool(&self, key: &str) -> Result<bool, DocumentError> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| Self::mismatch(key, "boolean"))
    }

    /// The array at `key`.
    pub fn get_array(&self, key: &str) -> Result<&[Value], DocumentError> {
        self.require(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Self::mismatch(key, "array"))
    }

    /// The nested document at `key`, cloned out of this one.
    pub fn get_document(&self, key: &str) -> Result<Document, DocumentError> {
        self.require(key)?
            .as_object()
            .map(|map| Document(map.clone()))
            .ok_or_else(|| Self::mismatch(key, "object"))
    }

    /// Merges `other` into `self`: every key of `other` overwrites (or adds
    /// to) `self`; keys present only in `self` are left unchanged.
    pub fn merge_from(&mut self, other: &Document) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Document(map)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.0)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}
