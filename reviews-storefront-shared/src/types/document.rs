//! Entity document types for the storage write path.
//!
//! Documents are handed to the storage layer as a typed envelope rather than an
//! untyped map: the identifier and the filterable fields are declared up front,
//! everything else travels in an opaque stored-only bag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a stored document.
///
/// Review documents carry numeric ids assigned by the upstream system; other
/// entity types may key documents by string. Serializes as the bare JSON
/// scalar so engine `_id` fields round-trip without wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(u64),
    Str(String),
}

impl DocumentId {
    /// JSON scalar used for `_id` and id-list fields in engine requests.
    pub fn to_json(&self) -> Value {
        match self {
            DocumentId::Int(id) => Value::from(*id),
            DocumentId::Str(id) => Value::from(id.as_str()),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Int(id) => write!(f, "{}", id),
            DocumentId::Str(id) => f.write_str(id),
        }
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        DocumentId::Int(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId::Str(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId::Str(id)
    }
}

/// Value of a declared filterable field.
///
/// Term filters match on exact primitive values, so only primitives are
/// representable here. Anything richer belongs in the stored-only bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// JSON scalar used in document bodies and term filters.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(value) => Value::from(*value),
            FieldValue::Int(value) => Value::from(*value),
            FieldValue::Float(value) => Value::from(*value),
            FieldValue::Str(value) => Value::from(value.as_str()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

/// Conjunctive equality filter: every entry must match exactly.
pub type FilterTerms = BTreeMap<String, FieldValue>;

/// Document envelope handed to the storage write path.
///
/// # Fields
///
/// - `id`: Required stable identifier; documents with the same id overwrite
///   each other
/// - `parent`: Optional parent document id, used as the bulk routing key so
///   parent and child documents land on the same shard; never written into
///   the document body
/// - `indexed`: Declared filterable fields, restricted to primitives
/// - `stored`: Opaque fields stored and returned verbatim, never filtered on
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDocument {
    pub id: DocumentId,
    pub parent: Option<DocumentId>,
    pub indexed: BTreeMap<String, FieldValue>,
    pub stored: Map<String, Value>,
}

impl EntityDocument {
    /// Create an empty document with the given id.
    ///
    /// # Example
    ///
    /// ```
    /// use reviews_storefront_shared::EntityDocument;
    /// use serde_json::json;
    ///
    /// let doc = EntityDocument::new(42u64)
    ///     .indexed_field("product_id", 7i64)
    ///     .indexed_field("visibility", "default")
    ///     .stored_field("title", json!("Great product"));
    /// assert_eq!(doc.to_json()["product_id"], json!(7));
    /// ```
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            indexed: BTreeMap::new(),
            stored: Map::new(),
        }
    }

    /// Attach a parent id; bulk writes route the document by it.
    pub fn with_parent(mut self, parent: impl Into<DocumentId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare a filterable field.
    pub fn indexed_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.indexed.insert(name.into(), value.into());
        self
    }

    /// Add an opaque stored-only field.
    pub fn stored_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.stored.insert(name.into(), value);
        self
    }

    /// Flatten the envelope into the single JSON object written to storage.
    ///
    /// The id is emitted under `id` next to every declared and stored field.
    /// Field names must be unique across the whole envelope; a stored field
    /// named like an indexed field (or `id`) wins, matching plain map merge.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("id".to_string(), self.id.to_json());
        for (name, value) in &self.indexed {
            body.insert(name.clone(), value.to_json());
        }
        for (name, value) in &self.stored {
            body.insert(name.clone(), value.clone());
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_display() {
        assert_eq!(DocumentId::from(42u64).to_string(), "42");
        assert_eq!(DocumentId::from("rating_1").to_string(), "rating_1");
    }

    #[test]
    fn test_document_id_serializes_as_scalar() {
        assert_eq!(serde_json::to_value(DocumentId::from(7u64)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(DocumentId::from("abc")).unwrap(),
            json!("abc")
        );
    }

    #[test]
    fn test_field_value_untagged_round_trip() {
        let values = vec![
            FieldValue::Bool(true),
            FieldValue::Int(-3),
            FieldValue::Float(2.5),
            FieldValue::Str("default".to_string()),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(value, back);
        }
    }

    #[test]
    fn test_to_json_flattens_envelope() {
        let doc = EntityDocument::new(5u64)
            .indexed_field("product_id", 31i64)
            .indexed_field("visibility", "default")
            .stored_field("title", json!("Five stars"))
            .stored_field("ratings", json!([{ "rating_id": 1, "value": 5 }]));

        assert_eq!(
            doc.to_json(),
            json!({
                "id": 5,
                "product_id": 31,
                "visibility": "default",
                "title": "Five stars",
                "ratings": [{ "rating_id": 1, "value": 5 }],
            })
        );
    }

    #[test]
    fn test_parent_is_not_part_of_the_body() {
        let doc = EntityDocument::new(9u64).with_parent(3u64);

        assert_eq!(doc.parent, Some(DocumentId::Int(3)));
        assert_eq!(doc.to_json(), json!({ "id": 9 }));
    }
}
