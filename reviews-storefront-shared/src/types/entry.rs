//! Read-side result types.
//!
//! Reads never return whole documents: callers enumerate the fields they need
//! and get back projected entries wrapped in an owned iterator.

use serde_json::{Map, Value};

/// One projected document returned by a read.
///
/// `id` is the raw engine document id; `fields` holds exactly the projection
/// the caller requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Entry {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Projected field by name, if it was part of the projection.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Owned, ordered iterator over read results.
///
/// Finite and single-pass; restarting means re-running the query.
#[derive(Debug)]
pub struct EntryIterator {
    entries: std::vec::IntoIter<Entry>,
}

impl EntryIterator {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
}

impl Iterator for EntryIterator {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for EntryIterator {}

impl From<Vec<Entry>> for EntryIterator {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str) -> Entry {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        Entry::new(id, fields)
    }

    #[test]
    fn test_iterator_preserves_order_and_length() {
        let iterator = EntryIterator::new(vec![entry("3"), entry("1"), entry("2")]);

        assert_eq!(iterator.len(), 3);
        let ids: Vec<String> = iterator.map(|e| e.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_empty_iterator() {
        let mut iterator = EntryIterator::new(Vec::new());

        assert!(iterator.is_empty());
        assert_eq!(iterator.len(), 0);
        assert!(iterator.next().is_none());
    }

    #[test]
    fn test_field_projection_access() {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("Solid"));
        let entry = Entry::new("11", fields);

        assert_eq!(entry.field("title"), Some(&json!("Solid")));
        assert_eq!(entry.field("missing"), None);
    }
}
