//! Schemaless JSON documents.

use crate::id::EntityId;
use serde_json::{Map, Value};

/// A schemaless document: an entity id plus a JSON object of fields.
///
/// The id lives outside the field map; stores key documents by id and
/// never interpret field contents beyond query matching. Entity types
/// above the store layer decide what the fields mean.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: EntityId,
    fields: Map<String, Value>,
}

impl Document {
    /// Creates an empty document with the nil id.
    ///
    /// The store assigns a real id on first save.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: EntityId::nil(),
            fields: Map::new(),
        }
    }

    /// Creates a document with an explicit id and fields.
    #[must_use]
    pub fn with_id(id: EntityId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Returns the document id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Sets the document id.
    ///
    /// Stores call this when assigning an id on first save.
    pub fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Returns a field value, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Returns the field map.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the document, returning the field map.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Returns a copy with only the given fields retained.
    #[must_use]
    pub(crate) fn project_include(&self, fields: &[String]) -> Self {
        let mut projected = Map::new();
        for field in fields {
            if let Some(value) = self.fields.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
        Self {
            id: self.id,
            fields: projected,
        }
    }

    /// Returns a copy with the given fields removed.
    #[must_use]
    pub(crate) fn project_exclude(&self, fields: &[String]) -> Self {
        let mut projected = self.fields.clone();
        for field in fields {
            projected.remove(field);
        }
        Self {
            id: self.id,
            fields: projected,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_nil_id_and_no_fields() {
        let doc = Document::new();
        assert!(doc.id().is_nil());
        assert!(doc.fields().is_empty());
    }

    #[test]
    fn set_and_get_fields() {
        let mut doc = Document::new();
        doc.set("name", json!("laundry"));
        doc.set("completed", json!(false));

        assert_eq!(doc.get("name"), Some(&json!("laundry")));
        assert_eq!(doc.get("completed"), Some(&json!(false)));
        assert_eq!(doc.get("missing"), None);
    }

    #[test]
    fn include_projection_keeps_only_named_fields() {
        let mut doc = Document::new();
        doc.set("name", json!("a"));
        doc.set("deadline", json!("2026-01-01"));
        doc.set("completed", json!(true));

        let projected = doc.project_include(&["name".into(), "completed".into()]);
        assert_eq!(projected.fields().len(), 2);
        assert_eq!(projected.get("deadline"), None);
        assert_eq!(projected.id(), doc.id());
    }

    #[test]
    fn exclude_projection_drops_named_fields() {
        let mut doc = Document::new();
        doc.set("name", json!("a"));
        doc.set("secret", json!("hidden"));

        let projected = doc.project_exclude(&["secret".into()]);
        assert_eq!(projected.get("name"), Some(&json!("a")));
        assert_eq!(projected.get("secret"), None);
    }
}
