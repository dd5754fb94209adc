use serde_json::Value;

use crate::{Document, DocumentId, Fields, Result};

/// Selects documents within a collection.
///
/// A filter is a conjunction: an optional identifier match plus exact
/// equality on any number of top-level fields. The empty filter matches
/// every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Match on the storage identifier.
    pub id: Option<DocumentId>,

    /// Match on top-level field values.
    pub fields: Fields,
}

impl Filter {
    /// Creates a filter that matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter for a specific document.
    pub fn by_id(id: DocumentId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Creates a filter from an external identifier string.
    ///
    /// Fails with `IdentifierFormat` when the string is not a valid ID, so
    /// callers can tell malformed input apart from a missing document.
    pub fn by_id_str(id: &str) -> Result<Self> {
        Ok(Self::by_id(id.parse()?))
    }

    /// Creates a filter on a single field value.
    pub fn by_field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().field(name, value)
    }

    /// Adds an identifier match.
    pub fn id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds a field equality match.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns true if this filter matches every document.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.fields.is_empty()
    }

    /// Returns true if the document satisfies every predicate.
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(id) = self.id
            && document.id != id
        {
            return false;
        }
        self.fields
            .iter()
            .all(|(name, expected)| document.get(name) == Some(expected))
    }

    /// Stable textual key for this filter within a collection.
    pub(crate) fn key(&self, collection: &str) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        format!("{collection}|{id}|{}", Value::Object(self.fields.clone()))
    }
}
