use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{DocumentId, DocumentStoreError, Result};

/// The body of a document: field names mapped to JSON values.
pub type Fields = serde_json::Map<String, Value>;

/// Field names owned by the store. They are dropped from incoming data so a
/// caller can never overwrite the identifier or the timestamps.
pub const RESERVED_FIELDS: [&str; 4] = ["_id", "id", "created_at", "updated_at"];

/// A persisted document.
///
/// Serializes as a single flat object: the body fields plus `id` (as a
/// string), `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Storage-assigned identifier.
    pub id: DocumentId,

    /// When the document was inserted.
    pub created_at: DateTime<Utc>,

    /// When the document was last written.
    pub updated_at: DateTime<Utc>,

    /// Caller-supplied fields.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Creates a new document with a fresh ID and both timestamps set to `now`.
    pub fn new(fields: Fields, now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            created_at: now,
            updated_at: now,
            fields: without_reserved(fields),
        }
    }

    /// Overwrites the given fields, leaving every other field untouched.
    pub fn merge(&mut self, patch: Fields, now: DateTime<Utc>) {
        self.fields.extend(without_reserved(patch));
        self.updated_at = now;
    }

    /// Replaces the whole body.
    pub fn replace(&mut self, fields: Fields, now: DateTime<Utc>) {
        self.fields = without_reserved(fields);
        self.updated_at = now;
    }

    /// Returns a field value, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserializes the body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode(self.fields.clone())
    }
}

/// Deserializes a document body into a typed value.
pub fn decode<T: DeserializeOwned>(fields: Fields) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Serializes a typed value into a document body.
///
/// Fails if the value does not serialize to a JSON object.
pub fn encode<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DocumentStoreError::Serialization(
            <serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {other}"
            )),
        )),
    }
}

/// Drops store-owned keys from a body.
pub fn without_reserved(mut fields: Fields) -> Fields {
    for name in RESERVED_FIELDS {
        fields.remove(name);
    }
    fields
}
