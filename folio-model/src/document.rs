use folio_types::{CollectionSlug, DocumentId};
use serde::{Deserialize, Serialize};

/// Field set on pages and users referenced from settings.
pub const FEATURED_FIELD: &str = "featured";

/// Credential field on users. Never returned over the API.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

/// A document stored in one of the Folio collections.
///
/// `data` holds the collection's fields as a JSON object. Timestamps are
/// unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub collection: CollectionSlug,
    pub data: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Document {
    /// Extract a string value from `data` using a JSON pointer (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `data` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.data.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Whether the `featured` checkbox is set. Missing counts as unset.
    pub fn is_featured(&self) -> bool {
        self.data
            .get(FEATURED_FIELD)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Shallow-merge `patch` onto `data`: each top-level key in the patch
    /// replaces the same key in the document. Non-object patches are ignored.
    pub fn apply_patch(&mut self, patch: &serde_json::Value) {
        let Some(patch) = patch.as_object() else {
            return;
        };
        if !self.data.is_object() {
            self.data = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(data) = self.data.as_object_mut() {
            for (key, value) in patch {
                data.insert(key.clone(), value.clone());
            }
        }
    }

    /// Copy of this document with credential fields removed.
    pub fn redacted(&self) -> Self {
        let mut doc = self.clone();
        if let Some(data) = doc.data.as_object_mut() {
            data.remove(PASSWORD_HASH_FIELD);
        }
        doc
    }
}
