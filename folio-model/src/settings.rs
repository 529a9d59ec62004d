use folio_types::{CollectionSlug, DocumentId};
use serde::{Deserialize, Serialize};

/// Collections whose documents get featured from settings, in the order the
/// propagation visits them.
pub const FEATURED_TARGETS: [CollectionSlug; 2] = [CollectionSlug::Pages, CollectionSlug::Users];

/// The `settings` global: ordered references to pages and users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pages: Vec<DocumentId>,
    #[serde(default)]
    pub users: Vec<DocumentId>,
}

impl Settings {
    /// Parse the global's stored JSON. `null` reads as empty settings.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Settings::deserialize(value)
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "pages": self.pages,
            "users": self.users,
        })
    }

    /// Ids referenced for `collection`. Media is never referenced.
    pub fn references(&self, collection: CollectionSlug) -> &[DocumentId] {
        match collection {
            CollectionSlug::Pages => &self.pages,
            CollectionSlug::Users => &self.users,
            CollectionSlug::Media => &[],
        }
    }
}
