use folio_types::{CollectionSlug, GlobalSlug};
use serde::{Deserialize, Serialize};

/// A single declared field on a collection or global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Target collection. Only meaningful when FieldType is Relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_to: Option<CollectionSlug>,
    /// Whether a relationship holds a list of ids.
    #[serde(default)]
    pub has_many: bool,
}

impl Field {
    fn simple(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            relation_to: None,
            has_many: false,
        }
    }

    /// Shorthand for a plain text field.
    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldType::Text)
    }

    /// Shorthand for a boolean checkbox.
    pub fn checkbox(name: &str) -> Self {
        Self::simple(name, FieldType::Checkbox)
    }

    /// Shorthand for an opaque rich-text field.
    pub fn rich_text(name: &str) -> Self {
        Self::simple(name, FieldType::RichText)
    }

    /// Shorthand for a has-many relationship to another collection.
    pub fn has_many(name: &str, relation_to: CollectionSlug) -> Self {
        Self {
            relation_to: Some(relation_to),
            has_many: true,
            ..Self::simple(name, FieldType::Relationship)
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The data type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Checkbox,
    RichText,
    Relationship,
}

/// Declares a collection's fields and capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub slug: CollectionSlug,
    pub fields: Vec<Field>,
    /// Documents carry login credentials (email, password hash).
    #[serde(default)]
    pub auth: bool,
    /// Documents carry an uploaded file.
    #[serde(default)]
    pub upload: bool,
    /// Field the admin shows as the document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_as_title: Option<String>,
}

impl CollectionSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Declares a singleton global's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSchema {
    pub slug: GlobalSlug,
    pub fields: Vec<Field>,
}

/// All collections and globals known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub collections: Vec<CollectionSchema>,
    pub globals: Vec<GlobalSchema>,
}

impl Schema {
    /// The users / pages / media collections and the settings global.
    pub fn builtin() -> Self {
        let users = CollectionSchema {
            slug: CollectionSlug::Users,
            fields: vec![Field::text("name"), Field::checkbox("featured")],
            auth: true,
            upload: false,
            use_as_title: None,
        };
        let pages = CollectionSchema {
            slug: CollectionSlug::Pages,
            fields: vec![
                Field::text("title"),
                Field::rich_text("content"),
                Field::checkbox("featured"),
            ],
            auth: false,
            upload: false,
            use_as_title: Some("title".into()),
        };
        let media = CollectionSchema {
            slug: CollectionSlug::Media,
            fields: vec![Field::text("text")],
            auth: false,
            upload: true,
            use_as_title: None,
        };
        let settings = GlobalSchema {
            slug: GlobalSlug::Settings,
            fields: vec![
                Field::has_many("pages", CollectionSlug::Pages).with_label("pages order"),
                Field::has_many("users", CollectionSlug::Users).with_label("users order"),
            ],
        };

        Self {
            collections: vec![users, pages, media],
            globals: vec![settings],
        }
    }

    pub fn collection(&self, slug: CollectionSlug) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    pub fn global(&self, slug: GlobalSlug) -> Option<&GlobalSchema> {
        self.globals.iter().find(|g| g.slug == slug)
    }
}
