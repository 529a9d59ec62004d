//! Document store abstraction.
//!
//! Defines the capability set the lifecycle hooks and the HTTP layer need
//! from a persistence backend.

use crate::error::StorageResult;
use async_trait::async_trait;
use folio_model::Document;
use folio_types::{CollectionSlug, DocumentId, GlobalSlug};

/// Restricts which documents a find returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Documents whose id is in the list.
    IdIn(Vec<DocumentId>),
    /// Documents whose top-level `field` equals `value`.
    FieldEq {
        field: String,
        value: serde_json::Value,
    },
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Filter::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::IdIn(ids) => ids.contains(&doc.id),
            Filter::FieldEq { field, value } => doc.data.get(field) == Some(value),
        }
    }
}

/// Parameters of a find. The default returns every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: Option<Filter>,
    pub limit: Option<usize>,
}

impl FindQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn limit(limit: usize) -> Self {
        Self {
            filter: None,
            limit: Some(limit),
        }
    }

    pub fn ids(ids: Vec<DocumentId>) -> Self {
        Self {
            filter: Some(Filter::IdIn(ids)),
            limit: None,
        }
    }

    pub fn filter(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Abstract document store.
///
/// Every call is a suspension point; implementations must not hold locks
/// across them. Documents come back in creation order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a short name for logs.
    fn backend_name(&self) -> &'static str;

    /// Lists documents in `collection` matching `query`.
    async fn find(
        &self,
        collection: CollectionSlug,
        query: FindQuery,
    ) -> StorageResult<Vec<Document>>;

    /// Fetches one document by id.
    async fn find_by_id(
        &self,
        collection: CollectionSlug,
        id: DocumentId,
    ) -> StorageResult<Option<Document>> {
        let mut docs = self.find(collection, FindQuery::ids(vec![id])).await?;
        Ok(docs.pop())
    }

    /// Inserts a new document. `data` must be a JSON object.
    async fn create(
        &self,
        collection: CollectionSlug,
        data: serde_json::Value,
    ) -> StorageResult<Document>;

    /// Bulk update: shallow-merges `patch` onto every document whose id is in
    /// `ids`. Unknown ids are skipped. Returns the updated documents.
    async fn update(
        &self,
        collection: CollectionSlug,
        ids: &[DocumentId],
        patch: &serde_json::Value,
    ) -> StorageResult<Vec<Document>>;

    /// Reads a global. Returns `Null` when it has never been written.
    async fn find_global(&self, slug: GlobalSlug) -> StorageResult<serde_json::Value>;

    /// Replaces a global's data and returns what was stored.
    async fn update_global(
        &self,
        slug: GlobalSlug,
        data: serde_json::Value,
    ) -> StorageResult<serde_json::Value>;
}

/// Current time as unix milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `ids` with repeats removed, first occurrence kept.
pub(crate) fn dedup_ids(ids: &[DocumentId]) -> Vec<DocumentId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
