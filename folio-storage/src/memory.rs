//! In-process document store.

use crate::error::{StorageError, StorageResult};
use crate::store::{DocumentStore, FindQuery, dedup_ids, now_millis};
use async_trait::async_trait;
use folio_model::Document;
use folio_types::{CollectionSlug, DocumentId, GlobalSlug};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct State {
    // BTreeMap keyed by v7 ids keeps creation order.
    collections: HashMap<CollectionSlug, BTreeMap<DocumentId, Document>>,
    globals: HashMap<GlobalSlug, serde_json::Value>,
}

/// Document store backed by process memory. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: CollectionSlug) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find(
        &self,
        collection: CollectionSlug,
        query: FindQuery,
    ) -> StorageResult<Vec<Document>> {
        let state = self.state.read().await;
        let Some(docs) = state.collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(docs
            .values()
            .filter(|doc| query.filter.as_ref().is_none_or(|f| f.matches(doc)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        collection: CollectionSlug,
        data: serde_json::Value,
    ) -> StorageResult<Document> {
        if !data.is_object() {
            return Err(StorageError::InvalidData(format!(
                "{collection} document must be a JSON object"
            )));
        }

        let now = now_millis();
        let doc = Document {
            id: DocumentId::new(),
            collection,
            data,
            created_at: now,
            updated_at: now,
        };

        self.state
            .write()
            .await
            .collections
            .entry(collection)
            .or_default()
            .insert(doc.id, doc.clone());
        debug!("Created document {} in {}", doc.id, collection);
        Ok(doc)
    }

    async fn update(
        &self,
        collection: CollectionSlug,
        ids: &[DocumentId],
        patch: &serde_json::Value,
    ) -> StorageResult<Vec<Document>> {
        if !patch.is_object() {
            return Err(StorageError::InvalidData("patch must be a JSON object".into()));
        }

        let mut state = self.state.write().await;
        let Some(docs) = state.collections.get_mut(&collection) else {
            return Ok(Vec::new());
        };

        let now = now_millis();
        let mut updated = Vec::new();
        for id in dedup_ids(ids) {
            if let Some(doc) = docs.get_mut(&id) {
                doc.apply_patch(patch);
                doc.updated_at = now;
                updated.push(doc.clone());
            }
        }
        debug!(
            "Updated {}/{} documents in {}",
            updated.len(),
            ids.len(),
            collection
        );
        Ok(updated)
    }

    async fn find_global(&self, slug: GlobalSlug) -> StorageResult<serde_json::Value> {
        Ok(self
            .state
            .read()
            .await
            .globals
            .get(&slug)
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn update_global(
        &self,
        slug: GlobalSlug,
        data: serde_json::Value,
    ) -> StorageResult<serde_json::Value> {
        self.state.write().await.globals.insert(slug, data.clone());
        debug!("Updated global {}", slug);
        Ok(data)
    }
}
