#![allow(dead_code)]

use async_trait::async_trait;
use folio_model::Document;
use folio_storage::{DocumentStore, FindQuery, MemoryStore, StorageError, StorageResult};
use folio_types::{CollectionSlug, DocumentId, GlobalSlug};
use std::collections::HashSet;
use std::sync::Mutex;

/// A store call as seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find(CollectionSlug, Option<usize>),
    Create(CollectionSlug),
    Update(CollectionSlug, Vec<DocumentId>),
}

/// Wraps a [`MemoryStore`], records every call and fails chosen operations.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    failing_updates: Mutex<HashSet<CollectionSlug>>,
    failing_finds: Mutex<bool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates_to(&self, collection: CollectionSlug) {
        self.failing_updates.lock().unwrap().insert(collection);
    }

    pub fn fail_finds(&self) {
        *self.failing_finds.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn find(
        &self,
        collection: CollectionSlug,
        query: FindQuery,
    ) -> StorageResult<Vec<Document>> {
        self.record(Call::Find(collection, query.limit));
        let failing = *self.failing_finds.lock().unwrap();
        if failing {
            return Err(StorageError::Unavailable("simulated outage".into()));
        }
        self.inner.find(collection, query).await
    }

    async fn create(
        &self,
        collection: CollectionSlug,
        data: serde_json::Value,
    ) -> StorageResult<Document> {
        self.record(Call::Create(collection));
        self.inner.create(collection, data).await
    }

    async fn update(
        &self,
        collection: CollectionSlug,
        ids: &[DocumentId],
        patch: &serde_json::Value,
    ) -> StorageResult<Vec<Document>> {
        self.record(Call::Update(collection, ids.to_vec()));
        let failing = self.failing_updates.lock().unwrap().contains(&collection);
        if failing {
            return Err(StorageError::Unavailable(format!("simulated {collection} timeout")));
        }
        self.inner.update(collection, ids, patch).await
    }

    async fn find_global(&self, slug: GlobalSlug) -> StorageResult<serde_json::Value> {
        self.inner.find_global(slug).await
    }

    async fn update_global(
        &self,
        slug: GlobalSlug,
        data: serde_json::Value,
    ) -> StorageResult<serde_json::Value> {
        self.inner.update_global(slug, data).await
    }
}

pub async fn create_page(store: &dyn DocumentStore, title: &str) -> DocumentId {
    store
        .create(CollectionSlug::Pages, serde_json::json!({ "title": title }))
        .await
        .unwrap()
        .id
}

pub async fn create_user(store: &dyn DocumentStore, name: &str) -> DocumentId {
    store
        .create(CollectionSlug::Users, serde_json::json!({ "name": name }))
        .await
        .unwrap()
        .id
}

pub async fn is_featured(
    store: &dyn DocumentStore,
    collection: CollectionSlug,
    id: DocumentId,
) -> bool {
    store
        .find_by_id(collection, id)
        .await
        .unwrap()
        .is_some_and(|d| d.is_featured())
}
