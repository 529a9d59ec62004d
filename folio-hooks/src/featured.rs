//! Featured propagation: every page and user referenced from the settings
//! global gets `featured = true`.
//!
//! Propagation is one-way. Dropping an id from settings leaves the document
//! featured.

use crate::error::{HookError, HookResult};
use crate::observer::LifecycleObserver;
use async_trait::async_trait;
use folio_model::{FEATURED_FIELD, FEATURED_TARGETS, Settings};
use folio_storage::{DocumentStore, StorageError};
use folio_types::{CollectionSlug, GlobalSlug};
use tracing::{debug, info, warn};

/// A bulk update that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedUpdate {
    pub collection: CollectionSlug,
    /// Ids listed in settings.
    pub requested: usize,
    /// Documents the store actually matched.
    pub updated: usize,
}

/// A bulk update that failed.
#[derive(Debug)]
pub struct PropagationFailure {
    pub collection: CollectionSlug,
    pub error: StorageError,
}

/// Result of [`propagate_featured`].
#[derive(Debug)]
pub enum PropagationOutcome {
    /// Every non-empty list was applied (or there was nothing to do).
    Complete { applied: Vec<FeaturedUpdate> },
    /// Some lists applied, some failed. Applied updates stay committed.
    Partial {
        applied: Vec<FeaturedUpdate>,
        failed: Vec<PropagationFailure>,
    },
    /// Every attempted update failed.
    Failed { failed: Vec<PropagationFailure> },
}

impl PropagationOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    pub fn applied(&self) -> &[FeaturedUpdate] {
        match self {
            Self::Complete { applied } | Self::Partial { applied, .. } => applied,
            Self::Failed { .. } => &[],
        }
    }

    pub fn failures(&self) -> &[PropagationFailure] {
        match self {
            Self::Complete { .. } => &[],
            Self::Partial { failed, .. } | Self::Failed { failed } => failed,
        }
    }
}

/// Marks every document referenced by `settings` as featured.
///
/// Pages are updated before users. Each non-empty list is one bulk update;
/// an empty list issues no store call. The updates are independent: a failed
/// one does not prevent or roll back the other.
pub async fn propagate_featured(
    store: &dyn DocumentStore,
    settings: &Settings,
) -> PropagationOutcome {
    let patch = serde_json::json!({ FEATURED_FIELD: true });
    let mut applied = Vec::new();
    let mut failed = Vec::new();

    for collection in FEATURED_TARGETS {
        let ids = settings.references(collection);
        if ids.is_empty() {
            continue;
        }

        debug!("Featuring {} {} document(s)", ids.len(), collection);
        match store.update(collection, ids, &patch).await {
            Ok(docs) => {
                debug!("Featured {} {} document(s)", docs.len(), collection);
                applied.push(FeaturedUpdate {
                    collection,
                    requested: ids.len(),
                    updated: docs.len(),
                });
            }
            Err(error) => failed.push(PropagationFailure { collection, error }),
        }
    }

    match (applied.is_empty(), failed.is_empty()) {
        (_, true) => PropagationOutcome::Complete { applied },
        (true, false) => PropagationOutcome::Failed { failed },
        (false, false) => PropagationOutcome::Partial { applied, failed },
    }
}

/// Post-change observer on the settings global.
///
/// Store failures are logged and swallowed so the administrator's settings
/// write is never undone. A settings document that cannot be parsed is
/// reported as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeaturedPropagation;

#[async_trait]
impl LifecycleObserver for FeaturedPropagation {
    fn name(&self) -> &'static str {
        "featured-propagation"
    }

    async fn after_global_change(
        &self,
        global: GlobalSlug,
        doc: &serde_json::Value,
        store: &dyn DocumentStore,
    ) -> HookResult<()> {
        if global != GlobalSlug::Settings {
            return Ok(());
        }

        let settings = Settings::from_value(doc)
            .map_err(|source| HookError::InvalidDocument { global, source })?;

        let outcome = propagate_featured(store, &settings).await;
        for update in outcome.applied() {
            if update.updated < update.requested {
                info!(
                    "Featured {}/{} {}: some referenced ids do not exist",
                    update.updated, update.requested, update.collection
                );
            }
        }
        for failure in outcome.failures() {
            warn!(
                "Featured propagation to {} failed: {}",
                failure.collection, failure.error
            );
        }
        Ok(())
    }
}
