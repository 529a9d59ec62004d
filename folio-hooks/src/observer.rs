//! Lifecycle observer abstraction.
//!
//! The runtime calls observers at two defined points:
//!
//! | point                 | when                                | error policy |
//! |-----------------------|-------------------------------------|--------------|
//! | `on_init`             | once, before serving requests       | propagated; startup aborts |
//! | `after_global_change` | after a global write has committed  | collected and logged; the write stands |

use crate::error::HookResult;
use async_trait::async_trait;
use folio_storage::DocumentStore;
use folio_types::GlobalSlug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Receives lifecycle callbacks from the runtime.
///
/// Both methods default to doing nothing, so an observer only implements the
/// points it cares about.
#[async_trait]
pub trait LifecycleObserver: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Called once at process start.
    async fn on_init(&self, store: &dyn DocumentStore) -> HookResult<()> {
        let _ = store;
        Ok(())
    }

    /// Called after `global` was successfully replaced by `doc`.
    async fn after_global_change(
        &self,
        global: GlobalSlug,
        doc: &serde_json::Value,
        store: &dyn DocumentStore,
    ) -> HookResult<()> {
        let _ = (global, doc, store);
        Ok(())
    }
}

/// An observer that failed during `after_global_change`.
#[derive(Debug)]
pub struct ObserverFailure {
    pub observer: &'static str,
    pub error: crate::HookError,
}

/// Ordered set of observers plus the per-point error policy.
#[derive(Clone, Default)]
pub struct Lifecycle {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer. Observers run in registration order.
    pub fn with_observer(mut self, observer: impl LifecycleObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Runs every `on_init` in order, stopping at the first error.
    pub async fn init(&self, store: &dyn DocumentStore) -> HookResult<()> {
        for observer in &self.observers {
            debug!("Running init observer {}", observer.name());
            observer.on_init(store).await?;
        }
        Ok(())
    }

    /// Runs every `after_global_change`. A failing observer does not stop
    /// the others; failures are logged and handed back to the caller.
    pub async fn after_global_change(
        &self,
        global: GlobalSlug,
        doc: &serde_json::Value,
        store: &dyn DocumentStore,
    ) -> Vec<ObserverFailure> {
        let mut failures = Vec::new();
        for observer in &self.observers {
            if let Err(error) = observer.after_global_change(global, doc, store).await {
                warn!("Observer {} failed after {} change: {}", observer.name(), global, error);
                failures.push(ObserverFailure {
                    observer: observer.name(),
                    error,
                });
            }
        }
        failures
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("Lifecycle").field("observers", &names).finish()
    }
}
