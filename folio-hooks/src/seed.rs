//! Startup seeding: guarantee the users collection is never empty.

use crate::error::HookResult;
use crate::observer::LifecycleObserver;
use async_trait::async_trait;
use folio_auth::{Credentials, HashParams, user_document};
use folio_storage::{DocumentStore, FindQuery};
use folio_types::{CollectionSlug, DocumentId};
use tracing::{debug, info};

/// What [`seed_default_user`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection was empty; this user was created.
    Created(DocumentId),
    /// At least one user existed; nothing was written.
    AlreadySeeded,
}

/// Creates a user from `credentials` if the users collection is empty.
///
/// Issues one find (limit 1) and at most one create. Store errors propagate.
/// Two processes starting against the same empty store can both create.
pub async fn seed_default_user(
    store: &dyn DocumentStore,
    credentials: &Credentials,
    params: &HashParams,
) -> HookResult<SeedOutcome> {
    let existing = store.find(CollectionSlug::Users, FindQuery::limit(1)).await?;
    if !existing.is_empty() {
        debug!("Users collection already populated, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let data = user_document(credentials, params)?;
    let user = store.create(CollectionSlug::Users, data).await?;
    info!("Seeded default user {} ({})", credentials.email, user.id);
    Ok(SeedOutcome::Created(user.id))
}

/// Init observer running [`seed_default_user`].
#[derive(Debug, Clone)]
pub struct DefaultUserSeeder {
    credentials: Credentials,
    params: HashParams,
}

impl DefaultUserSeeder {
    pub fn new(credentials: Credentials, params: HashParams) -> Self {
        Self { credentials, params }
    }
}

impl Default for DefaultUserSeeder {
    fn default() -> Self {
        Self::new(Credentials::development(), HashParams::default())
    }
}

#[async_trait]
impl LifecycleObserver for DefaultUserSeeder {
    fn name(&self) -> &'static str {
        "default-user-seeder"
    }

    async fn on_init(&self, store: &dyn DocumentStore) -> HookResult<()> {
        seed_default_user(store, &self.credentials, &self.params).await?;
        Ok(())
    }
}
