//! Shared state and HTTP API for the Folio server.

mod api;
pub mod config;
mod error;

use axum::Router;
use axum::routing::{get, post};
use folio_auth::HashParams;
use folio_hooks::Lifecycle;
use folio_model::Schema;
use folio_storage::DocumentStore;
use std::sync::Arc;

pub use config::{AutoLogin, ServerConfig};
pub use error::{ApiError, ApiResult};

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub lifecycle: Arc<Lifecycle>,
    pub schema: Arc<Schema>,
    pub hash_params: HashParams,
    pub auto_login: Option<AutoLogin>,
}

impl AppState {
    /// State with the built-in schema and default hashing cost.
    pub fn new(store: Arc<dyn DocumentStore>, lifecycle: Lifecycle) -> Self {
        Self {
            store,
            lifecycle: Arc::new(lifecycle),
            schema: Arc::new(Schema::builtin()),
            hash_params: HashParams::default(),
            auto_login: None,
        }
    }

    pub fn with_auto_login(mut self, auto_login: Option<AutoLogin>) -> Self {
        self.auto_login = auto_login;
        self
    }

    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }
}

/// Build the HTTP API router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/globals/settings",
            get(api::get_settings).post(api::update_settings),
        )
        .route("/api/admin/auto-login", get(api::auto_login))
        .route(
            "/api/{collection}",
            get(api::list_documents).post(api::create_document),
        )
        .route("/api/{collection}/login", post(api::login))
        .route("/api/{collection}/{id}", get(api::get_document))
        .with_state(state)
}
