//! Error types for lifecycle observers.

use thiserror::Error;

/// Result type for lifecycle operations.
pub type HookResult<T> = Result<T, HookError>;

/// Errors an observer can report.
#[derive(Debug, Error)]
pub enum HookError {
    /// The document store failed.
    #[error("storage error: {0}")]
    Storage(#[from] folio_storage::StorageError),

    /// Credentials could not be prepared.
    #[error("auth error: {0}")]
    Auth(#[from] folio_auth::AuthError),

    /// The changed document does not have the expected shape.
    #[error("invalid {global} document: {source}")]
    InvalidDocument {
        global: folio_types::GlobalSlug,
        source: serde_json::Error,
    },
}
