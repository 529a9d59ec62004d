//! Core type definitions for Folio.
//!
//! This crate defines the small, storage-agnostic types every other Folio
//! crate speaks in:
//! - Document identifiers (UUID v7)
//! - Collection and global slugs
//!
//! Field-level shapes (pages, users, settings) live in `folio-model`.

mod ids;
mod slug;

pub use ids::DocumentId;
pub use slug::{CollectionSlug, GlobalSlug};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("unknown global: {0}")]
    UnknownGlobal(String),
}
