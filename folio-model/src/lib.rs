//! Document model for Folio.
//!
//! Defines the types the store, the lifecycle hooks and the HTTP layer share:
//! - [`Document`]: a stored record (id, collection, JSON payload, timestamps)
//! - [`Settings`]: the singleton global listing featured pages and users
//! - [`Schema`]: declarations of the built-in collections and globals
//!
//! Field payloads stay as JSON; nothing here validates them against the
//! schema.

mod document;
mod schema;
mod settings;

pub use document::{Document, FEATURED_FIELD, PASSWORD_HASH_FIELD};
pub use schema::{CollectionSchema, Field, FieldType, GlobalSchema, Schema};
pub use settings::{FEATURED_TARGETS, Settings};
