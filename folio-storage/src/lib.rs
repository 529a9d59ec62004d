//! Storage layer for Folio.
//!
//! Everything above this crate talks to persistence through the
//! [`DocumentStore`] trait, passed explicitly as `&dyn DocumentStore`.
//!
//! # Adapters
//!
//! - [`MemoryStore`] keeps documents in process memory (default, tests)
//! - [`DuckDbStore`] persists documents as JSON text in a DuckDB file
//!
//! Both return documents in creation order and treat bulk updates as a
//! shallow merge of the patch onto each matched document.

mod duck;
mod error;
mod memory;
mod store;

pub use duck::{DuckDbStore, open_duckdb_with_wal_recovery};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{DocumentStore, Filter, FindQuery};
