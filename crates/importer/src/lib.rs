//! Bulk language import engine.
//!
//! [`import_batch`] takes pre-parsed rows and a config, writes each row
//! through an [`ImportStore`], and returns an [`ImportSummary`] describing
//! every attempted row. Row-level problems never surface as errors; only
//! the summary's `error` field reports batch-level failure.
//!
//! The store has no multi-statement transactions available, so the create
//! path undoes its own partial writes when a later step fails.
//!
//! [`ImportSummary`]: langmap_core::import::ImportSummary

pub mod invalidation;
pub mod memory_store;
pub mod orchestrator;
pub mod pg_store;
pub mod store;
pub mod worker;

pub use invalidation::{CacheInvalidator, NoopInvalidator, LANGUAGES_VIEW};
pub use memory_store::MemoryStore;
pub use orchestrator::{import_batch, spawn_import_batch};
pub use pg_store::PgImportStore;
pub use store::{ImportStore, LanguageMetadata, NewLanguage, StoreError};
pub use worker::{import_row, RowContext};
