//! draftroom/crates/storage-adapters/src/lib.rs
//!
//! `ArticleStore` implementations: an in-memory store for tests and the
//! default binary, and a SQLite store behind the `db-sqlite` feature.

pub mod memory;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use memory::MemoryArticleStore;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteArticleStore;
