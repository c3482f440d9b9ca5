//! Storage module for the SQLite crawl archive
//!
//! The archive is the binary artifact format: a single SQLite file per seed
//! holding the run metadata and every extracted page.

mod schema;
mod sqlite;

pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteArchive;

use thiserror::Error;

/// Errors that can occur during archive operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No run recorded for seed {0}")]
    RunNotFound(String),
}

/// Result type for archive operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A recorded crawl of one seed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub id: i64,
    pub seed_url: String,
    pub crawled_at: String,
    pub link_count: usize,
}
