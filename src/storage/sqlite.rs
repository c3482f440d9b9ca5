//! SQLite archive implementation
//!
//! An archive file holds the pages extracted for one or more seed URLs.
//! Recording a seed again replaces its previous run.

use crate::crawler::{CrawlResult, PageRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::{RunRecord, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite archive backend
pub struct SqliteArchive {
    conn: Connection,
}

impl SqliteArchive {
    /// Opens or creates an archive file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteArchive)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory archive (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Stores the pages of one seed crawl, replacing any earlier run for that seed
    ///
    /// Returns the id of the new run.
    pub fn record_crawl(
        &mut self,
        seed_url: &str,
        pages: &CrawlResult,
        link_count: usize,
    ) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM runs WHERE seed_url = ?1", params![seed_url])?;
        tx.execute(
            "INSERT INTO runs (seed_url, crawled_at, link_count) VALUES (?1, ?2, ?3)",
            params![seed_url, Utc::now().to_rfc3339(), link_count as i64],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO pages (run_id, position, url, content, main_content, link_no)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, (url, record)) in pages.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    url,
                    record.content,
                    record.is_main_content,
                    record.link_index as i64,
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    /// Returns the latest run recorded for a seed, if any
    pub fn latest_run(&self, seed_url: &str) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, seed_url, crawled_at, link_count FROM runs
                 WHERE seed_url = ?1 ORDER BY id DESC LIMIT 1",
                params![seed_url],
                |row| {
                    Ok(RunRecord {
                        id: row.get(0)?,
                        seed_url: row.get(1)?,
                        crawled_at: row.get(2)?,
                        link_count: row.get::<_, i64>(3)? as usize,
                    })
                },
            )
            .optional()?;

        Ok(run)
    }

    /// Loads the pages stored for a seed, in their original order
    pub fn load_pages(&self, seed_url: &str) -> StorageResult<CrawlResult> {
        let run = self
            .latest_run(seed_url)?
            .ok_or_else(|| StorageError::RunNotFound(seed_url.to_string()))?;

        let mut stmt = self.conn.prepare(
            "SELECT url, content, main_content, link_no FROM pages
             WHERE run_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![run.id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                PageRecord {
                    content: row.get(1)?,
                    is_main_content: row.get(2)?,
                    link_index: row.get::<_, i64>(3)? as usize,
                },
            ))
        })?;

        let mut pages = CrawlResult::new();
        for row in rows {
            let (url, record) = row?;
            pages.insert(url, record);
        }

        Ok(pages)
    }

    /// Counts all stored pages across runs
    pub fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
