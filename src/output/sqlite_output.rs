//! SQLite archive artifact writer
//!
//! This writer records a seed's pages into an archive file through the
//! storage backend.

use crate::output::traits::{OutputFormat, OutputResult, OutputWriter, SeedOutput};
use crate::storage::SqliteArchive;
use std::path::Path;

pub struct SqliteWriter;

impl OutputWriter for SqliteWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Sqlite
    }

    fn write_to(&self, output: &SeedOutput<'_>, path: &Path) -> OutputResult<()> {
        let mut archive = SqliteArchive::open(path)?;
        let run_id = archive.record_crawl(output.seed_url, output.pages, output.link_count)?;
        tracing::debug!(
            "Archived {} pages of {} as run {}",
            output.pages.len(),
            output.seed_url,
            run_id
        );
        Ok(())
    }
}
