//! Output module for writing crawl artifacts
//!
//! This module handles:
//! - Writing the per-seed JSON document
//! - Writing the per-seed SQLite archive
//! - Writing the per-seed CSV table

mod csv_output;
mod json;
mod sqlite_output;
mod traits;

pub use csv_output::CsvWriter;
pub use json::JsonWriter;
pub use sqlite_output::SqliteWriter;
pub use traits::{OutputError, OutputFormat, OutputResult, OutputWriter, SeedOutput};

/// Returns the writer for a format
pub fn writer_for(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter),
        OutputFormat::Sqlite => Box::new(SqliteWriter),
        OutputFormat::Csv => Box::new(CsvWriter),
    }
}
