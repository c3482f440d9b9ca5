//! Output writer traits and types
//!
//! This module defines the trait interface for artifact writers and the
//! formats they produce.

use crate::crawler::CrawlResult;
use crate::storage::StorageError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Sqlite,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Sqlite, Self::Csv];

    /// Parses a format name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" | "archive" => Some(Self::Sqlite),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
            Self::Csv => "csv",
        }
    }

    /// File extension for artifacts of this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
            Self::Csv => "csv",
        }
    }

    /// Subdirectory of the output directory that holds this format
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Json => "JSONs",
            Self::Sqlite => "Archives",
            Self::Csv => "CSVs",
        }
    }

    /// Artifact path for a seed identifier under `root`
    pub fn artifact_path(&self, root: &Path, identifier: &str) -> PathBuf {
        root.join(self.directory())
            .join(format!("{}.{}", identifier, self.extension()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a writer needs to produce one seed's artifact
#[derive(Debug, Clone, Copy)]
pub struct SeedOutput<'a> {
    pub seed_url: &'a str,
    pub pages: &'a CrawlResult,

    /// Candidate links found on the seed (0 for non-recursive crawls)
    pub link_count: usize,
}

/// Trait for artifact writers
pub trait OutputWriter {
    /// The format this writer produces
    fn format(&self) -> OutputFormat;

    /// Writes the artifact to `path`, creating or replacing it
    fn write_to(&self, output: &SeedOutput<'_>, path: &Path) -> OutputResult<()>;

    /// Writes the artifact into the format's directory below `root`
    ///
    /// The file name is derived from the sanitized seed URL. Returns the path
    /// that was written.
    fn write(&self, output: &SeedOutput<'_>, root: &Path) -> OutputResult<PathBuf> {
        let format = self.format();
        let path = format.artifact_path(root, &crate::url::sanitize_title(output.seed_url));

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!("Created directory: {}", parent.display());
            }
        }

        self.write_to(output, &path)?;
        Ok(path)
    }
}
