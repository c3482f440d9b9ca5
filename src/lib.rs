//! Scroopy: a one-hop page text scraper
//!
//! This crate fetches web pages, extracts their visible text, optionally follows
//! the links found on a seed page one level deep, and writes the results as JSON,
//! a SQLite archive, and CSV.

pub mod config;
pub mod crawler;
pub mod job;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

pub use crawler::FailureCause;
pub use output::OutputError;

/// Main error type for Scroopy operations
#[derive(Debug, Error)]
pub enum ScroopyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to crawl {url}: {cause}")]
    Crawl { url: String, cause: FailureCause },

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScroopyError {
    /// Returns the URL this error originated from, if it is a crawl failure
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Crawl { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Returns the crawl failure cause, if any
    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Self::Crawl { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Scroopy operations
pub type Result<T> = std::result::Result<T, ScroopyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    discover_links, extract_text, Coordinator, CrawlResult, FetchOutcome, LinkFailure,
    PageRecord, SubpageCrawl,
};
pub use job::{run_job, JobReport, JobRequest, SeedRequest};
pub use crate::url::{repair_link, sanitize_title};
