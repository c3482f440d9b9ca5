//! URL handling module for Scroopy
//!
//! This module provides artifact-name sanitizing and the relative-link repair
//! used when a discovered link cannot be fetched as written.

mod resolve;
mod sanitize;

pub use resolve::repair_link;
pub use sanitize::sanitize_title;

use crate::ConfigError;
use url::Url;

/// Parses a user-supplied seed URL
///
/// Surrounding whitespace is ignored. Only `http` and `https` URLs are accepted.
pub fn parse_seed_url(seed: &str) -> Result<Url, ConfigError> {
    crate::config::validate_seed_url(seed)?;
    Url::parse(seed.trim()).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", seed, e)))
}
