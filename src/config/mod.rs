//! Configuration module for Scroopy
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use scroopy::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scroopy.toml")).unwrap();
//! println!("Request timeout: {}s", config.crawler.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SeedEntry, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
pub(crate) use validation::validate_seed_url;
