use crate::config::types::{Config, CrawlerConfig, OutputConfig, SeedEntry, UserAgentConfig};
use crate::output::OutputFormat;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound for the per-request timeout (seconds)
const MAX_TIMEOUT_SECS: u64 = 600;

/// Upper bound for followed redirects
const MAX_REDIRECTS: usize = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.container_elements.is_empty() {
        return Err(ConfigError::Validation(
            "container_elements cannot be empty".to_string(),
        ));
    }

    for element in &config.container_elements {
        validate_element_name(element)?;
    }

    Ok(())
}

/// Validates an HTML tag name used as a container kind
fn validate_element_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "container element '{}' must be a plain tag name",
            name
        )));
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "container element '{}' must start with a letter",
            name
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "at least one output format is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &config.formats {
        let format = OutputFormat::from_name(name).ok_or_else(|| {
            ConfigError::Validation(format!(
                "unknown output format '{}' (expected json, sqlite or csv)",
                name
            ))
        })?;

        if !seen.insert(format) {
            return Err(ConfigError::Validation(format!(
                "output format '{}' listed more than once",
                name
            )));
        }
    }

    Ok(())
}

/// Validates seed URL entries
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    for seed in seeds {
        validate_seed_url(&seed.url)?;
    }
    Ok(())
}

/// Validates a single seed URL: must parse and use http or https
pub(crate) fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    Ok(())
}
