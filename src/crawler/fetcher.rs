//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests with a per-request timeout
//! - Classifying failures as HTTP-level or transport-level

use crate::config::Config;
use crate::crawler::result::FailureCause;
use crate::ScroopyError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered 200 OK
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// The server answered with any status other than 200
    HttpError { status_code: u16 },

    /// The request did not complete within its timeout
    Timeout,

    /// No response: invalid URL, DNS, connection, TLS or body read failure
    TransportError { error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// True when no HTTP response was obtained at all
    ///
    /// Only these failures qualify a sub-link for the repaired-URL retry.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::TransportError { .. })
    }

    /// The failure cause, or `None` on success
    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(FailureCause::HttpStatus(*status_code)),
            Self::Timeout => Some(FailureCause::Timeout),
            Self::TransportError { error } => Some(FailureCause::Transport(error.clone())),
        }
    }

    /// Converts into the page body, labelling any failure with `url`
    pub fn into_body(self, url: &str) -> Result<String, ScroopyError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            other => Err(ScroopyError::Crawl {
                url: url.to_string(),
                cause: other
                    .failure_cause()
                    .unwrap_or_else(|| FailureCause::Transport("unknown failure".to_string())),
            }),
        }
    }
}

/// Formats the User-Agent header value
///
/// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &Config) -> String {
    let user_agent = &config.user_agent;
    match &user_agent.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            user_agent.crawler_name, user_agent.crawler_version, contact
        ),
        None => format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let crawler = &config.crawler;
    let redirect = if crawler.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(crawler.max_redirects)
    };

    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(crawler.timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a per-request timeout
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 | Success |
/// | Any other status | HttpError (no retry) |
/// | Timeout | Timeout |
/// | Not an absolute http(s) URL | TransportError |
/// | DNS/connection/TLS/body failure | TransportError |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch, exactly as discovered
/// * `timeout` - Timeout for this request only
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> FetchOutcome {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            return FetchOutcome::TransportError {
                error: format!("invalid URL '{}': {}", url, e),
            }
        }
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return FetchOutcome::TransportError {
            error: format!("unsupported scheme '{}'", parsed.scheme()),
        };
    }

    tracing::debug!("GET {} (timeout {:?})", parsed, timeout);

    let response = match client.get(parsed).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!("{} answered {}", url, status);
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchOutcome::Success { final_url, body },
        Err(e) => classify_error(&e),
    }
}

/// Maps a reqwest error onto a transport-level outcome
fn classify_error(e: &reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        FetchOutcome::Timeout
    } else if e.is_connect() {
        FetchOutcome::TransportError {
            error: format!("connection failed: {}", e),
        }
    } else if e.is_redirect() {
        FetchOutcome::TransportError {
            error: format!("redirect error: {}", e),
        }
    } else {
        FetchOutcome::TransportError {
            error: e.to_string(),
        }
    }
}
