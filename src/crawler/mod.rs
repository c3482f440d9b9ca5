//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeout and failure classification
//! - HTML text extraction and link discovery
//! - Seed and sub-link crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod result;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, user_agent_string, FetchOutcome};
pub use parser::{
    discover_links, extract_text, normalize_text, ParsedPage, TextExtractor,
    DEFAULT_CONTAINER_ELEMENTS, EXCLUDED_LINK_SUBSTRING,
};
pub use result::{CrawlResult, FailureCause, LinkFailure, PageRecord, SubpageCrawl};
