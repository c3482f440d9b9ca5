//! Crawler coordinator - crawl orchestration logic
//!
//! The coordinator drives fetching and extraction for a seed URL and, when
//! asked to, for every link discovered on the seed page. Everything runs
//! sequentially: one URL is fetched and extracted before the next starts.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::parser::TextExtractor;
use crate::crawler::result::{CrawlResult, FailureCause, LinkFailure, PageRecord, SubpageCrawl};
use crate::url::repair_link;
use crate::ScroopyError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    client: Client,
    extractor: TextExtractor,
    timeout: Duration,
}

/// A sub-link page that was fetched successfully
struct FetchedLink {
    /// The URL that answered (the repaired URL if the retry was needed)
    url: String,
    body: String,
}

impl Coordinator {
    /// Creates a new coordinator from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - HTTP client and extractor are ready
    /// * `Err(ScroopyError)` - The client could not be built or the container
    ///   elements are invalid
    pub fn new(config: &Config) -> Result<Self, ScroopyError> {
        let client = build_http_client(config)?;
        let extractor = TextExtractor::new(config.crawler.container_elements.as_slice())?;

        Ok(Self::with_client(
            client,
            extractor,
            Duration::from_secs(config.crawler.timeout_secs),
        ))
    }

    /// Creates a coordinator from prebuilt parts
    pub fn with_client(client: Client, extractor: TextExtractor, timeout: Duration) -> Self {
        Self {
            client,
            extractor,
            timeout,
        }
    }

    /// Default per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches one page and returns its extracted text
    ///
    /// No links are followed and no retry is made.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The normalized page text (possibly empty)
    /// * `Err(ScroopyError::Crawl)` - The fetch failed; carries the URL and cause
    pub async fn crawl_single(&self, url: &str) -> Result<String, ScroopyError> {
        tracing::info!("Scraping content from {}", url);

        let body = fetch_url(&self.client, url, self.timeout)
            .await
            .into_body(url)?;

        Ok(self.extractor.extract(&body))
    }

    /// Crawls a seed page and every link on it, using the default timeout
    pub async fn crawl_with_subpages(&self, url: &str) -> Result<SubpageCrawl, ScroopyError> {
        self.crawl_with_subpages_timeout(url, self.timeout).await
    }

    /// Crawls a seed page and every link on it
    ///
    /// # Flow
    ///
    /// 1. Fetch the seed; any failure is returned as an error
    /// 2. Record the seed text with link index 0
    /// 3. Discover candidate links on the seed page
    /// 4. Fetch and extract each candidate in discovery order. On a
    ///    transport-level failure retry once with the link resolved against
    ///    the seed's directory. Failures, including pages whose URL is
    ///    already recorded, are collected and never fatal.
    ///
    /// # Returns
    ///
    /// * `Ok(SubpageCrawl)` - Pages, candidate count and per-link failures
    /// * `Err(ScroopyError::Crawl)` - The seed itself could not be fetched
    pub async fn crawl_with_subpages_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<SubpageCrawl, ScroopyError> {
        let body = fetch_url(&self.client, url, timeout)
            .await
            .into_body(url)?;

        let seed = self.extractor.parse_page(&body);
        let mut pages = CrawlResult::new();
        pages.insert(url.to_string(), PageRecord::main(seed.text));
        tracing::info!("0 - Scraped main content from {}", url);

        let link_count = seed.links.len();
        tracing::info!("Found {} links on {}", link_count, url);

        let seed_url = Url::parse(url.trim()).ok();
        let mut failures = Vec::new();

        for (position, href) in seed.links.iter().enumerate() {
            let link_index = position + 1;

            let fetched = match self.fetch_sub_link(seed_url.as_ref(), href, timeout).await {
                Ok(fetched) => fetched,
                Err((attempted, cause)) => {
                    tracing::warn!(
                        "{} - Failed to scrape sub-content from {}: {}",
                        link_index,
                        attempted,
                        cause
                    );
                    failures.push(LinkFailure {
                        href: href.clone(),
                        url: attempted,
                        link_index,
                        cause,
                    });
                    continue;
                }
            };

            let content = self.extractor.extract(&fetched.body);
            if content.is_empty() {
                tracing::debug!("{} - No text on {}", link_index, fetched.url);
                failures.push(LinkFailure {
                    href: href.clone(),
                    url: fetched.url,
                    link_index,
                    cause: FailureCause::EmptyContent,
                });
                continue;
            }

            if pages.insert(fetched.url.clone(), PageRecord::sub_link(content, link_index)) {
                tracing::info!("{} - Scraped sub-content from {}", link_index, fetched.url);
            } else {
                tracing::debug!("{} - {} already recorded", link_index, fetched.url);
                failures.push(LinkFailure {
                    href: href.clone(),
                    url: fetched.url,
                    link_index,
                    cause: FailureCause::AlreadyRecorded,
                });
            }
        }

        Ok(SubpageCrawl {
            pages,
            link_count,
            failures,
        })
    }

    /// Fetches one discovered link, retrying once with a repaired URL
    ///
    /// The retry only happens when the direct attempt got no HTTP response and
    /// the repaired URL differs from the href. On failure returns the last
    /// attempted URL and the cause.
    async fn fetch_sub_link(
        &self,
        seed: Option<&Url>,
        href: &str,
        timeout: Duration,
    ) -> Result<FetchedLink, (String, FailureCause)> {
        let direct = fetch_url(&self.client, href, timeout).await;
        if !direct.is_transport_failure() {
            return into_fetched(href.to_string(), direct);
        }

        // Absolute hrefs repair to themselves
        let Some(repaired) = seed
            .and_then(|seed| repair_link(seed, href))
            .filter(|repaired| Url::parse(href).ok().as_ref() != Some(repaired))
        else {
            return into_fetched(href.to_string(), direct);
        };

        tracing::debug!("Retrying {} as {}", href, repaired);
        let retry = fetch_url(&self.client, repaired.as_str(), timeout).await;
        into_fetched(repaired.to_string(), retry)
    }
}

fn into_fetched(url: String, outcome: FetchOutcome) -> Result<FetchedLink, (String, FailureCause)> {
    match outcome {
        FetchOutcome::Success { final_url, body } => {
            if final_url != url {
                tracing::debug!("{} redirected to {}", url, final_url);
            }
            Ok(FetchedLink { url, body })
        }
        failed => {
            let cause = failed
                .failure_cause()
                .unwrap_or_else(|| FailureCause::Transport("unknown failure".to_string()));
            Err((url, cause))
        }
    }
}
