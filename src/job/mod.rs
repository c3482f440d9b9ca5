//! Batch job runner
//!
//! A job crawls a list of seed URLs one after another and writes every
//! configured artifact format for each of them. A failing seed never stops
//! the job; its error is recorded on the report and the next seed starts.

use crate::config::Config;
use crate::crawler::{Coordinator, CrawlResult, LinkFailure};
use crate::output::{writer_for, OutputFormat, SeedOutput};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One seed URL to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    pub url: String,

    /// Follow the links on this page one level deep
    pub sub_links: bool,
}

impl SeedRequest {
    pub fn new(url: impl Into<String>, sub_links: bool) -> Self {
        Self {
            url: url.into(),
            sub_links,
        }
    }
}

/// Everything a job needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub seeds: Vec<SeedRequest>,
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,

    /// Hash of the configuration file, if one was used
    pub config_hash: Option<String>,
}

impl JobRequest {
    /// Builds a request from the configuration's seeds, output directory and formats
    pub fn from_config(config: &Config, config_hash: Option<String>) -> Self {
        Self {
            seeds: config
                .seeds
                .iter()
                .map(|seed| SeedRequest::new(seed.url.clone(), seed.sub_links))
                .collect(),
            output_dir: PathBuf::from(&config.output.directory),
            formats: config
                .output
                .formats
                .iter()
                .filter_map(|name| OutputFormat::from_name(name))
                .collect(),
            config_hash,
        }
    }
}

/// A per-seed failure (crawl or artifact writing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedError {
    pub url: String,
    pub message: String,
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What happened to one seed
#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub url: String,
    pub sub_links: bool,

    /// Pages recorded, seed included
    pub pages: usize,

    /// Candidate links found on the seed
    pub link_count: usize,

    pub link_failures: Vec<LinkFailure>,
}

/// Outcome of a job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub seeds: Vec<SeedSummary>,
    pub artifacts: Vec<PathBuf>,
    pub errors: Vec<SeedError>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line outcome for display
    pub fn status_message(&self) -> String {
        if self.is_success() {
            "All Completed Successfully!".to_string()
        } else {
            format!("Completed with {} errors", self.errors.len())
        }
    }
}

/// Runs a batch of seeds through the coordinator and writes their artifacts
///
/// Seeds are processed sequentially in request order. Blank seed URLs are
/// skipped.
pub async fn run_job(coordinator: &Coordinator, request: &JobRequest) -> JobReport {
    let started_at = Utc::now();
    let mut seeds = Vec::new();
    let mut artifacts = Vec::new();
    let mut errors = Vec::new();

    tracing::info!("Starting scraping job ({} seeds)", request.seeds.len());

    for seed in &request.seeds {
        let url = seed.url.trim();
        if url.is_empty() {
            tracing::warn!("Skipping empty seed URL");
            continue;
        }

        tracing::info!("Starting to process: {}", url);

        let (pages, link_count, link_failures) = if seed.sub_links {
            match coordinator.crawl_with_subpages(url).await {
                Ok(crawl) => {
                    tracing::info!("Processed {} links from {}", crawl.link_count, url);
                    (crawl.pages, crawl.link_count, crawl.failures)
                }
                Err(e) => {
                    record_error(
                        &mut errors,
                        url,
                        format!("Error getting page content/s from {}: {}", url, e),
                    );
                    continue;
                }
            }
        } else {
            match coordinator.crawl_single(url).await {
                Ok(text) if text.is_empty() => {
                    record_error(
                        &mut errors,
                        url,
                        format!("No text extracted from {}", url),
                    );
                    continue;
                }
                Ok(text) => {
                    tracing::info!("Processed {}", url);
                    (CrawlResult::single(url, text), 0, Vec::new())
                }
                Err(e) => {
                    record_error(
                        &mut errors,
                        url,
                        format!("Error getting page content/s from {}: {}", url, e),
                    );
                    continue;
                }
            }
        };

        let output = SeedOutput {
            seed_url: url,
            pages: &pages,
            link_count,
        };

        for format in &request.formats {
            match writer_for(*format).write(&output, &request.output_dir) {
                Ok(path) => artifacts.push(path),
                Err(e) => record_error(
                    &mut errors,
                    url,
                    format!("Error converting formats for {} ({}): {}", url, format, e),
                ),
            }
        }
        tracing::info!("Saved content in multiple formats for: {}", url);

        seeds.push(SeedSummary {
            url: url.to_string(),
            sub_links: seed.sub_links,
            pages: pages.len(),
            link_count,
            link_failures,
        });
    }

    tracing::info!("Scraping job completed!");

    JobReport {
        started_at,
        finished_at: Utc::now(),
        config_hash: request.config_hash.clone(),
        seeds,
        artifacts,
        errors,
    }
}

fn record_error(errors: &mut Vec<SeedError>, url: &str, message: String) {
    tracing::error!("{}", message);
    errors.push(SeedError {
        url: url.to_string(),
        message,
    });
}
