//! Crawl result types
//!
//! These are the values handed from the coordinator to the job runner and the
//! output writers. They serialize to the JSON shape
//! `{ url: { "content": ..., "main_content": ..., "link_no": ... } }`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Extracted text of one page plus its position in the crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub content: String,

    #[serde(rename = "main_content")]
    pub is_main_content: bool,

    /// 0 for the seed page, 1-based discovery position for sub-links
    #[serde(rename = "link_no")]
    pub link_index: usize,
}

impl PageRecord {
    /// Record for the seed page
    pub fn main(content: String) -> Self {
        Self {
            content,
            is_main_content: true,
            link_index: 0,
        }
    }

    /// Record for a discovered sub-link
    pub fn sub_link(content: String, link_index: usize) -> Self {
        Self {
            content,
            is_main_content: false,
            link_index,
        }
    }
}

/// Mapping from URL to extracted page, in the order pages were recorded
///
/// URLs are unique keys. Inserting a URL that is already present leaves the
/// existing record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    entries: Vec<(String, PageRecord)>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the text of a non-recursive crawl as a one-entry result
    ///
    /// The text becomes a full seed record (`main_content: true`, `link_no: 0`)
    /// rather than a bare string, so every artifact has the same shape.
    pub fn single(url: &str, content: String) -> Self {
        let mut result = Self::new();
        result.insert(url.to_string(), PageRecord::main(content));
        result
    }

    /// Adds a record; returns false if the URL was already recorded
    pub fn insert(&mut self, url: String, record: PageRecord) -> bool {
        if self.contains(&url) {
            return false;
        }
        self.entries.push((url, record));
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key == url)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(url, record)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRecord)> {
        self.entries
            .iter()
            .map(|(url, record)| (url.as_str(), record))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(url, _)| url.as_str())
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (url, record) in &self.entries {
            map.serialize_entry(url, record)?;
        }
        map.end()
    }
}

/// Why a URL produced no page
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureCause {
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("page has no extractable text")]
    EmptyContent,

    /// The fetched URL already has a record in this crawl
    #[error("already recorded")]
    AlreadyRecorded,
}

/// A discovered sub-link that did not make it into the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFailure {
    /// The href as written on the seed page
    pub href: String,

    /// The last URL that was attempted (the repaired URL if a retry happened)
    pub url: String,

    pub link_index: usize,

    pub cause: FailureCause,
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.link_index, self.url, self.cause)
    }
}

/// Outcome of a seed crawl that followed sub-links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpageCrawl {
    pub pages: CrawlResult,

    /// Number of candidate links discovered on the seed
    ///
    /// Every candidate ends up either recorded in `pages` or in `failures`.
    pub link_count: usize,

    pub failures: Vec<LinkFailure>,
}

impl SubpageCrawl {
    /// Number of sub-link pages that were recorded
    pub fn recorded_links(&self) -> usize {
        self.pages
            .iter()
            .filter(|(_, record)| !record.is_main_content)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_record() {
        let mut result = CrawlResult::new();
        assert!(result.insert("http://a.com/".to_string(), PageRecord::main("seed".into())));
        assert!(!result.insert(
            "http://a.com/".to_string(),
            PageRecord::sub_link("other".into(), 3)
        ));

        let record = result.get("http://a.com/").unwrap();
        assert!(record.is_main_content);
        assert_eq!(record.link_index, 0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut result = CrawlResult::new();
        result.insert("http://z.com/".to_string(), PageRecord::main("z".into()));
        result.insert("http://a.com/".to_string(), PageRecord::sub_link("a".into(), 1));
        result.insert("http://m.com/".to_string(), PageRecord::sub_link("m".into(), 2));

        let urls: Vec<&str> = result.urls().collect();
        assert_eq!(urls, vec!["http://z.com/", "http://a.com/", "http://m.com/"]);
    }

    #[test]
    fn test_json_shape() {
        let mut result = CrawlResult::single("http://a.com/", "hello".to_string());
        result.insert(
            "http://a.com/b".to_string(),
            PageRecord::sub_link("world".into(), 2),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "http://a.com/": { "content": "hello", "main_content": true, "link_no": 0 },
                "http://a.com/b": { "content": "world", "main_content": false, "link_no": 2 }
            })
        );
    }

    #[test]
    fn test_recorded_links_excludes_seed() {
        let mut pages = CrawlResult::single("http://a.com/", "seed".to_string());
        pages.insert("http://a.com/x".to_string(), PageRecord::sub_link("x".into(), 1));

        let crawl = SubpageCrawl {
            pages,
            link_count: 4,
            failures: vec![],
        };
        assert_eq!(crawl.recorded_links(), 1);
    }

    #[test]
    fn test_failure_cause_display() {
        assert_eq!(FailureCause::HttpStatus(404).to_string(), "HTTP status 404");
        assert_eq!(FailureCause::AlreadyRecorded.to_string(), "already recorded");
    }

    #[test]
    fn test_failure_cause_json() {
        assert_eq!(
            serde_json::to_value(FailureCause::HttpStatus(503)).unwrap(),
            serde_json::json!({ "kind": "http_status", "detail": 503 })
        );
        assert_eq!(
            serde_json::to_value(FailureCause::AlreadyRecorded).unwrap(),
            serde_json::json!({ "kind": "already_recorded" })
        );
    }
}
