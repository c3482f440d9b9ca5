//! HTML parser for extracting page text and links
//!
//! Text extraction reads the text of every configured container element
//! (`div` by default), removes repeated lines and normalizes whitespace.
//! Link discovery collects the `href` of every anchor on the page.

use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Container element kinds used when none are configured
pub const DEFAULT_CONTAINER_ELEMENTS: &[&str] = &["div"];

/// Hrefs containing this substring are never followed
pub const EXCLUDED_LINK_SUBSTRING: &str = "facebook";

/// Elements whose text is never page text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex is valid"));

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("static regex is valid"));

/// Text and links read from one HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Normalized page text
    pub text: String,

    /// Candidate hrefs, deduplicated, in first-seen order
    pub links: Vec<String>,
}

/// Extracts normalized text from the configured container elements
#[derive(Debug, Clone)]
pub struct TextExtractor {
    selector: Selector,
}

impl TextExtractor {
    /// Creates an extractor for the given container element kinds
    ///
    /// # Returns
    ///
    /// * `Ok(TextExtractor)` - The element names form a valid selector
    /// * `Err(ConfigError)` - No element names, or a name is not a plain tag name
    pub fn new<S: AsRef<str>>(elements: &[S]) -> Result<Self, ConfigError> {
        let elements: Vec<String> = elements
            .iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .collect();

        if elements.is_empty() || elements.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Validation(
                "container elements must be non-empty tag names".to_string(),
            ));
        }

        let selector = Selector::parse(&elements.join(", ")).map_err(|e| {
            ConfigError::Validation(format!(
                "invalid container elements {:?}: {:?}",
                elements, e
            ))
        })?;

        Ok(Self { selector })
    }

    /// Parses `html` and returns its normalized text
    pub fn extract(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        self.extract_from(&document)
    }

    /// Returns the normalized text of an already-parsed document
    pub fn extract_from(&self, document: &Html) -> String {
        let raw = document
            .select(&self.selector)
            .map(element_text)
            .collect::<Vec<_>>()
            .join("\n");

        normalize_text(&raw)
    }

    /// Parses `html` once and returns both its text and its links
    pub fn parse_page(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        ParsedPage {
            text: self.extract_from(&document),
            links: discover_links_in(&document),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        let selector = Selector::parse(&DEFAULT_CONTAINER_ELEMENTS.join(", "))
            .expect("default container selector is valid");

        Self { selector }
    }
}

/// Extracts normalized text from every `div` of an HTML document
///
/// # Example
///
/// ```
/// use scroopy::crawler::extract_text;
///
/// let html = "<div>Hello   world</div><div>Hello   world</div><div>Bye</div>";
/// assert_eq!(extract_text(html), "Hello world\nBye");
/// ```
pub fn extract_text(html: &str) -> String {
    TextExtractor::default().extract(html)
}

/// Collects the href of every anchor, minus excluded ones, without duplicates
///
/// Order is the order in which each href first appears in the document.
///
/// # Example
///
/// ```
/// use scroopy::crawler::discover_links;
///
/// let html = r#"<a href="/a">A</a><a href="/a">A again</a><a href="https://facebook.com/x">FB</a>"#;
/// assert_eq!(discover_links(html), vec!["/a".to_string()]);
/// ```
pub fn discover_links(html: &str) -> Vec<String> {
    discover_links_in(&Html::parse_document(html))
}

fn discover_links_in(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if href.contains(EXCLUDED_LINK_SUBSTRING) {
                continue;
            }

            if seen.insert(href) {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Concatenated text nodes below `element`, skipping script-like content
fn element_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|e| NON_TEXT_ELEMENTS.contains(&e.name()));
            (!hidden).then_some(&**text)
        })
        .collect()
}

/// Normalizes joined container text
///
/// Steps, in order:
/// 1. Drop repeated lines (first occurrence wins) and whitespace-only lines
/// 2. Collapse runs of spaces/tabs to one space
/// 3. Collapse runs of newlines to one newline
/// 4. Trim the whole buffer
/// 5. Remove a single space following a newline
/// 6. Collapse newline runs again
pub fn normalize_text(raw: &str) -> String {
    let deduped = dedup_lines(raw);
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(&deduped, " ");
    let collapsed = NEWLINE_RUNS.replace_all(&collapsed, "\n");
    let unindented = collapsed.trim().replace("\n ", "\n");
    NEWLINE_RUNS.replace_all(&unindented, "\n").into_owned()
}

/// Removes lines that repeat an earlier line across the whole buffer
///
/// Lines are compared by their whitespace-normalized form, so two lines that
/// only differ in spacing count as the same line.
fn dedup_lines(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for line in text.split('\n') {
        let key = HORIZONTAL_WHITESPACE
            .replace_all(line, " ")
            .trim()
            .to_string();

        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}
