//! Main-content extraction from raw HTML.
//!
//! Walks an ordered list of content container selectors and keeps the most
//! specific one holding a substantial amount of text, falling back to
//! paragraph text and finally the whole page body. Extraction never fails:
//! the worst case is an empty body and the `"Untitled"` placeholder title.

use crate::config::ExtractorConfig;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, warn};

/// Title used when the page has neither a `<title>` nor an `<h1>`
pub const UNTITLED: &str = "Untitled";

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref BODY: Selector = Selector::parse("body").unwrap();
}

/// Elements whose text never counts as page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Title and main text of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    /// Whitespace-normalized main text
    pub body_text: String,
}

/// Content extractor holding a compiled selector list
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Vec<(String, Selector)>,
    min_container_chars: usize,
    min_paragraph_chars: usize,
    min_fallback_chars: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl Extractor {
    /// Compile the configured selectors. Unparseable selectors are skipped.
    pub fn new(config: &ExtractorConfig) -> Self {
        let selectors = config
            .selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some((raw.clone(), selector)),
                Err(e) => {
                    warn!(selector = %raw, "skipping invalid content selector: {}", e);
                    None
                }
            })
            .collect();

        Self {
            selectors,
            min_container_chars: config.min_container_chars,
            min_paragraph_chars: config.min_paragraph_chars,
            min_fallback_chars: config.min_fallback_chars,
        }
    }

    /// The selectors in evaluation order
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(|(raw, _)| raw.as_str())
    }

    /// Extract the title and main text from an HTML page
    pub fn extract(&self, html: &str) -> Document {
        let document = Html::parse_document(html);

        let raw_text = match self.best_container(&document) {
            Some(text) => text,
            None => {
                let paragraphs = self.paragraph_text(&document);
                if char_len(&paragraphs) < self.min_fallback_chars {
                    debug!("paragraph fallback too short, using whole body");
                    body_text(&document)
                } else {
                    paragraphs
                }
            }
        };

        Document {
            title: extract_title(&document),
            body_text: normalize_whitespace(&raw_text),
        }
    }

    /// Text of the most specific container with substantial content.
    /// Later selectors must strictly exceed the current best to replace it.
    fn best_container(&self, document: &Html) -> Option<String> {
        let mut best: Option<(&str, String)> = None;
        let mut best_len = 0;

        for (raw, selector) in &self.selectors {
            let text: String = document.select(selector).flat_map(|e| e.text()).collect();
            let text = text.trim();
            let len = char_len(text);

            if len > best_len && len > self.min_container_chars {
                best_len = len;
                best = Some((raw.as_str(), text.to_string()));
            }
        }

        best.map(|(raw, text)| {
            debug!(selector = raw, chars = best_len, "selected content container");
            text
        })
    }

    /// Substantial paragraphs joined with single spaces
    fn paragraph_text(&self, document: &Html) -> String {
        let paragraphs: Vec<String> = document
            .select(&PARAGRAPH)
            .filter_map(|p| {
                let text: String = p.text().collect();
                let text = text.trim();
                (char_len(text) > self.min_paragraph_chars).then(|| text.to_string())
            })
            .collect();

        debug!(count = paragraphs.len(), "no content container, using paragraphs");
        paragraphs.join(" ")
    }
}

/// Extract with the default selector list and thresholds
pub fn extract_content(html: &str) -> Document {
    Extractor::default().extract(html)
}

/// Extract the page title from <title> or <h1>
fn extract_title(document: &Html) -> String {
    [&*TITLE, &*H1]
        .into_iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| element.text().collect::<String>())
        .find(|title| !title.trim().is_empty())
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// All text in <body>, skipping scripts and styles
fn body_text(document: &Html) -> String {
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());
    visible_text(root)
}

fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| NON_CONTENT_ELEMENTS.contains(&e.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect()
}

/// Collapse whitespace runs to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}
