//! # Precis
//!
//! Extractive summarisation of web pages.
//!
//! ## Features
//!
//! - **Content Extraction**: picks the main text of a page from an ordered list of container selectors
//! - **Extractive Summaries**: scores sentences on cue words, length and position, keeps source order
//! - **Lookup Translation**: translates summaries with a static word and phrase table
//! - **Dual Storage**: sled for summaries, tantivy for full-text search over page content

pub mod config;
pub mod db;
pub mod extractor;
pub mod pipeline;
pub mod scraper;
pub mod search;
pub mod server;
pub mod storage;
pub mod summarizer;
pub mod summary;
pub mod translator;

pub use config::Config;
pub use db::{Persistence, SearchIndex, Storage};
pub use extractor::{extract_content, Document, Extractor};
pub use pipeline::{PageSummary, Pipeline};
pub use summarizer::{summarize, Summarizer};
pub use summary::SummaryRecord;
