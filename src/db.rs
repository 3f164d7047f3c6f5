//! Database module for storage and search.
//!
//! Uses sled for summary storage and tantivy for the full-text content index.
//! The two stores are opened, written and checked independently: one failing
//! never stops the other from being used.

pub use crate::search::{SearchError, SearchHit, SearchIndex};
pub use crate::storage::{Storage, StorageError, StoredSummary};

use crate::config::StorageConfig;
use crate::summary::SummaryRecord;
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, warn};

/// Result of one operation against one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreOutcome {
    fn from_result<T, E: Display>(store: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self {
                ok: true,
                error: None,
            },
            Err(e) => {
                warn!(store = store, "store operation failed: {}", e);
                Self {
                    ok: false,
                    error: Some(format!("{store}: {e}")),
                }
            }
        }
    }
}

/// Per-store results of a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReport {
    pub summary_store: StoreOutcome,
    pub content_store: StoreOutcome,
}

impl StoreReport {
    pub fn all_ok(&self) -> bool {
        self.summary_store.ok && self.content_store.ok
    }

    pub fn any_ok(&self) -> bool {
        self.summary_store.ok || self.content_store.ok
    }

    /// Error messages from the stores that failed
    pub fn errors(&self) -> Vec<String> {
        [&self.summary_store, &self.content_store]
            .into_iter()
            .filter_map(|o| o.error.clone())
            .collect()
    }
}

/// Store connectivity, as reported by `check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub summary_store: bool,
    pub content_store: bool,
    pub errors: Vec<String>,
}

/// Handles to both stores. Either may have failed to open.
pub struct Persistence {
    summaries: Result<Storage, String>,
    content: Result<SearchIndex, String>,
}

impl Persistence {
    /// Open both stores under the configured data directory
    pub fn open(config: &StorageConfig) -> Self {
        let summaries = Storage::open(config.summaries_path()).map_err(|e| e.to_string());
        let content = SearchIndex::open(config.content_index_path()).map_err(|e| e.to_string());

        if let Err(e) = &summaries {
            warn!("summary store unavailable: {}", e);
        }
        if let Err(e) = &content {
            warn!("content index unavailable: {}", e);
        }
        info!(path = %config.path.display(), "opened persistence");

        Self { summaries, content }
    }

    /// The summary store, if it opened
    pub fn summaries(&self) -> Result<&Storage, String> {
        self.summaries.as_ref().map_err(Clone::clone)
    }

    /// The content index, if it opened
    pub fn content(&self) -> Result<&SearchIndex, String> {
        self.content.as_ref().map_err(Clone::clone)
    }

    /// Write a record to both stores, reporting each separately
    pub fn save(&self, record: &SummaryRecord) -> StoreReport {
        let summary_store = StoreOutcome::from_result(
            "summary store",
            self.summaries()
                .and_then(|s| s.store(record).map_err(|e| e.to_string())),
        );
        let content_store = StoreOutcome::from_result(
            "content index",
            self.content()
                .and_then(|c| c.index_record(record).map_err(|e| e.to_string())),
        );

        info!(
            url = %record.url,
            summary_saved = summary_store.ok,
            content_saved = content_store.ok,
            "saved record"
        );
        StoreReport {
            summary_store,
            content_store,
        }
    }

    /// Remove a URL from both stores
    pub fn delete(&self, url: &str) -> StoreReport {
        StoreReport {
            summary_store: StoreOutcome::from_result(
                "summary store",
                self.summaries()
                    .and_then(|s| s.delete(url).map_err(|e| e.to_string())),
            ),
            content_store: StoreOutcome::from_result(
                "content index",
                self.content()
                    .and_then(|c| c.delete(url).map_err(|e| e.to_string())),
            ),
        }
    }

    /// Probe both stores
    pub fn check(&self) -> HealthReport {
        let mut errors = Vec::new();

        let summary_store = match self
            .summaries()
            .and_then(|s| s.ping().map_err(|e| e.to_string()))
        {
            Ok(()) => true,
            Err(e) => {
                errors.push(format!("summary store: {e}"));
                false
            }
        };

        let content_store = match self
            .content()
            .and_then(|c| c.count().map_err(|e| e.to_string()))
        {
            Ok(_) => true,
            Err(e) => {
                errors.push(format!("content index: {e}"));
                false
            }
        };

        HealthReport {
            summary_store,
            content_store,
            errors,
        }
    }
}
