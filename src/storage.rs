//! Sled-based storage for summaries.
//!
//! Holds the summary side of each record (title, url, summary and its
//! translation). Full page text goes to the content index instead.

use crate::summary::SummaryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A stored summary with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSummary {
    /// The source URL
    pub url: String,
    /// When the summary was created
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub summary: String,
    pub translated_summary: String,
}

impl StoredSummary {
    /// Create a new stored summary from a finished record
    pub fn new(record: &SummaryRecord) -> Self {
        Self {
            url: record.url.clone(),
            created_at: Utc::now(),
            title: record.title.clone(),
            summary: record.summary.clone(),
            translated_summary: record.translated_summary.clone(),
        }
    }

    /// Case-insensitive substring match on title and summary
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.summary.to_lowercase().contains(&query)
    }
}

/// Sled-based storage for webpage summaries.
///
/// Summaries are keyed by the raw URL bytes.
pub struct Storage {
    db: sled::Db,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Store the summary part of a record, replacing any earlier one for the URL
    pub fn store(&self, record: &SummaryRecord) -> Result<StoredSummary, StorageError> {
        let stored = StoredSummary::new(record);
        let value = serde_json::to_vec(&stored)?;
        self.db.insert(record.url.as_bytes(), value)?;
        self.db.flush()?;
        Ok(stored)
    }

    /// Retrieve a summary by URL
    pub fn get(&self, url: &str) -> Result<Option<StoredSummary>, StorageError> {
        match self.db.get(url.as_bytes())? {
            Some(data) => {
                let stored: StoredSummary = serde_json::from_slice(&data)?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// List all stored summaries
    pub fn list_all(&self) -> Result<Vec<StoredSummary>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            let stored: StoredSummary = serde_json::from_slice(&value)?;
            results.push(stored);
        }
        // Sort by created_at descending (newest first)
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    /// Summaries whose title or text contains the query
    pub fn find(&self, query: &str) -> Result<Vec<StoredSummary>, StorageError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|stored| stored.matches(query))
            .collect())
    }

    /// Delete a summary by URL
    pub fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let existed = self.db.remove(url.as_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    /// Get the number of stored summaries
    pub fn count(&self) -> usize {
        self.db.len()
    }

    /// Confirm the tree can be read
    pub fn ping(&self) -> Result<(), StorageError> {
        self.db.first()?;
        Ok(())
    }
}
