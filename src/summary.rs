//! SummaryRecord struct - the finished output of one pipeline run.

use serde::{Deserialize, Serialize};

/// Everything persisted for a summarised page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Page title
    pub title: String,
    /// The source URL
    pub url: String,
    /// Extractive summary of the page
    pub summary: String,
    /// Summary after translation
    #[serde(default)]
    pub translated_summary: String,
    /// Full extracted page text
    pub full_text: String,
}

impl SummaryRecord {
    /// Create a new record
    pub fn new(
        title: String,
        url: String,
        summary: String,
        translated_summary: String,
        full_text: String,
    ) -> Self {
        Self {
            title,
            url,
            summary,
            translated_summary,
            full_text,
        }
    }

    /// Names of required fields that are blank. The translation is optional.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("url", &self.url),
            ("summary", &self.summary),
            ("full_text", &self.full_text),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
