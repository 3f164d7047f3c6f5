//! Fetch, extract, summarise and translate one page.

use crate::config::Config;
use crate::extractor::Extractor;
use crate::scraper::{Fetcher, ScraperError};
use crate::summarizer::Summarizer;
use crate::summary::SummaryRecord;
use crate::translator::{LookupTranslator, Translator};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Everything produced for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    /// Leading part of the extracted text
    pub content: String,
    pub full_text: String,
    pub summary: String,
    pub translated_summary: String,
}

impl PageSummary {
    /// The record handed to persistence
    pub fn to_record(&self) -> SummaryRecord {
        SummaryRecord::new(
            self.title.clone(),
            self.url.clone(),
            self.summary.clone(),
            self.translated_summary.clone(),
            self.full_text.clone(),
        )
    }
}

/// The configured processing chain. Cheap to share between tasks.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Fetcher,
    extractor: Extractor,
    summarizer: Summarizer,
    translator: Arc<dyn Translator>,
    preview_chars: usize,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        Ok(Self {
            fetcher: Fetcher::new(&config.fetch)?,
            extractor: Extractor::new(&config.extractor),
            summarizer: Summarizer::new(config.summarizer.clone()),
            translator: Arc::new(LookupTranslator::new(&config.translator)),
            preview_chars: config.extractor.preview_chars,
        })
    }

    /// Swap in a different translator
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Fetch a page and process it
    pub async fn run(&self, url: &str) -> Result<PageSummary, ScraperError> {
        let html = self.fetcher.fetch(url).await?;
        Ok(self.process_html(url.trim(), &html))
    }

    /// Process already-fetched HTML. Never fails.
    pub fn process_html(&self, url: &str, html: &str) -> PageSummary {
        let document = self.extractor.extract(html);
        let summary = self.summarizer.summarize(&document.body_text);
        let translated_summary = self.translator.translate(&summary);

        info!(
            url = url,
            title = %document.title,
            chars = document.body_text.len(),
            "summarised page"
        );

        PageSummary {
            url: url.to_string(),
            title: document.title,
            content: document.body_text.chars().take(self.preview_chars).collect(),
            full_text: document.body_text,
            summary,
            translated_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::TOO_SHORT;

    struct Shout;

    impl Translator for Shout {
        fn target(&self) -> &str {
            "Shouting"
        }

        fn translate(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    const ARTICLE: &str = r#"<html><head><title>Town diary</title></head><body>
        <nav>Home | About | Contact</nav>
        <article>
          <p>The weather was quite pleasant in the small town today.</p>
          <p>Birds sang loudly every morning near the open window.</p>
          <p>Children walked slowly to school along the river path.</p>
          <p>The baker opened his shop early for the morning crowd.</p>
          <p>However the key result is therefore crucial and essential for everyone.</p>
        </article>
        </body></html>"#;

    #[test]
    fn processes_html_end_to_end() {
        let pipeline = Pipeline::from_config(&Config::default()).unwrap();
        let page = pipeline.process_html("https://town.example/diary", ARTICLE);

        assert_eq!(page.title, "Town diary");
        assert!(page.full_text.starts_with("The weather was quite pleasant"));
        assert!(!page.full_text.contains("About"));
        assert_eq!(
            page.summary,
            "The weather was quite pleasant in the small town today. \
             However the key result is therefore crucial and essential for everyone."
        );
        assert!(page.translated_summary.contains("تاہم"));
        assert_eq!(page.content, page.full_text);

        let record = page.to_record();
        assert_eq!(record.url, "https://town.example/diary");
        assert!(record.missing_fields().is_empty());
    }

    #[test]
    fn preview_is_bounded() {
        let mut config = Config::default();
        config.extractor.preview_chars = 10;
        let pipeline = Pipeline::from_config(&config).unwrap();
        let page = pipeline.process_html("https://town.example/diary", ARTICLE);
        assert_eq!(page.content.chars().count(), 10);
        assert!(page.full_text.len() > 10);
    }

    #[test]
    fn translator_can_be_replaced() {
        let pipeline = Pipeline::from_config(&Config::default())
            .unwrap()
            .with_translator(Arc::new(Shout));
        let page = pipeline.process_html("https://x.example", "<p>hi</p>");
        assert_eq!(page.summary, TOO_SHORT);
        assert_eq!(page.translated_summary, TOO_SHORT.to_uppercase());
        assert_eq!(pipeline.translator().target(), "Shouting");
    }
}
