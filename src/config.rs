//! Configuration loading and management for precis.
//!
//! Loads settings from `precis.toml` with environment variable overrides for
//! paths and addresses. Every section has defaults, so a missing file is fine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Content container selectors, most specific first.
pub const DEFAULT_SELECTORS: &[&str] = &[
    "article",
    ".post-content",
    ".entry-content",
    ".content",
    "main",
    ".blog-post",
    ".article-content",
    ".story-content",
    ".post-body",
];

/// Cue words that mark a sentence as worth keeping.
pub const DEFAULT_IMPORTANCE_WORDS: &[&str] = &[
    "important",
    "key",
    "main",
    "primary",
    "significant",
    "crucial",
    "essential",
    "major",
    "fundamental",
    "critical",
    "vital",
    "necessary",
    "first",
    "second",
    "third",
    "finally",
    "conclusion",
    "result",
    "therefore",
    "because",
    "however",
    "although",
    "despite",
    "furthermore",
    "moreover",
];

/// Content extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// CSS selectors for likely content containers. Order matters.
    pub selectors: Vec<String>,
    /// A container must hold more than this many characters to be used
    pub min_container_chars: usize,
    /// Paragraphs at or below this length are ignored by the fallback
    pub min_paragraph_chars: usize,
    /// Below this the paragraph fallback gives way to the whole body
    pub min_fallback_chars: usize,
    /// Length of the `content` preview returned over HTTP
    pub preview_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            selectors: DEFAULT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            min_container_chars: 100,
            min_paragraph_chars: 20,
            min_fallback_chars: 50,
            preview_chars: 5000,
        }
    }
}

/// How selected sentences are put back into document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReorderStrategy {
    /// Sort by the candidate index recorded during scoring
    #[default]
    Index,
    /// Re-match candidates against selected text by substring containment
    Containment,
}

/// Extractive summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub importance_words: Vec<String>,
    /// Texts shorter than this are not summarized at all
    pub min_text_chars: usize,
    /// Sentences at or below this length are not candidates
    pub min_sentence_chars: usize,
    /// Fewer candidates than this falls back to a plain prefix
    pub min_candidates: usize,
    pub max_sentences: usize,
    /// Fraction of candidates to select before the `max_sentences` cap
    pub selection_ratio: f64,
    pub max_chars: usize,
    pub reorder: ReorderStrategy,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            importance_words: DEFAULT_IMPORTANCE_WORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_text_chars: 100,
            min_sentence_chars: 20,
            min_candidates: 3,
            max_sentences: 3,
            selection_ratio: 0.3,
            max_chars: 500,
            reorder: ReorderStrategy::Index,
        }
    }
}

/// Lookup translator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Label for the target language, shown in output
    pub target: String,
    /// Extra entries merged over the built-in table (lowercase source -> target)
    pub entries: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target: "Urdu".to_string(),
            entries: BTreeMap::new(),
        }
    }
}

/// HTTP fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!(
                "precis/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/cladam/precis)"
            )
            .to_string(),
        }
    }
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base path for data storage
    pub path: PathBuf,
}

impl StorageConfig {
    /// Directory of the sled summary store
    pub fn summaries_path(&self) -> PathBuf {
        self.path.join("summaries")
    }

    /// Directory of the tantivy content index
    pub fn content_index_path(&self) -> PathBuf {
        self.path.join("content_index")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data"),
        }
    }
}

/// HTTP adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub summarizer: SummarizerConfig,
    pub translator: TranslatorConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default location (precis.toml in cwd or home).
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::parse_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("PRECIS_DATA_DIR") {
            self.storage.path = PathBuf::from(dir);
        }
        if let Ok(bind) = std::env::var("PRECIS_BIND") {
            self.server.bind = bind;
        }
        if let Ok(target) = std::env::var("PRECIS_TRANSLATOR_TARGET") {
            self.translator.target = target;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("precis.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("precis").join("precis.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }
}
