use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::toxicity::cache::CachePolicy;
use crate::toxicity::keywords::KeywordTable;
use crate::toxicity::model::default_model_dir;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Nothing is
/// required: every setting has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding classifier.json, vectorizer.json and labels.json
    /// (SCANNER_MODEL_DIR, defaults to the platform data directory)
    pub model_dir: PathBuf,
    /// Whether the loaded model is reused between requests (SCANNER_MODEL_CACHE)
    pub model_cache: CachePolicy,
    /// Keyword table replacing the embedded one (SCANNER_KEYWORDS_PATH)
    pub keywords_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model_dir = lookup("SCANNER_MODEL_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_model_dir);

        let model_cache = match lookup("SCANNER_MODEL_CACHE") {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse::<CachePolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid SCANNER_MODEL_CACHE")?,
            // "reload-on-change" or unset
            _ => CachePolicy::default(),
        };

        let keywords_path = lookup("SCANNER_KEYWORDS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            model_dir,
            model_cache,
            keywords_path,
        })
    }

    /// Load the configured keyword table (embedded unless overridden).
    pub fn keyword_table(&self) -> Result<KeywordTable> {
        KeywordTable::load(self.keywords_path.as_deref()).with_context(|| {
            match &self.keywords_path {
                Some(path) => format!("Failed to load keyword table from {}", path.display()),
                None => "Failed to load embedded keyword table".to_string(),
            }
        })
    }
}
