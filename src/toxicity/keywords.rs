// Keyword fallback classifier.
//
// Each category has a list of trigger keywords; a category is flagged when
// any of its keywords occurs as a case-insensitive substring of the raw
// input. The lists are data, not code: the default table is embedded from
// data/keywords.json and can be replaced with SCANNER_KEYWORDS_PATH.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, warn};

use super::traits::{Category, Method, Predictions, ToxicityClassifier};

/// Default keyword table compiled into the binary.
const DEFAULT_KEYWORDS: &str = include_str!("../../data/keywords.json");

#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    #[error("failed to read keyword file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid keyword table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("keyword table has no entry for category `{0}`")]
    MissingCategory(Category),
    #[error("keyword table has an empty keyword under `{0}`")]
    EmptyKeyword(Category),
}

/// Content-review status attached to a keyword table.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewNote {
    pub status: String,
    #[serde(default)]
    pub note: String,
}

/// Where a keyword table was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordSource {
    Embedded,
    File(PathBuf),
}

#[derive(Deserialize)]
struct KeywordFile {
    #[serde(default)]
    review: Option<ReviewNote>,
    categories: BTreeMap<Category, Vec<String>>,
}

/// Static keyword lists for the six categories.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    lists: BTreeMap<Category, Vec<String>>,
    review: Option<ReviewNote>,
    source: KeywordSource,
}

impl KeywordTable {
    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, KeywordError> {
        Self::from_json(DEFAULT_KEYWORDS, KeywordSource::Embedded)
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, KeywordError> {
        let json = std::fs::read_to_string(path).map_err(|source| KeywordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, KeywordSource::File(path.to_path_buf()))
    }

    /// Load from `path` if given, otherwise use the embedded table.
    /// Logs a warning when the table is still awaiting content review.
    pub fn load(path: Option<&Path>) -> Result<Self, KeywordError> {
        let table = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };
        if table.needs_review() {
            warn!(
                source = ?table.source,
                "Keyword table has not passed content-policy review"
            );
        }
        Ok(table)
    }

    /// Parse a table. Every category must be present and no keyword may be
    /// blank; keywords are trimmed and lowercased.
    pub fn from_json(json: &str, source: KeywordSource) -> Result<Self, KeywordError> {
        let file: KeywordFile = serde_json::from_str(json)?;

        let mut lists = BTreeMap::new();
        for category in Category::ALL {
            let raw = file
                .categories
                .get(&category)
                .ok_or(KeywordError::MissingCategory(category))?;
            let mut keywords = Vec::with_capacity(raw.len());
            for keyword in raw {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(KeywordError::EmptyKeyword(category));
                }
                keywords.push(keyword);
            }
            lists.insert(category, keywords);
        }

        debug!(source = ?source, "Loaded keyword table");

        Ok(Self {
            lists,
            review: file.review,
            source,
        })
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn source(&self) -> &KeywordSource {
        &self.source
    }

    pub fn review(&self) -> Option<&ReviewNote> {
        self.review.as_ref()
    }

    /// True unless the table carries a review note with status "approved".
    pub fn needs_review(&self) -> bool {
        self.review
            .as_ref()
            .map_or(true, |r| !r.status.eq_ignore_ascii_case("approved"))
    }

    /// Flag each category whose keywords occur in `text`, ignoring case.
    pub fn matches(&self, text: &str) -> Predictions {
        let lowered = text.to_lowercase();
        Predictions::from_flags(self.lists.iter().map(|(&category, keywords)| {
            (
                category,
                keywords.iter().any(|k| lowered.contains(k.as_str())),
            )
        }))
    }
}

impl ToxicityClassifier for KeywordTable {
    fn method(&self) -> Method {
        Method::Keywords
    }

    fn predict(&self, text: &str, _cleaned: &str) -> Result<Predictions> {
        Ok(self.matches(text))
    }
}
