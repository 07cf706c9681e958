// Toxicity classifier trait and the result types every classifier produces.
//
// Two implementations exist: the learned TF-IDF model and the keyword table.
// Both fill the same `Predictions` shape over the six fixed categories, so
// the dispatcher can swap one for the other without the caller noticing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// One of the six fixed toxicity labels. `Ord` follows declaration order,
/// which is also the order categories appear in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxic,
    SevereToxic,
    Obscene,
    Threat,
    Insult,
    IdentityHate,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Toxic,
        Category::SevereToxic,
        Category::Obscene,
        Category::Threat,
        Category::Insult,
        Category::IdentityHate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Toxic => "toxic",
            Category::SevereToxic => "severe_toxic",
            Category::Obscene => "obscene",
            Category::Threat => "threat",
            Category::Insult => "insult",
            Category::IdentityHate => "identity_hate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown toxicity category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Per-category verdicts plus the derived `is_toxic` flag.
///
/// Every category is always present. `is_toxic` is computed on construction
/// and is the OR of the category flags; the fields are private so it can't
/// drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predictions {
    #[serde(flatten)]
    categories: BTreeMap<Category, bool>,
    is_toxic: bool,
}

impl Predictions {
    /// Build predictions from (category, flag) pairs. Categories not listed
    /// are false; a category listed twice is flagged if either entry is.
    pub fn from_flags(flags: impl IntoIterator<Item = (Category, bool)>) -> Self {
        let mut categories: BTreeMap<Category, bool> =
            Category::ALL.iter().map(|&c| (c, false)).collect();
        for (category, flagged) in flags {
            *categories.entry(category).or_insert(false) |= flagged;
        }
        let is_toxic = categories.values().any(|&flagged| flagged);
        Self {
            categories,
            is_toxic,
        }
    }

    pub fn get(&self, category: Category) -> bool {
        self.categories.get(&category).copied().unwrap_or(false)
    }

    pub fn is_toxic(&self) -> bool {
        self.is_toxic
    }

    /// Categories flagged true, in canonical order.
    pub fn flagged(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories
            .iter()
            .filter(|&(_, &flagged)| flagged)
            .map(|(&category, _)| category)
    }
}

impl Default for Predictions {
    fn default() -> Self {
        Self::from_flags(Category::ALL.map(|c| (c, false)))
    }
}

/// Which classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// The trained TF-IDF model loaded from the model directory
    Model,
    /// The static keyword table
    Keywords,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Model => "model",
            Method::Keywords => "keywords",
        }
    }
}

/// The response body of a classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub original_text: String,
    pub cleaned_text: String,
    pub predictions: Predictions,
    /// Per-word scoring is not computed; always empty.
    pub word_scores: BTreeMap<String, f64>,
    #[serde(skip)]
    pub method: Method,
}

/// Trait for classifying text into the six toxicity categories.
pub trait ToxicityClassifier: Send + Sync {
    fn method(&self) -> Method;

    /// Predict category flags. `text` is the raw input, `cleaned` its
    /// normalized form; each implementation picks the one it works on.
    fn predict(&self, text: &str, cleaned: &str) -> Result<Predictions>;

    /// Normalize and classify `text`.
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        self.classify_normalized(text, normalize(text))
    }

    /// Classify `text` whose normalized form the caller already computed.
    fn classify_normalized(&self, text: &str, cleaned: String) -> Result<ClassificationResult> {
        let predictions = self.predict(text, &cleaned)?;
        Ok(ClassificationResult {
            original_text: text.to_string(),
            cleaned_text: cleaned,
            predictions,
            word_scores: BTreeMap::new(),
            method: self.method(),
        })
    }
}
