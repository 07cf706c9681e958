// Trained toxicity model: TF-IDF vectorizer + one-vs-rest linear classifier.
//
// The model directory holds three JSON artifacts produced by the training
// notebook: the classifier weights, the fitted vectorizer and the label order
// of the classifier rows. All three are read-only here. A label is predicted
// when its decision value w·x + b is positive.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use super::traits::{Category, Method, Predictions, ToxicityClassifier};
use super::vectorizer::{SparseRow, TfIdfVectorizer};

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const LABELS_FILE: &str = "labels.json";

/// Every file that must exist for the model path to be attempted.
pub const ARTIFACT_FILES: [&str; 3] = [CLASSIFIER_FILE, VECTORIZER_FILE, LABELS_FILE];

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("vectorizer has no vocabulary (not fitted)")]
    Unfitted,
    #[error("unknown label in label list: {0}")]
    UnknownLabel(String),
    #[error("incompatible model artifacts: {0}")]
    Incompatible(String),
}

impl ModelError {
    /// True when the model simply isn't installed, as opposed to broken.
    pub fn is_missing(&self) -> bool {
        matches!(self, ModelError::Missing(_))
    }
}

/// Returns the default directory for model artifacts.
/// Uses the platform data directory: ~/.local/share/comment-scanner/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("comment-scanner")
        .join("models")
}

/// Check whether all three model artifacts exist.
pub fn artifacts_present(dir: &Path) -> bool {
    ARTIFACT_FILES.iter().all(|f| dir.join(f).exists())
}

/// One-vs-rest linear classifier: one weight row and intercept per label.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Decision value per label for a sparse feature row.
    fn decision(&self, row: &SparseRow) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                row.iter().map(|&(i, x)| weights[i] * x).sum::<f64>() + intercept
            })
            .collect()
    }
}

/// A loaded, shape-checked model.
#[derive(Debug, Clone)]
pub struct ToxicityModel {
    vectorizer: TfIdfVectorizer,
    classifier: LinearClassifier,
    labels: Vec<Category>,
}

impl ToxicityModel {
    /// Load and validate the three artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let classifier: LinearClassifier = read_artifact(&dir.join(CLASSIFIER_FILE))?;
        let vectorizer: TfIdfVectorizer = read_artifact(&dir.join(VECTORIZER_FILE))?;
        let labels: Vec<String> = read_artifact(&dir.join(LABELS_FILE))?;

        let labels = labels
            .into_iter()
            .map(|l| l.parse::<Category>().map_err(|e| ModelError::UnknownLabel(e.0)))
            .collect::<Result<Vec<_>, _>>()?;

        let model = Self::from_parts(vectorizer, classifier, labels)?;
        debug!(
            features = model.vectorizer.n_features(),
            "Loaded toxicity model from {}",
            dir.display()
        );
        Ok(model)
    }

    /// Assemble a model, checking that the parts fit together.
    pub fn from_parts(
        vectorizer: TfIdfVectorizer,
        classifier: LinearClassifier,
        labels: Vec<Category>,
    ) -> Result<Self, ModelError> {
        vectorizer.validate()?;

        for category in Category::ALL {
            let count = labels.iter().filter(|&&l| l == category).count();
            if count != 1 {
                return Err(ModelError::Incompatible(format!(
                    "label list must name `{category}` exactly once, found {count}"
                )));
            }
        }
        if labels.len() != Category::ALL.len() {
            return Err(ModelError::Incompatible(format!(
                "label list has {} entries, expected {}",
                labels.len(),
                Category::ALL.len()
            )));
        }

        let n_labels = labels.len();
        if classifier.coefficients.len() != n_labels || classifier.intercepts.len() != n_labels {
            return Err(ModelError::Incompatible(format!(
                "classifier has {} weight rows and {} intercepts for {n_labels} labels",
                classifier.coefficients.len(),
                classifier.intercepts.len()
            )));
        }

        let n_features = vectorizer.n_features();
        if let Some(row) = classifier
            .coefficients
            .iter()
            .find(|row| row.len() != n_features)
        {
            return Err(ModelError::Incompatible(format!(
                "classifier row has {} weights but vectorizer produces {n_features} features",
                row.len()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier,
            labels,
        })
    }

    /// Predict flags from already-normalized text.
    pub fn predict_cleaned(&self, cleaned: &str) -> Result<Predictions, ModelError> {
        let row = self.vectorizer.transform(cleaned);
        let decisions = self.classifier.decision(&row);
        if decisions.iter().any(|d| !d.is_finite()) {
            return Err(ModelError::Incompatible(
                "classifier produced a non-finite decision value".into(),
            ));
        }
        Ok(Predictions::from_flags(
            self.labels.iter().copied().zip(decisions.into_iter().map(|d| d > 0.0)),
        ))
    }
}

impl ToxicityClassifier for ToxicityModel {
    fn method(&self) -> Method {
        Method::Model
    }

    fn predict(&self, _text: &str, cleaned: &str) -> Result<Predictions> {
        Ok(self.predict_cleaned(cleaned)?)
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelError::Missing(path.to_path_buf())
        } else {
            ModelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
