// TF-IDF feature extraction for the trained model.
//
// Mirrors the usual word-level TF-IDF vectorizer: tokens are runs of two or
// more word characters, n-grams are joined with a single space, raw counts
// are optionally damped to 1 + ln(tf), multiplied by the stored idf and the
// row is normalized. Out-of-vocabulary terms are ignored.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::model::ModelError;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// A fitted TF-IDF vectorizer, deserialized from `vectorizer.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

/// Sparse feature row: (feature index, weight), sorted by index.
pub type SparseRow = Vec<(usize, f64)>;

impl TfIdfVectorizer {
    /// Number of features (columns) this vectorizer produces.
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Check the fitted state is usable.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.vocabulary.is_empty() {
            return Err(ModelError::Unfitted);
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Incompatible(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        if let Some((term, &index)) = self.vocabulary.iter().find(|&(_, &i)| i >= self.idf.len()) {
            return Err(ModelError::Incompatible(format!(
                "vocabulary term {term:?} has index {index} but idf has {} entries",
                self.idf.len()
            )));
        }
        if self.idf.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Incompatible("idf contains non-finite values".into()));
        }
        Ok(())
    }

    /// Turn normalized text into a TF-IDF row.
    pub fn transform(&self, text: &str) -> SparseRow {
        let tokens: Vec<&str> = TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in &mut row {
                *v /= norm;
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(json: &str) -> TfIdfVectorizer {
        let v: TfIdfVectorizer = serde_json::from_str(json).unwrap();
        v.validate().unwrap();
        v
    }

    #[test]
    fn test_defaults() {
        let v = vectorizer(r#"{"vocabulary": {"hello": 0}, "idf": [1.0]}"#);
        assert_eq!(v.ngram_range, (1, 1));
        assert!(!v.sublinear_tf);
        assert_eq!(v.norm, Some(Norm::L2));
        assert_eq!(v.n_features(), 1);
    }

    #[test]
    fn test_l2_normalized_row() {
        let v = vectorizer(r#"{"vocabulary": {"good": 0, "day": 1}, "idf": [1.0, 1.0]}"#);
        let row = v.transform("good good day");
        assert_eq!(row.len(), 2);
        let len: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((len - 1.0).abs() < 1e-12);
        assert!(row[0].1 > row[1].1);
    }

    #[test]
    fn test_single_char_tokens_and_unknown_terms_ignored() {
        let v = vectorizer(r#"{"vocabulary": {"ok": 0}, "idf": [2.0], "norm": null}"#);
        assert_eq!(v.transform("a b ok zzz ok"), vec![(0, 4.0)]);
        assert!(v.transform("a b c").is_empty());
    }

    #[test]
    fn test_bigrams() {
        let v = vectorizer(
            r#"{"vocabulary": {"kill": 0, "kill you": 1}, "idf": [1.0, 1.0],
                "ngram_range": [1, 2], "norm": null}"#,
        );
        assert_eq!(v.transform("i will kill you"), vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn test_sublinear_tf() {
        let v = vectorizer(
            r#"{"vocabulary": {"bad": 0}, "idf": [1.0], "sublinear_tf": true, "norm": null}"#,
        );
        let row = v.transform("bad bad bad");
        assert!((row[0].1 - (1.0 + 3f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_l1_norm() {
        let v = vectorizer(
            r#"{"vocabulary": {"aa": 0, "bb": 1}, "idf": [1.0, 3.0], "norm": "l1"}"#,
        );
        assert_eq!(v.transform("aa bb"), vec![(0, 0.25), (1, 0.75)]);
    }

    #[test]
    fn test_unfitted_is_rejected() {
        let v: TfIdfVectorizer = serde_json::from_str(r#"{"vocabulary": {}, "idf": []}"#).unwrap();
        assert!(matches!(v.validate(), Err(ModelError::Unfitted)));
    }

    #[test]
    fn test_index_out_of_range_is_rejected() {
        let v: TfIdfVectorizer =
            serde_json::from_str(r#"{"vocabulary": {"x": 3}, "idf": [1.0]}"#).unwrap();
        assert!(matches!(v.validate(), Err(ModelError::Incompatible(_))));
    }
}
