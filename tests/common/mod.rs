// Shared fixtures for integration tests.

use std::path::Path;

use comment_scanner::toxicity::cache::{CachePolicy, ModelHandle};
use comment_scanner::toxicity::keywords::KeywordTable;
use comment_scanner::toxicity::model::{CLASSIFIER_FILE, LABELS_FILE, VECTORIZER_FILE};
use comment_scanner::toxicity::Dispatcher;

/// Write a tiny model: "moron" flags toxic + insult, "lovely" flags threat.
/// The keyword table would never flag "lovely", which tells the paths apart.
pub fn write_model(dir: &Path) {
    std::fs::write(
        dir.join(CLASSIFIER_FILE),
        r#"{
            "coefficients": [[1.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            "intercepts": [-0.1, -0.1, -0.1, -0.1, -0.1, -0.1]
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.join(VECTORIZER_FILE),
        r#"{"vocabulary": {"moron": 0, "lovely": 1}, "idf": [1.0, 1.0]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join(LABELS_FILE),
        r#"["toxic", "severe_toxic", "obscene", "threat", "insult", "identity_hate"]"#,
    )
    .unwrap();
}

/// Dispatcher over `dir` with the embedded keyword table.
pub fn dispatcher(dir: &Path) -> Dispatcher {
    Dispatcher::new(
        ModelHandle::new(dir, CachePolicy::ReloadOnChange),
        KeywordTable::embedded().unwrap(),
    )
}
