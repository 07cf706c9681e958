// Classification tests: the dispatcher end to end, without the HTTP layer.
//
// Covers the documented example comments, the keyword-path contract
// (case-insensitive substring membership) and the is_toxic invariant for
// both the model and the keyword path.

mod common;

use comment_scanner::text::normalize;
use comment_scanner::toxicity::keywords::KeywordTable;
use comment_scanner::toxicity::traits::{Category, Method, Predictions};

const SAMPLES: [&str; 10] = [
    "This is a normal comment about the weather.",
    "You're such a moron, only an idiot would think that.",
    "Go kill yourself, nobody likes you anyway.",
    "What a LOVELY day at the beach",
    "I will FIND YOU",
    "<p>Visit https://example.com for 100% FREE stuff!!!</p>",
    "",
    "   ",
    "Ugly shirt, but a nice hat.",
    "Die Hard is a Christmas movie",
];

fn assert_is_toxic_is_or(p: &Predictions) {
    let any = Category::ALL.iter().any(|&c| p.get(c));
    assert_eq!(p.is_toxic(), any);
}

// ============================================================
// Documented examples (no model installed)
// ============================================================

#[test]
fn weather_comment_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let result = common::dispatcher(dir.path())
        .classify("This is a normal comment about the weather.")
        .unwrap();

    assert_eq!(result.method, Method::Keywords);
    for category in Category::ALL {
        assert!(!result.predictions.get(category), "{category} flagged");
    }
    assert!(!result.predictions.is_toxic());
}

#[test]
fn insult_comment_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let result = common::dispatcher(dir.path())
        .classify("You're such a moron, only an idiot would think that.")
        .unwrap();

    assert!(result.predictions.get(Category::Insult));
    assert!(result.predictions.is_toxic());
    assert_eq!(
        result.cleaned_text,
        "youre such a moron only an idiot would think that"
    );
}

#[test]
fn threat_comment_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let result = common::dispatcher(dir.path())
        .classify("Go kill yourself, nobody likes you anyway.")
        .unwrap();

    assert!(result.predictions.get(Category::Threat));
    assert!(result.predictions.get(Category::Toxic));
    assert!(result.predictions.is_toxic());
}

#[test]
fn missing_model_never_errors() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = common::dispatcher(&dir.path().join("does-not-exist"));
    for sample in SAMPLES {
        let result = dispatcher.classify(sample).unwrap();
        assert_eq!(result.method, Method::Keywords);
        assert!(result.word_scores.is_empty());
    }
}

// ============================================================
// Keyword path contract
// ============================================================

#[test]
fn keyword_flags_equal_substring_membership() {
    let table = KeywordTable::embedded().unwrap();
    for sample in SAMPLES {
        let p = table.matches(sample);
        let lowered = sample.to_lowercase();
        for category in Category::ALL {
            let expected = table
                .keywords(category)
                .iter()
                .any(|k| lowered.contains(k.as_str()));
            assert_eq!(p.get(category), expected, "{category} for {sample:?}");
        }
        assert_is_toxic_is_or(&p);
    }
}

#[test]
fn keyword_path_is_deterministic() {
    let table = KeywordTable::embedded().unwrap();
    for sample in SAMPLES {
        assert_eq!(table.matches(sample), table.matches(sample));
    }
}

#[test]
fn keyword_path_matches_raw_text_not_cleaned() {
    // Normalization drops URLs, but keyword search runs on the raw input.
    let table = KeywordTable::embedded().unwrap();
    let text = "see http://idiot.example";
    assert!(!normalize(text).contains("idiot"));
    assert!(table.matches(text).get(Category::Insult));
}

// ============================================================
// Model path
// ============================================================

#[test]
fn model_path_used_when_installed() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    let dispatcher = common::dispatcher(dir.path());

    let result = dispatcher.classify("What a LOVELY day at the beach").unwrap();
    assert_eq!(result.method, Method::Model);
    assert!(result.predictions.get(Category::Threat));
    assert!(result.predictions.is_toxic());

    for sample in SAMPLES {
        let result = dispatcher.classify(sample).unwrap();
        assert_eq!(result.method, Method::Model);
        assert_is_toxic_is_or(&result.predictions);
        assert_eq!(result.cleaned_text, normalize(sample));
    }
}

#[test]
fn model_removed_at_runtime_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    let dispatcher = common::dispatcher(dir.path());
    assert_eq!(dispatcher.classify("lovely").unwrap().method, Method::Model);

    std::fs::remove_file(dir.path().join("vectorizer.json")).unwrap();
    let result = dispatcher.classify("lovely").unwrap();
    assert_eq!(result.method, Method::Keywords);
    assert!(!result.predictions.is_toxic());
}

#[test]
fn incompatible_model_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    common::write_model(dir.path());
    // Five labels for six classifier rows.
    std::fs::write(
        dir.path().join("labels.json"),
        r#"["toxic", "severe_toxic", "obscene", "threat", "insult"]"#,
    )
    .unwrap();

    let result = common::dispatcher(dir.path()).classify("moron").unwrap();
    assert_eq!(result.method, Method::Keywords);
    assert!(result.predictions.get(Category::Insult));
}
