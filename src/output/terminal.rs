// Colored terminal output for classification results and system status.
//
// main.rs delegates all CLI display here.

use colored::Colorize;

use crate::toxicity::model::{artifacts_present, ARTIFACT_FILES};
use crate::toxicity::traits::{Category, ClassificationResult};
use crate::toxicity::Dispatcher;
use crate::toxicity::keywords::KeywordSource;

/// Display a single classification result.
pub fn display_result(result: &ClassificationResult) {
    let verdict = if result.predictions.is_toxic() {
        "TOXIC".red().bold()
    } else {
        "NON-TOXIC".green().bold()
    };

    println!("\n{} {}", "Overall:".bold(), verdict);
    println!(
        "  {} {}",
        "Method:".dimmed(),
        result.method.as_str().dimmed()
    );
    println!(
        "  {} \"{}\"",
        "Cleaned:".dimmed(),
        crate::output::truncate_chars(&result.cleaned_text, 100).dimmed()
    );

    println!("\n{}", "Categories:".bold());
    for category in Category::ALL {
        let flagged = result.predictions.get(category);
        let mark = if flagged {
            "yes".red().bold()
        } else {
            "no".green()
        };
        println!("  {:<14} {}", category.as_str().replace('_', " "), mark);
    }
    println!();
}

/// Display model and keyword configuration.
pub fn display_status(dispatcher: &Dispatcher) {
    let models = dispatcher.models();
    let dir = models.dir();

    println!("{}", "=== Comment Scanner Status ===".bold());
    println!("Model directory: {}", dir.display());
    for file in ARTIFACT_FILES {
        let present = dir.join(file).exists();
        let mark = if present {
            "found".green()
        } else {
            "missing".yellow()
        };
        println!("  {file:<16} {mark}");
    }
    if artifacts_present(dir) {
        match models.get() {
            Ok(_) => println!("Model: {}", "loads OK".green()),
            Err(e) => println!("Model: {}", format!("unusable ({e})").red()),
        }
    } else {
        println!(
            "Model: {}",
            "not installed, keyword fallback will be used".yellow()
        );
    }
    println!("Model cache: {}", models.policy());

    let keywords = dispatcher.keywords();
    match keywords.source() {
        KeywordSource::Embedded => println!("Keywords: embedded default table"),
        KeywordSource::File(path) => println!("Keywords: {}", path.display()),
    }
    if keywords.needs_review() {
        let note = keywords
            .review()
            .map(|r| r.note.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("no review status recorded");
        println!("  {} {}", "Content review pending:".yellow(), note.dimmed());
    }
}
