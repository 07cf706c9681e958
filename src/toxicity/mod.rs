// Toxicity classification: a trained TF-IDF model with a keyword fallback.
//
// The ToxicityClassifier trait is the seam between the two. The dispatcher
// tries the model (through a cached handle) and falls back to the keyword
// table whenever the model is missing or unusable.

pub mod cache;
pub mod dispatch;
pub mod keywords;
pub mod model;
pub mod traits;
pub mod vectorizer;

pub use dispatch::Dispatcher;
