// Classification dispatcher: trained model first, keyword table as fallback.
//
// Any model failure (artifacts missing, unreadable, incompatible, or a
// prediction error) is logged and the keyword table answers instead. Model
// errors never reach the caller; the only error `classify` can return comes
// from the keyword path itself.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use super::cache::ModelHandle;
use super::keywords::KeywordTable;
use super::traits::{ClassificationResult, ToxicityClassifier};
use crate::config::Config;
use crate::output::truncate_chars;
use crate::text::normalize;

pub struct Dispatcher {
    models: ModelHandle,
    keywords: KeywordTable,
}

impl Dispatcher {
    pub fn new(models: ModelHandle, keywords: KeywordTable) -> Self {
        Self { models, keywords }
    }

    /// Build a dispatcher from the model directory, cache policy and keyword
    /// source in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let keywords = config.keyword_table()?;
        let models = ModelHandle::new(&config.model_dir, config.model_cache);
        Ok(Self::new(models, keywords))
    }

    pub fn models(&self) -> &ModelHandle {
        &self.models
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Classify `text`, preferring the trained model.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let cleaned = normalize(text);

        match self.models.get() {
            Ok(model) => match model.classify_normalized(text, cleaned.clone()) {
                Ok(result) => {
                    debug!(
                        is_toxic = result.predictions.is_toxic(),
                        text_preview = %truncate_chars(text, 50),
                        "Model classified text"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    error!(error = %e, "Model prediction failed, falling back to keyword matching")
                }
            },
            Err(e) if e.is_missing() => {
                warn!(error = %e, "One or more model files not found")
            }
            Err(e) => error!(error = %e, "Error loading model"),
        }

        info!("Using fallback classification method");
        self.keywords.classify_normalized(text, cleaned)
    }
}
