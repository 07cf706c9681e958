// Cached handle to the on-disk model.
//
// With `CachePolicy::None` the artifacts are read from disk on every call.
// With `CachePolicy::ReloadOnChange` the loaded model is kept in memory and
// reused as long as every artifact's modification time and size are
// unchanged and labels.json has the same contents; any change triggers a
// reload, and a missing or broken artifact drops the cached copy.
//
// The two weight files are only compared by metadata. A same-size rewrite of
// classifier.json or vectorizer.json that keeps the old mtime (`cp -p`,
// `rsync -t`, or an edit within the filesystem's mtime resolution) is not
// noticed until `invalidate` is called or the process restarts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use tracing::info;

use super::model::{ModelError, ToxicityModel, ARTIFACT_FILES, LABELS_FILE};

/// How loaded models are reused between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Reload the artifacts for every classification
    None,
    /// Keep the model until an artifact changes on disk
    #[default]
    ReloadOnChange,
}

impl CachePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::None => "none",
            CachePolicy::ReloadOnChange => "reload-on-change",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(CachePolicy::None),
            "reload-on-change" | "reload_on_change" => Ok(CachePolicy::ReloadOnChange),
            other => Err(format!(
                "unknown model cache policy {other:?} (expected \"none\" or \"reload-on-change\")"
            )),
        }
    }
}

/// Identity of one artifact on disk. `contents` is only kept for the label
/// list, which is a few dozen bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArtifactStamp {
    modified: Option<SystemTime>,
    len: u64,
    contents: Option<Vec<u8>>,
}

struct CachedModel {
    stamps: Vec<ArtifactStamp>,
    model: Arc<ToxicityModel>,
}

/// Shared handle to the model in a directory, honoring a `CachePolicy`.
pub struct ModelHandle {
    dir: PathBuf,
    policy: CachePolicy,
    cached: Mutex<Option<CachedModel>>,
}

impl ModelHandle {
    pub fn new(dir: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
            cached: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Whether a model is currently held in memory.
    pub fn is_cached(&self) -> bool {
        self.slot().is_some()
    }

    /// Drop the cached model; the next `get` reloads from disk.
    pub fn invalidate(&self) {
        *self.slot() = None;
    }

    /// Return the current model, loading it from disk if needed.
    pub fn get(&self) -> Result<Arc<ToxicityModel>, ModelError> {
        if self.policy == CachePolicy::None {
            return ToxicityModel::load(&self.dir).map(Arc::new);
        }

        let stamps = match artifact_stamps(&self.dir) {
            Ok(stamps) => stamps,
            Err(e) => {
                self.invalidate();
                return Err(e);
            }
        };

        let mut slot = self.slot();
        if let Some(cached) = slot.as_ref() {
            if cached.stamps == stamps {
                return Ok(Arc::clone(&cached.model));
            }
            info!("Model artifacts changed on disk, reloading");
        }

        match ToxicityModel::load(&self.dir) {
            Ok(model) => {
                let model = Arc::new(model);
                *slot = Some(CachedModel {
                    stamps,
                    model: Arc::clone(&model),
                });
                info!(dir = %self.dir.display(), "Toxicity model cached");
                Ok(model)
            }
            Err(e) => {
                *slot = None;
                Err(e)
            }
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CachedModel>> {
        // The slot is only ever replaced wholesale, so a poisoned lock still
        // holds a consistent value.
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn artifact_stamps(dir: &Path) -> Result<Vec<ArtifactStamp>, ModelError> {
    ARTIFACT_FILES
        .iter()
        .map(|&file| {
            let path = dir.join(file);
            let io_error = |source: std::io::Error| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    ModelError::Missing(path.clone())
                } else {
                    ModelError::Io {
                        path: path.clone(),
                        source,
                    }
                }
            };
            let meta = std::fs::metadata(&path).map_err(io_error)?;
            let contents = if file == LABELS_FILE {
                Some(std::fs::read(&path).map_err(io_error)?)
            } else {
                None
            };
            Ok(ArtifactStamp {
                modified: meta.modified().ok(),
                len: meta.len(),
                contents,
            })
        })
        .collect()
}
