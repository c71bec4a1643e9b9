//! Lazily loaded, shared fitted-model handle.
//!
//! Lifecycle is `Unloaded -> Loaded` with no way back. The first caller loads
//! the artifact under an init lock; everyone after that reads the cached
//! `Arc` without locking. A failed load stores nothing, so the repository stays
//! `Unloaded` and the next caller retries.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use crate::error::AppError;
use crate::io::artifact::load_fitted_model;
use crate::model::FittedModel;

/// Where a repository gets its model from.
pub trait ArtifactSource: Send + Sync {
    /// Short description for logs (e.g. the file path).
    fn describe(&self) -> String;

    /// Produce a fully validated model.
    fn load(&self) -> Result<FittedModel, AppError>;
}

/// Loads the artifact from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<FittedModel, AppError> {
        load_fitted_model(&self.path)
    }
}

pub struct ModelRepository {
    source: Box<dyn ArtifactSource>,
    model: OnceLock<Arc<FittedModel>>,
    init: Mutex<()>,
    loads: AtomicUsize,
}

impl ModelRepository {
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            model: OnceLock::new(),
            init: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Number of times the underlying load routine has run.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Return the cached model, loading it on first use.
    pub fn get_model(&self) -> Result<Arc<FittedModel>, AppError> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        // A panic inside a previous load poisons the lock but never sets the
        // cell, so the guarded state is still consistent.
        let _guard = self.init.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(model) = self.model.get() {
            tracing::debug!("model loaded by a concurrent caller");
            return Ok(Arc::clone(model));
        }

        self.loads.fetch_add(1, Ordering::SeqCst);
        let source = self.source.describe();
        let started = Instant::now();
        tracing::info!(%source, "loading model artifact");

        let model = match self.source.load() {
            Ok(model) => Arc::new(model),
            Err(err) => {
                tracing::warn!(%source, kind = err.kind(), error = %err, "model artifact load failed");
                return Err(err);
            }
        };

        tracing::info!(
            %source,
            channels = model.num_channels(),
            geos = model.num_geos(),
            times = model.num_times(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model artifact loaded"
        );

        Ok(Arc::clone(self.model.get_or_init(|| model)))
    }
}

impl std::fmt::Debug for ModelRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRepository")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .field("loads", &self.load_count())
            .finish()
    }
}
