use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::CorpusError;
use crate::index::DeclarationIndex;
use crate::loader::{CorpusLoader, DefaultCorpusLoader};
use crate::source::{CorpusSource, SourceKey};

type IndexCell = Arc<OnceCell<Arc<DeclarationIndex>>>;

/// Builds each corpus index at most once per source key.
///
/// The map lock is held only to find or create a key's cell; the build itself
/// runs inside the cell, so concurrent first callers for one key wait on the
/// same build while other keys proceed. A failed build leaves the cell empty and
/// the next caller retries.
pub struct CorpusRegistry {
    loader: Arc<dyn CorpusLoader>,
    cells: Mutex<AHashMap<SourceKey, IndexCell>>,
    fetches: Mutex<AHashMap<SourceKey, usize>>,
}

impl Default for CorpusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusRegistry {
    pub fn new() -> Self {
        Self::with_loader(Arc::new(DefaultCorpusLoader))
    }

    pub fn with_loader(loader: Arc<dyn CorpusLoader>) -> Self {
        Self {
            loader,
            cells: Mutex::new(AHashMap::new()),
            fetches: Mutex::new(AHashMap::new()),
        }
    }

    pub fn global() -> &'static Self {
        static GLOBAL: Lazy<CorpusRegistry> = Lazy::new(CorpusRegistry::new);
        &GLOBAL
    }

    fn cell(&self, key: &SourceKey) -> IndexCell {
        self.cells
            .lock()
            .entry(key.clone())
            .or_default()
            .clone()
    }

    /// Returns the index for `source`, loading and building it on first use.
    pub fn load(&self, source: &CorpusSource) -> Result<Arc<DeclarationIndex>, CorpusError> {
        let key = source.key();
        let cell = self.cell(&key);
        cell.get_or_try_init(|| {
            *self.fetches.lock().entry(key.clone()).or_default() += 1;
            debug!(source = %key, "loading declaration corpus");

            let text = self
                .loader
                .load(source)
                .map_err(|reason| CorpusError::SourceUnavailable {
                    key: key.clone(),
                    reason: Box::new(reason),
                })?;
            Ok(Arc::new(DeclarationIndex::build(key.clone(), &text)))
        })
        .cloned()
    }

    /// Like [`load`](Self::load), but a failure yields an empty index alongside
    /// the error. The empty index is not cached.
    pub fn load_or_empty(
        &self,
        source: &CorpusSource,
    ) -> (Arc<DeclarationIndex>, Option<CorpusError>) {
        match self.load(source) {
            Ok(index) => (index, None),
            Err(err) => {
                warn!(source = %source.key(), error = %err, "corpus unavailable, using an empty index");
                (Arc::new(DeclarationIndex::empty(source.key())), Some(err))
            }
        }
    }

    /// How many times the loader has been invoked for `key`.
    pub fn fetch_count(&self, key: &SourceKey) -> usize {
        self.fetches.lock().get(key).copied().unwrap_or(0)
    }

    pub fn is_loaded(&self, key: &SourceKey) -> bool {
        self.cells
            .lock()
            .get(key)
            .is_some_and(|cell| cell.get().is_some())
    }
}
