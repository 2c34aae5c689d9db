//! Per-engine document cache.
//!
//! Each path owns a slot guarded by its own mutex. The first caller to lock an
//! empty slot performs the load while concurrent callers for the same path
//! block on the slot and then reuse the stored document, so a path is never
//! loaded twice. Failed loads leave the slot empty: the error goes to the
//! caller that attempted the load and the next caller tries again.

use std::collections::HashMap;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;

use crate::backend::BackendKind;
use crate::document::Document;
use crate::error::HieraResult;

type Slot = Arc<Mutex<Option<Arc<Document>>>>;

/// Maps a data file path to its parsed document.
#[derive(Debug, Default)]
pub struct DocumentCache {
    slots: Mutex<HashMap<Utf8PathBuf, Slot>>,
}

impl DocumentCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document for `path`, loading it with `backend` on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HieraError::Load`] when reading or parsing fails. The
    /// failure is not cached.
    pub fn load(&self, path: &Utf8Path, backend: BackendKind) -> HieraResult<Arc<Document>> {
        self.get_or_load(path, || {
            tracing::debug!(path = %path, backend = backend.name(), "loading data file");
            backend.load(path)
        })
    }

    pub(crate) fn get_or_load<F>(&self, path: &Utf8Path, load: F) -> HieraResult<Arc<Document>>
    where
        F: FnOnce() -> HieraResult<Document>,
    {
        let slot = Arc::clone(self.slots.lock().entry(path.to_owned()).or_default());
        let mut loaded = slot.lock();
        if let Some(document) = loaded.as_ref() {
            tracing::trace!(path = %path, "document cache hit");
            return Ok(Arc::clone(document));
        }
        let document = Arc::new(load()?);
        *loaded = Some(Arc::clone(&document));
        Ok(document)
    }

    /// The cached document for `path`, without loading.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<Arc<Document>> {
        let slot = self.slots.lock().get(path).map(Arc::clone)?;
        let loaded = slot.lock();
        loaded.as_ref().map(Arc::clone)
    }

    /// Number of successfully loaded documents.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().map(Arc::clone).collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    /// Whether no document has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
