use super::engine::MaterialClassifier;
use crate::{error::MaterialIdError, taxonomy::TaxonomyStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// A classifier that follows its `TaxonomyStore`.
///
/// `current` hands out the classifier built from the store's latest
/// taxonomy. `refresh` reloads the store when its source changed on disk and
/// swaps in a classifier rebuilt from the new taxonomy; callers holding the
/// previous classifier keep using it until they ask again.
#[derive(Debug)]
pub struct LiveClassifier {
    store: TaxonomyStore,
    current: RwLock<Arc<MaterialClassifier>>,
}

impl LiveClassifier {
    pub fn new(store: TaxonomyStore) -> Result<Self, MaterialIdError> {
        let classifier = MaterialClassifier::from_store(&store)?;
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(classifier)),
        })
    }

    pub fn store(&self) -> &TaxonomyStore {
        &self.store
    }

    pub fn current(&self) -> Arc<MaterialClassifier> {
        self.current.read().clone()
    }

    /// Rebuilds the classifier if the store's source changed.
    ///
    /// Returns `Ok(true)` when a new classifier was swapped in and
    /// `Ok(false)` when nothing changed or the store has no file source
    /// (the bundled taxonomy).
    ///
    /// # Errors
    ///
    /// The reload error. Both the store and the current classifier are left
    /// as they were.
    pub fn refresh(&self) -> Result<bool, MaterialIdError> {
        let taxonomy = match self.store.reload_if_changed() {
            Ok(Some(taxonomy)) => taxonomy,
            Ok(None) | Err(MaterialIdError::NoSource) => return Ok(false),
            Err(e) => return Err(e),
        };
        let rebuilt = MaterialClassifier::new(taxonomy)?;
        *self.current.write() = Arc::new(rebuilt);
        info!("Classifier rebuilt from reloaded taxonomy");
        Ok(true)
    }
}
