use super::{loader::load_source, Taxonomy};
use crate::error::MaterialIdError;
use parking_lot::{Mutex, RwLock};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct SourceState {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Owns the process-wide current taxonomy.
///
/// A load parses and validates the whole source before swapping it in, so
/// readers see either the previous taxonomy or the new one, never a mix.
/// Until a load succeeds the store holds the empty taxonomy.
#[derive(Debug)]
pub struct TaxonomyStore {
    current: RwLock<Arc<Taxonomy>>,
    source: Mutex<Option<SourceState>>,
}

impl Default for TaxonomyStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl TaxonomyStore {
    pub fn empty() -> Self {
        Self::with_taxonomy(Taxonomy::empty())
    }

    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self {
            current: RwLock::new(Arc::new(taxonomy)),
            source: Mutex::new(None),
        }
    }

    /// The current taxonomy. Cheap; the snapshot stays valid across reloads.
    pub fn snapshot(&self) -> Arc<Taxonomy> {
        self.current.read().clone()
    }

    pub fn is_available(&self) -> bool {
        !self.current.read().is_empty()
    }

    /// Loads `path` and makes it the current taxonomy and the reload source.
    ///
    /// # Errors
    ///
    /// Any load or validation error. The current taxonomy is left untouched.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Taxonomy>, MaterialIdError> {
        let path = path.as_ref().to_path_buf();
        let modified = last_modified(&path);
        match load_source(&path).and_then(Taxonomy::from_file) {
            Ok(taxonomy) => {
                let taxonomy = Arc::new(taxonomy);
                *self.current.write() = taxonomy.clone();
                *self.source.lock() = Some(SourceState { path: path.clone(), modified });
                info!("Taxonomy loaded from '{}' ({} materials)", path.display(), taxonomy.len());
                Ok(taxonomy)
            }
            Err(e) => {
                warn!("Keeping previous taxonomy, load of '{}' failed: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Reloads from the last successfully loaded source.
    pub fn reload(&self) -> Result<Arc<Taxonomy>, MaterialIdError> {
        let path = self.source.lock().as_ref().map(|s| s.path.clone()).ok_or(MaterialIdError::NoSource)?;
        self.load(path)
    }

    /// Reloads only when the source's modification time moved. Returns
    /// `Ok(None)` when nothing changed.
    pub fn reload_if_changed(&self) -> Result<Option<Arc<Taxonomy>>, MaterialIdError> {
        let state = self.source.lock().clone().ok_or(MaterialIdError::NoSource)?;
        if last_modified(&state.path) == state.modified {
            return Ok(None);
        }
        self.load(&state.path).map(Some)
    }
}

// For a directory, the newest modification time among its entries.
fn last_modified(path: &Path) -> Option<SystemTime> {
    let own = fs::metadata(path).and_then(|m| m.modified()).ok();
    if !path.is_dir() {
        return own;
    }
    let newest_entry = fs::read_dir(path)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().and_then(|m| m.modified()).ok())
        .max();
    own.max(newest_entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "materials:\n  glass: { summary: Silica, impact: Moderate, recyclable: true }\n";
    const INVALID: &str = "materials:\n  glass: { summary: Silica, impact: Moderate }\nfallbacks:\n  jar: mason\n";

    #[test]
    fn test_failed_reload_keeps_previous_taxonomy() {
        let path = std::env::temp_dir().join(format!("materialid-store-{}.yaml", std::process::id()));
        fs::write(&path, VALID).unwrap();

        let store = TaxonomyStore::empty();
        assert!(!store.is_available());
        store.load(&path).unwrap();
        let before = store.snapshot();
        assert!(before.contains("glass"));

        fs::write(&path, INVALID).unwrap();
        assert!(store.reload().is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_first_load_leaves_store_empty() {
        let store = TaxonomyStore::empty();
        assert!(store.load("/nonexistent/taxonomy.yaml").is_err());
        assert!(!store.is_available());
        assert!(matches!(store.reload().unwrap_err(), MaterialIdError::NoSource));
    }

    #[test]
    fn test_unchanged_source_is_not_reloaded() {
        let path = std::env::temp_dir().join(format!("materialid-store-unchanged-{}.yaml", std::process::id()));
        fs::write(&path, VALID).unwrap();

        let store = TaxonomyStore::empty();
        store.load(&path).unwrap();
        assert!(store.reload_if_changed().unwrap().is_none());

        fs::remove_file(&path).unwrap();
    }
}
