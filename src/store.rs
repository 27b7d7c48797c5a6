// src/store.rs
//
// Where a harvest lives between page loads. The state is written right before
// every navigation and read back first thing in the next process.

use std::{fs, io, path::{Path, PathBuf}};

use crate::data::HarvestState;
use crate::error::HarvestError;

pub trait StateStore {
    /// `Ok(None)` when nothing is persisted. Unreadable state counts as nothing.
    fn load(&mut self) -> Result<Option<HarvestState>, HarvestError>;
    fn save(&mut self, state: &HarvestState) -> Result<(), HarvestError>;
    /// Removing state that is not there is fine.
    fn clear(&mut self) -> Result<(), HarvestError>;
}

/// JSON file under the store dir, named after the fixed state key.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&mut self) -> Result<Option<HarvestState>, HarvestError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<HarvestState>(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                loge!("Store: discarding unreadable state at {}: {e}", self.path.display());
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&mut self, state: &HarvestState) -> Result<(), HarvestError> {
        // Ensure parent directories exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write-then-rename so a teardown mid-write never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(state)?)?;
        fs::rename(&tmp, &self.path)?;
        logd!(
            "Store: saved {} matches, {} pages -> {}",
            state.matches.len(),
            state.pages_scraped,
            self.path.display()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HarvestError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                logd!("Store: cleared {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store. Survives a simulated teardown as long as the value does.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    pub state: Option<HarvestState>,
    pub saves: usize,
    pub clears: usize,
    /// `load` fails as if the backing file could not be read.
    pub unreadable: bool,
}

impl MemoryStateStore {
    pub fn with_state(state: HarvestState) -> Self {
        Self { state: Some(state), ..Self::default() }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&mut self) -> Result<Option<HarvestState>, HarvestError> {
        if self.unreadable {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
        }
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &HarvestState) -> Result<(), HarvestError> {
        self.saves += 1;
        self.state = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HarvestError> {
        self.clears += 1;
        self.state = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gem_scrape_store_{}_{name}", std::process::id()))
            .join("state.json")
    }

    #[test]
    fn missing_file_is_none_and_clear_is_idempotent() {
        let mut store = FileStateStore::new(tmp_path("missing"));
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_cleared() {
        let path = tmp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let mut store = FileStateStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn memory_store_counts_calls() {
        let mut store = MemoryStateStore::default();
        store.save(&HarvestState { pages_scraped: 2, ..HarvestState::default() }).unwrap();
        assert_eq!(store.load().unwrap().map(|s| s.pages_scraped), Some(2));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!((store.saves, store.clears), (1, 1));
    }
}
