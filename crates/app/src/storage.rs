//! Local Store
//!
//! A small JSON file holding what survives between runs: the session token and the recent
//! search terms.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use silk::search_history::SearchHistory;
use thiserror::Error;

/// Errors reading or writing the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Store location
        path: PathBuf,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid store JSON.
    #[error("local store is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(default)]
    search_history: Vec<String>,
}

/// File-backed client state.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Use the store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted session token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store exists but cannot be read.
    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.token)
    }

    /// Persist the session token.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read or written.
    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        let mut state = self.read()?;

        state.token = Some(token.to_string());

        self.write(&state)
    }

    /// Forget the session token. Search history is kept.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read or written.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        let mut state = self.read()?;

        if state.token.take().is_none() {
            return Ok(());
        }

        self.write(&state)
    }

    /// Recent searches, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store exists but cannot be read.
    pub fn search_history(&self) -> Result<SearchHistory, StorageError> {
        Ok(SearchHistory::from_entries(self.read()?.search_history))
    }

    /// Record a search and return the updated history.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read or written.
    pub fn record_search(&self, term: &str) -> Result<SearchHistory, StorageError> {
        let mut state = self.read()?;
        let mut history = SearchHistory::from_entries(state.search_history);

        history.record(term);
        state.search_history = history.entries().to_vec();

        self.write(&state)?;

        Ok(history)
    }

    /// Forget every recorded search.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read or written.
    pub fn clear_search_history(&self) -> Result<(), StorageError> {
        let mut state = self.read()?;

        state.search_history.clear();

        self.write(&state)
    }

    fn read(&self) -> Result<StoredState, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(StoredState::default()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn write(&self, state: &StoredState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_vec_pretty(state)?;

        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::new(dir.path().join("nested").join("state.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() -> TestResult {
        let dir = TempDir::new()?;
        let store = store(&dir);

        assert_eq!(store.token()?, None);
        assert!(store.search_history()?.is_empty());

        Ok(())
    }

    #[test]
    fn token_round_trips_and_clears() -> TestResult {
        let dir = TempDir::new()?;
        let store = store(&dir);

        store.save_token("tok-123")?;

        assert_eq!(LocalStore::new(store.path()).token()?.as_deref(), Some("tok-123"));

        store.clear_token()?;

        assert_eq!(store.token()?, None);

        Ok(())
    }

    #[test]
    fn logout_keeps_search_history() -> TestResult {
        let dir = TempDir::new()?;
        let store = store(&dir);

        store.save_token("tok-123")?;
        store.record_search("silk robe")?;
        store.clear_token()?;

        assert_eq!(store.search_history()?.entries(), ["silk robe"]);

        Ok(())
    }

    #[test]
    fn search_history_is_capped_and_deduplicated() -> TestResult {
        let dir = TempDir::new()?;
        let store = store(&dir);

        for term in ["lace", "satin", "silk", "robe", "slip", "chemise", "Lace"] {
            store.record_search(term)?;
        }

        assert_eq!(
            store.search_history()?.entries(),
            ["Lace", "chemise", "slip", "robe", "silk"]
        );

        store.clear_search_history()?;

        assert!(store.search_history()?.is_empty());

        Ok(())
    }

    #[test]
    fn corrupt_file_is_reported() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("state.json");

        fs::write(&path, "not json")?;

        assert!(matches!(
            LocalStore::new(path).token(),
            Err(StorageError::Format(_))
        ));

        Ok(())
    }
}
