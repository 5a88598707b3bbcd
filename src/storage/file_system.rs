use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Network;
use crate::error::StorageError;
use crate::provider::ProviderKind;

/// Session-continuity fields persisted across restarts.
///
/// The browser original kept the same subset in local storage. It is
/// convenience state only: correctness never depends on it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoredSession {
    pub was_connected: bool,
    pub address: Option<String>,
    pub network: Option<Network>,
    pub provider: Option<ProviderKind>,
}

#[derive(Clone)]
pub struct SessionStorage {
    base_path: PathBuf,
}

impl SessionStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn session_file(&self) -> PathBuf {
        self.base_path.join("session.json")
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(session)?;
        fs::write(self.session_file(), json)?;
        Ok(())
    }

    /// Load the stored session, or the default when none was saved yet.
    pub fn load(&self) -> Result<StoredSession, StorageError> {
        let path = self.session_file();
        if !path.exists() {
            return Ok(StoredSession::default());
        }
        let contents = fs::read_to_string(path)?;
        let session = serde_json::from_str(&contents)?;
        Ok(session)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let path = self.session_file();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
