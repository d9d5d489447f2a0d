//! Session-token persistence behind the auth gate.
//!
//! The contract is session-lifetime only: the token is cleared on logout
//! or session end and is never written to durable storage. The file
//! store keeps it under the user runtime directory, which the OS wipes
//! at session end; the in-memory store backs tests and embedders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name inside the runtime directory.
const SESSION_FILE: &str = "session.json";

const RUNTIME_DIR_ENV: &str = "BIDFORGE_RUNTIME_DIR";

/// Load/save/clear seam for the single session token.
pub trait SessionStore: Send + Sync {
    /// The stored token, if a session exists.
    fn load(&self) -> Result<Option<String>>;
    /// Persist the token for the remainder of the session.
    fn save(&self, token: &str) -> Result<()>;
    /// Drop the session, if any. Clearing an empty store is fine.
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and short-lived embedders. Clones share
/// the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    /// Schema version for migration.
    #[serde(default = "default_version")]
    version: u32,
    token: String,
    saved_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

/// File-backed store rooted in the user runtime directory, so the token
/// disappears with the login session rather than persisting under the
/// home directory.
#[derive(Debug, Clone)]
pub struct EphemeralSessionStore {
    file_path: PathBuf,
}

impl EphemeralSessionStore {
    /// Store at the default location:
    /// `$BIDFORGE_RUNTIME_DIR` → `$XDG_RUNTIME_DIR/bidforge` → the
    /// system temp directory.
    pub fn new() -> Self {
        Self::with_path(default_runtime_dir().join(SESSION_FILE))
    }

    /// Store at a custom file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { file_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl Default for EphemeralSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for EphemeralSessionStore {
    fn load(&self) -> Result<Option<String>> {
        let contents = match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: SessionFile = serde_json::from_str(&contents)?;
        Ok(Some(file.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = SessionFile {
            version: default_version(),
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        std::fs::write(&self.file_path, serde_json::to_string_pretty(&file)?)?;

        // Token file is user-only (Unix).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.file_path, permissions)?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn default_runtime_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(RUNTIME_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join("bidforge");
        }
    }
    std::env::temp_dir().join("bidforge")
}
