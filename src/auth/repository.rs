//! Persistence of the master-password hash record.
//!
//! The record is a single line of hex text.  Next to it may sit a
//! `<name>.pending` JSON file holding the hash of a new master password
//! whose rotation has started but not yet been committed, together with the
//! vault file being re-encrypted.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, VaultError};
use crate::fsutil;

/// A staged master hash and the vault its rotation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHash {
    pub hash: String,
    pub vault: PathBuf,
}

/// Storage contract for the master-password hash.
pub trait MasterHashRepository {
    /// Replace the stored hash.
    fn save_hash(&self, hashed: &str) -> Result<()>;

    /// The stored hash, or `None` when there is none (first run) or it
    /// cannot be read.
    fn load_hash(&self) -> Option<String>;

    /// Store a hash for a rotation in progress, leaving the current one.
    fn save_pending(&self, pending: &PendingHash) -> Result<()>;

    /// The pending record, if a rotation is in progress.
    fn load_pending(&self) -> Option<PendingHash>;

    /// Promote the pending hash to the current one.
    fn commit_pending(&self) -> Result<()>;

    /// Drop the pending hash.  Succeeds if there is none.
    fn discard_pending(&self) -> Result<()>;
}

/// Master hash stored in a plain text file.
#[derive(Debug, Clone)]
pub struct FileMasterHashRepository {
    path: PathBuf,
    pending_path: PathBuf,
}

impl FileMasterHashRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut pending: OsString = path.clone().into_os_string();
        pending.push(".pending");
        Self {
            path,
            pending_path: PathBuf::from(pending),
        }
    }

    /// Returns the path to the hash file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the pending-rotation hash file.
    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read master hash");
            None
        }
    }
}

impl MasterHashRepository for FileMasterHashRepository {
    fn save_hash(&self, hashed: &str) -> Result<()> {
        fsutil::write_atomic(&self.path, hashed.as_bytes())
    }

    fn load_hash(&self) -> Option<String> {
        read_trimmed(&self.path)
    }

    fn save_pending(&self, pending: &PendingHash) -> Result<()> {
        let json = serde_json::to_vec(pending)?;
        fsutil::write_atomic(&self.pending_path, &json)
    }

    fn load_pending(&self) -> Option<PendingHash> {
        let raw = read_trimmed(&self.pending_path)?;
        match serde_json::from_str(&raw) {
            Ok(pending) => Some(pending),
            Err(e) => {
                warn!(path = %self.pending_path.display(), error = %e, "unreadable pending master hash");
                None
            }
        }
    }

    fn commit_pending(&self) -> Result<()> {
        let pending = self
            .load_pending()
            .ok_or_else(|| VaultError::CommandFailed("no pending master hash to commit".into()))?;
        // Rewriting an already-committed hash is harmless, so a crash between
        // these two steps is finished by the next commit.
        fsutil::write_atomic(&self.path, pending.hash.as_bytes())?;
        self.discard_pending()
    }

    fn discard_pending(&self) -> Result<()> {
        match fs::remove_file(&self.pending_path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
