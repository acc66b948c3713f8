//! Master-password creation and verification.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::repository::{MasterHashRepository, PendingHash};
use crate::crypto::PasswordHasher;
use crate::errors::Result;

/// Ties a [`PasswordHasher`] to a [`MasterHashRepository`].
pub struct AuthenticationService {
    repo: Box<dyn MasterHashRepository>,
    hasher: Box<dyn PasswordHasher>,
}

impl AuthenticationService {
    pub fn new(
        repo: impl MasterHashRepository + 'static,
        hasher: impl PasswordHasher + 'static,
    ) -> Self {
        Self {
            repo: Box::new(repo),
            hasher: Box::new(hasher),
        }
    }

    /// `true` once a master password has been set up.
    pub fn has_master_hash(&self) -> bool {
        self.repo.load_hash().is_some()
    }

    /// Hash `password` and store it as the master hash.
    ///
    /// Returns `false` if the record could not be written.
    pub fn create_master_hash(&self, password: &str) -> bool {
        let hashed = self.hasher.hash_password(password);
        match self.repo.save_hash(&hashed) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save master hash");
                false
            }
        }
    }

    /// Check `attempt` against the stored master hash.
    ///
    /// With no stored hash this is `false`; callers should route to
    /// first-run setup via [`AuthenticationService::has_master_hash`].
    pub fn verify_password(&self, attempt: &str) -> bool {
        match self.repo.load_hash() {
            Some(stored) => self.hasher.verify_password(attempt, &stored),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Staged hash, used by master-password rotation
    // ------------------------------------------------------------------

    /// Write the hash of `new_password` beside the current one, recording
    /// `vault` as the file about to be re-encrypted.
    pub fn stage_master_hash(&self, new_password: &str, vault: &Path) -> Result<()> {
        self.repo.save_pending(&PendingHash {
            hash: self.hasher.hash_password(new_password),
            vault: vault.to_path_buf(),
        })
    }

    /// `true` if a staged hash exists.
    pub fn has_staged(&self) -> bool {
        self.repo.load_pending().is_some()
    }

    /// The vault file the staged rotation targets.
    pub fn staged_vault(&self) -> Option<PathBuf> {
        self.repo.load_pending().map(|pending| pending.vault)
    }

    /// Check `attempt` against the staged hash.
    pub fn verify_staged(&self, attempt: &str) -> bool {
        match self.repo.load_pending() {
            Some(pending) => self.hasher.verify_password(attempt, &pending.hash),
            None => false,
        }
    }

    /// Make the staged hash the master hash.
    pub fn commit_staged(&self) -> Result<()> {
        self.repo.commit_pending()
    }

    /// Throw away the staged hash.
    pub fn discard_staged(&self) -> Result<()> {
        self.repo.discard_pending()
    }
}
