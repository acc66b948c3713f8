//! Encrypted persistence of the credential map.
//!
//! A vault file is `[16-byte salt][AES-256-GCM ciphertext]` whose plaintext
//! is the UTF-8 JSON of a [`CredentialMap`].  Every save draws a new salt,
//! so the key changes on every write even when the password does not.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::credential::CredentialMap;
use super::migration::DataMigrator;
use crate::crypto::kdf::SALT_LEN;
use crate::crypto::{AesGcmDataEncryptor, DataEncryptor};
use crate::errors::{Result, VaultError};
use crate::fsutil;

/// What a password does to the vault file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultProbe {
    /// No vault file exists yet.
    Missing,
    /// The file decrypts with the password.
    Unlocks,
    /// The file exists but does not decrypt with the password.
    Locked,
}

/// Load/save contract for the credential map.
pub trait VaultRepository {
    /// Load and decrypt the vault.
    ///
    /// A missing file yields an empty map.  A file that fails to decrypt is
    /// [`VaultError::AuthenticationFailed`], never an empty map.
    fn load_data(&self, password: &str) -> Result<CredentialMap>;

    /// Encrypt `data` under `password` with a fresh salt and overwrite the file.
    fn save_data(&self, data: &CredentialMap, password: &str) -> Result<()>;

    /// Re-encrypt the whole map under `new_password`.
    ///
    /// Only the vault file changes; the master-hash record is the caller's
    /// responsibility.
    fn rotate_encryption(&self, data: &CredentialMap, new_password: &str) -> Result<()>;

    /// Check whether `password` opens the vault file without loading it.
    fn probe(&self, password: &str) -> Result<VaultProbe>;

    /// `true` if the vault file exists on disk.
    fn exists(&self) -> bool;

    /// Where the vault lives; recorded so an interrupted rotation can find it.
    fn location(&self) -> &Path;
}

/// Vault repository backed by a single encrypted file.
pub struct FileVaultRepository {
    path: PathBuf,
    encryptor: Box<dyn DataEncryptor>,
    migrator: Option<Box<dyn DataMigrator>>,
}

impl FileVaultRepository {
    pub fn new(path: impl Into<PathBuf>, encryptor: impl DataEncryptor + 'static) -> Self {
        Self {
            path: path.into(),
            encryptor: Box::new(encryptor),
            migrator: None,
        }
    }

    /// Repository with the default AES-GCM encryptor and no migrator.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self::new(path, AesGcmDataEncryptor::new())
    }

    /// Run `migrator` over every successfully decrypted payload.
    #[must_use]
    pub fn with_migrator(mut self, migrator: impl DataMigrator + 'static) -> Self {
        self.migrator = Some(Box::new(migrator));
        self
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw file, returning `None` when there is nothing to decrypt.
    ///
    /// A file holding no ciphertext (empty, or a bare salt) counts as an
    /// empty vault.
    fn read_blob(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let blob = fs::read(&self.path)?;
        if blob.len() <= SALT_LEN {
            return Ok(None);
        }
        Ok(Some(blob))
    }

    fn decode(&self, plaintext: &[u8], password: &str) -> Result<CredentialMap> {
        let value: serde_json::Value = serde_json::from_slice(plaintext)
            .map_err(|e| VaultError::Serialization(format!("vault payload: {e}")))?;

        let Some(migrator) = &self.migrator else {
            return serde_json::from_value(value)
                .map_err(|e| VaultError::Serialization(format!("vault payload: {e}")));
        };

        let migration = migrator.migrate(value);
        let data: CredentialMap = serde_json::from_value(migration.data)
            .map_err(|e| VaultError::Serialization(format!("migrated payload: {e}")))?;

        if migration.changed {
            info!(path = %self.path.display(), "migrated vault to keyed format");
            self.save_data(&data, password)?;
        }
        Ok(data)
    }
}

impl VaultRepository for FileVaultRepository {
    fn load_data(&self, password: &str) -> Result<CredentialMap> {
        let Some(blob) = self.read_blob()? else {
            debug!(path = %self.path.display(), "no vault data, starting empty");
            return Ok(CredentialMap::new());
        };

        let plaintext = self.encryptor.decrypt(&blob, password)?;
        let data = self.decode(&plaintext, password)?;
        debug!(path = %self.path.display(), count = data.len(), "vault loaded");
        Ok(data)
    }

    fn save_data(&self, data: &CredentialMap, password: &str) -> Result<()> {
        let json = serde_json::to_vec(data)?;
        let blob = self.encryptor.encrypt(&json, password)?;
        fsutil::write_atomic(&self.path, &blob)?;
        debug!(path = %self.path.display(), count = data.len(), "vault saved");
        Ok(())
    }

    fn rotate_encryption(&self, data: &CredentialMap, new_password: &str) -> Result<()> {
        // save_data always draws a new salt, so this is a full re-encryption
        // under a freshly derived key.
        self.save_data(data, new_password)?;
        info!(path = %self.path.display(), count = data.len(), "vault re-encrypted");
        Ok(())
    }

    fn probe(&self, password: &str) -> Result<VaultProbe> {
        if !self.exists() {
            return Ok(VaultProbe::Missing);
        }
        let Some(blob) = self.read_blob()? else {
            return Ok(VaultProbe::Unlocks);
        };
        match self.encryptor.decrypt(&blob, password) {
            Ok(_) => Ok(VaultProbe::Unlocks),
            Err(VaultError::AuthenticationFailed) => Ok(VaultProbe::Locked),
            Err(e) => Err(e),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::credential::Credential;
    use crate::vault::migration::LegacyListMigrator;
    use tempfile::TempDir;

    fn sample() -> CredentialMap {
        let mut map = CredentialMap::new();
        map.insert("github".into(), Credential::new("GitHub", "octo", "p1"));
        map
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = FileVaultRepository::with_defaults(dir.path().join("v.json"));
        assert!(repo.load_data("pw").unwrap().is_empty());
        assert!(!repo.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileVaultRepository::with_defaults(dir.path().join("v.json"));
        repo.save_data(&sample(), "pw").unwrap();
        assert_eq!(repo.load_data("pw").unwrap(), sample());
    }

    #[test]
    fn wrong_password_is_not_empty_vault() {
        let dir = TempDir::new().unwrap();
        let repo = FileVaultRepository::with_defaults(dir.path().join("v.json"));
        repo.save_data(&sample(), "pw").unwrap();

        assert!(matches!(
            repo.load_data("nope"),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn corrupted_file_is_authentication_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.json");
        let repo = FileVaultRepository::with_defaults(&path);
        repo.save_data(&sample(), "pw").unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            repo.load_data("pw"),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn every_save_uses_a_new_salt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.json");
        let repo = FileVaultRepository::with_defaults(&path);

        repo.save_data(&sample(), "pw").unwrap();
        let first = fs::read(&path).unwrap();
        repo.save_data(&sample(), "pw").unwrap();
        let second = fs::read(&path).unwrap();

        assert_ne!(first[..SALT_LEN], second[..SALT_LEN]);
    }

    #[test]
    fn legacy_list_is_migrated_and_resaved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.json");
        let encryptor = AesGcmDataEncryptor::new();

        let legacy = br#"[{"service": "GitHub", "username": "octo", "password": "p1"}]"#;
        fs::write(&path, encryptor.encrypt(legacy, "pw").unwrap()).unwrap();
        let before = fs::read(&path).unwrap();

        let repo = FileVaultRepository::new(&path, encryptor).with_migrator(LegacyListMigrator);
        let data = repo.load_data("pw").unwrap();
        assert_eq!(data, sample());

        // The file was rewritten in the keyed shape.
        let after = fs::read(&path).unwrap();
        assert_ne!(before, after);
        let plain = AesGcmDataEncryptor::new().decrypt(&after, "pw").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&plain).unwrap();
        assert!(value.is_object());

        // Loading again is a no-op for the file.
        repo.load_data("pw").unwrap();
        assert_eq!(fs::read(&path).unwrap(), after);
    }

    #[test]
    fn probe_reports_state() {
        let dir = TempDir::new().unwrap();
        let repo = FileVaultRepository::with_defaults(dir.path().join("v.json"));
        assert_eq!(repo.probe("pw").unwrap(), VaultProbe::Missing);

        repo.save_data(&sample(), "pw").unwrap();
        assert_eq!(repo.probe("pw").unwrap(), VaultProbe::Unlocks);
        assert_eq!(repo.probe("other").unwrap(), VaultProbe::Locked);
    }

    #[test]
    fn rotation_switches_password() {
        let dir = TempDir::new().unwrap();
        let repo = FileVaultRepository::with_defaults(dir.path().join("v.json"));
        repo.save_data(&sample(), "old").unwrap();

        repo.rotate_encryption(&sample(), "new").unwrap();

        assert_eq!(repo.load_data("new").unwrap(), sample());
        assert!(matches!(
            repo.load_data("old"),
            Err(VaultError::AuthenticationFailed)
        ));
    }
}
