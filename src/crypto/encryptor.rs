//! Password-keyed encryption of the vault payload.
//!
//! Container layout produced by [`AesGcmDataEncryptor::encrypt`]:
//!
//! ```text
//! [16-byte PBKDF2 salt][12-byte nonce][ciphertext][16-byte GCM tag]
//! ```
//!
//! A fresh salt and nonce are drawn on every call, so encrypting the same
//! payload twice never yields the same bytes.

use zeroize::Zeroize;

use super::encryption::{open, seal};
use super::kdf::{self, KEY_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};

/// Key derivation + authenticated encryption keyed by a password.
pub trait DataEncryptor {
    /// Derive the symmetric key for `password` and `salt`.
    fn derive_key(&self, password: &str, salt: &[u8]) -> [u8; KEY_LEN];

    /// Encrypt `plaintext`, returning `salt || ciphertext`.
    fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>>;

    /// Decrypt a blob produced by [`DataEncryptor::encrypt`].
    ///
    /// Fails with [`VaultError::AuthenticationFailed`] on a wrong password
    /// or corrupted bytes.
    fn decrypt(&self, blob: &[u8], password: &str) -> Result<Vec<u8>>;
}

/// PBKDF2-HMAC-SHA256 key derivation feeding AES-256-GCM.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmDataEncryptor;

impl AesGcmDataEncryptor {
    pub fn new() -> Self {
        Self
    }
}

impl DataEncryptor for AesGcmDataEncryptor {
    fn derive_key(&self, password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
        kdf::derive_key(password.as_bytes(), salt)
    }

    fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
        let salt = kdf::generate_salt();
        let mut key = self.derive_key(password, &salt);
        let sealed = seal(&key, plaintext);
        key.zeroize();
        let sealed = sealed?;

        let mut blob = Vec::with_capacity(SALT_LEN + sealed.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8], password: &str) -> Result<Vec<u8>> {
        if blob.len() < SALT_LEN {
            return Err(VaultError::AuthenticationFailed);
        }
        let (salt, sealed) = blob.split_at(SALT_LEN);

        let mut key = self.derive_key(password, salt);
        let plaintext = open(&key, sealed);
        key.zeroize();
        plaintext
    }
}
