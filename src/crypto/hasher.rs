//! One-way hashing of the master password.
//!
//! Stored form is `hex(salt || digest)`: 16 salt bytes followed by the
//! 32-byte PBKDF2 digest, hex-encoded to 96 characters.

use subtle::ConstantTimeEq;

use super::kdf::{self, KEY_LEN, SALT_LEN};

/// Hash and verify the master password.
pub trait PasswordHasher {
    /// Hash `password` with a fresh salt.
    fn hash_password(&self, password: &str) -> String;

    /// Check `attempt` against a value produced by [`PasswordHasher::hash_password`].
    ///
    /// Never fails: malformed stored values simply do not verify.
    fn verify_password(&self, attempt: &str, stored_hex: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2PasswordHasher;

impl Pbkdf2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash_password(&self, password: &str) -> String {
        let salt = kdf::generate_salt();
        let digest = kdf::derive_key(password.as_bytes(), &salt);

        let mut record = Vec::with_capacity(SALT_LEN + KEY_LEN);
        record.extend_from_slice(&salt);
        record.extend_from_slice(&digest);
        hex::encode(record)
    }

    fn verify_password(&self, attempt: &str, stored_hex: &str) -> bool {
        let Ok(stored) = hex::decode(stored_hex.trim()) else {
            return false;
        };
        if stored.len() != SALT_LEN + KEY_LEN {
            return false;
        }

        let (salt, expected) = stored.split_at(SALT_LEN);
        let actual = kdf::derive_key(attempt.as_bytes(), salt);
        actual[..].ct_eq(expected).into()
    }
}
