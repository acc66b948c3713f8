//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - AES-256-GCM sealing with a raw key (`encryption`)
//! - Password-keyed vault payload encryption (`encryptor`)
//! - Master-password hashing (`hasher`)
//! - Random password generation and a pass/fail strength check (`password`)

pub mod encryption;
pub mod encryptor;
pub mod hasher;
pub mod kdf;
pub mod password;

pub use encryptor::{AesGcmDataEncryptor, DataEncryptor};
pub use hasher::{Pbkdf2PasswordHasher, PasswordHasher};
pub use kdf::{derive_key, generate_salt};
pub use password::{check_password, generate_password, PasswordCheck};
