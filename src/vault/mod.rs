//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `Credential` and the keyed `CredentialMap` (`credential`)
//! - Legacy payload migration (`migration`)
//! - Encrypted file persistence (`repository`)
//! - Fuzzy name matching (`search`)
//! - CRUD, search, import and rotation over the map (`service`)
//! - Plaintext JSON export/import (`transfer`)

pub mod credential;
pub mod migration;
pub mod repository;
pub mod search;
pub mod service;
pub mod transfer;

// Re-export the most commonly used items.
pub use credential::{service_key, Credential, CredentialMap};
pub use migration::{DataMigrator, LegacyListMigrator, Migration};
pub use repository::{FileVaultRepository, VaultProbe, VaultRepository};
pub use service::VaultService;
