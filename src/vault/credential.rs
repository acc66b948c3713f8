//! Credential records and the keyed store they live in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The decrypted vault contents: `service_key -> Credential`.
///
/// A `BTreeMap` keeps the serialized JSON stable across saves.
pub type CredentialMap = BTreeMap<String, Credential>;

/// A single username/password record for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Display name with the casing the user first typed (e.g. "GitHub").
    pub service_name: String,
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(
        service_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// The lookup key for this record.
    pub fn key(&self) -> String {
        service_key(&self.service_name)
    }
}

/// Normalize a service name into its lookup key.
pub fn service_key(service: &str) -> String {
    service.to_lowercase()
}
