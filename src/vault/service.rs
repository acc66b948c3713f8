//! Business logic over the decrypted credential map.
//!
//! `VaultService` loads the vault once at construction and owns the map
//! from then on.  Every mutation is written through to the repository
//! before it becomes visible in memory: the new map is built on the side,
//! saved, and only then swapped in, so a failed write leaves both copies
//! as they were.

use serde_json::{Map, Value};
use tracing::debug;
use zeroize::Zeroizing;

use super::credential::{service_key, Credential, CredentialMap};
use super::repository::VaultRepository;
use super::search::partial_ratio;
use crate::errors::Result;

/// Minimum [`partial_ratio`] score (exclusive) for a search hit.
pub const SEARCH_THRESHOLD: u8 = 60;

pub struct VaultService<R: VaultRepository> {
    repo: R,
    password: Zeroizing<String>,
    credentials: CredentialMap,
}

impl<R: VaultRepository> VaultService<R> {
    /// Load the vault behind `repo` with `master_password`.
    ///
    /// Propagates [`crate::errors::VaultError::AuthenticationFailed`] when
    /// the password does not open an existing vault.
    pub fn open(repo: R, master_password: &str) -> Result<Self> {
        let credentials = repo.load_data(master_password)?;
        Ok(Self {
            repo,
            password: Zeroizing::new(master_password.to_string()),
            credentials,
        })
    }

    fn commit(&mut self, next: CredentialMap) -> Result<()> {
        self.repo.save_data(&next, &self.password)?;
        self.credentials = next;
        Ok(())
    }

    /// Add a credential.  Returns `false` if the service already exists.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<bool> {
        let key = service_key(service);
        if self.credentials.contains_key(&key) {
            return Ok(false);
        }

        let mut next = self.credentials.clone();
        next.insert(key, Credential::new(service, username, password));
        self.commit(next)?;
        debug!(service, "credential added");
        Ok(true)
    }

    /// Case-insensitive lookup; returns a copy.
    pub fn get(&self, service: &str) -> Option<Credential> {
        self.credentials.get(&service_key(service)).cloned()
    }

    /// Change the username and/or password of an existing credential.
    ///
    /// `None` or an empty string keeps the current value.  Returns `false`
    /// if the service does not exist.
    pub fn update(
        &mut self,
        service: &str,
        new_username: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<bool> {
        let key = service_key(service);
        let Some(current) = self.credentials.get(&key) else {
            return Ok(false);
        };

        let mut updated = current.clone();
        if let Some(user) = new_username.filter(|u| !u.is_empty()) {
            updated.username = user.to_string();
        }
        if let Some(pass) = new_password.filter(|p| !p.is_empty()) {
            updated.password = pass.to_string();
        }
        if &updated == current {
            return Ok(true);
        }

        let mut next = self.credentials.clone();
        next.insert(key, updated);
        self.commit(next)?;
        debug!(service, "credential updated");
        Ok(true)
    }

    /// Remove a credential.  Returns `false` (and writes nothing) if absent.
    pub fn delete(&mut self, service: &str) -> Result<bool> {
        let key = service_key(service);
        if !self.credentials.contains_key(&key) {
            return Ok(false);
        }

        let mut next = self.credentials.clone();
        next.remove(&key);
        self.commit(next)?;
        debug!(service, "credential deleted");
        Ok(true)
    }

    /// Fuzzy partial match of `query` against service names.
    ///
    /// Returns every credential scoring above [`SEARCH_THRESHOLD`], keyed
    /// by service key.  No ranking is implied.
    pub fn search(&self, query: &str) -> CredentialMap {
        let query = query.to_lowercase();
        self.credentials
            .iter()
            .filter(|(_, cred)| {
                partial_ratio(&query, &cred.service_name.to_lowercase()) > SEARCH_THRESHOLD
            })
            .map(|(key, cred)| (key.clone(), cred.clone()))
            .collect()
    }

    /// All credentials, keyed by service key.
    pub fn list(&self) -> &CredentialMap {
        &self.credentials
    }

    /// Re-encrypt the vault under `new_password` and adopt it.
    ///
    /// The master-hash record is not touched here; see
    /// [`crate::auth::rotation::rotate_master_password`] for the combined
    /// operation.
    pub fn change_master_password(&mut self, new_password: &str) -> Result<bool> {
        self.repo.rotate_encryption(&self.credentials, new_password)?;
        self.password = Zeroizing::new(new_password.to_string());
        Ok(true)
    }

    /// Merge records from an untrusted map.
    ///
    /// Only objects carrying string `username` and `password` fields are
    /// taken; anything else is skipped.  Records are keyed by their own
    /// service name, not the incoming key, and existing entries are
    /// overwritten.  Returns whether anything was imported and how many
    /// records were.
    pub fn import_credentials(&mut self, incoming: &Map<String, Value>) -> Result<(bool, usize)> {
        let mut next = self.credentials.clone();
        let mut count = 0;

        for (key, details) in incoming {
            if let Some(cred) = credential_from_value(key, details) {
                next.insert(service_key(&cred.service_name), cred);
                count += 1;
            } else {
                debug!(key = %key, "skipping malformed import entry");
            }
        }

        if count == 0 {
            return Ok((false, 0));
        }
        self.commit(next)?;
        Ok((true, count))
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

fn credential_from_value(key: &str, details: &Value) -> Option<Credential> {
    let fields = details.as_object()?;
    let username = fields.get("username")?.as_str()?;
    let password = fields.get("password")?.as_str()?;
    let service_name = fields
        .get("service_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(key);
    Some(Credential::new(service_name, username, password))
}
