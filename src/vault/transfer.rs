//! Plaintext JSON export and import of the credential map.
//!
//! Exported files are **not encrypted**.  Callers are expected to obtain
//! explicit confirmation before calling [`export_to_file`].

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::repository::VaultRepository;
use super::service::VaultService;
use crate::errors::{Result, VaultError};
use crate::fsutil;

/// Write the decrypted map to `path` as pretty-printed JSON.
///
/// Returns the number of records written.  Refuses to write over
/// `protected`, which should be the active vault file.
pub fn export_to_file<R: VaultRepository>(
    vault: &VaultService<R>,
    path: &Path,
    protected: &Path,
) -> Result<usize> {
    if same_file(path, protected) {
        return Err(VaultError::CommandFailed(
            "refusing to export over the vault file".into(),
        ));
    }

    let json = serde_json::to_string_pretty(vault.list())?;
    fsutil::write_atomic(path, json.as_bytes())?;
    Ok(vault.len())
}

/// Merge the records in the JSON file at `path` into `vault`.
///
/// The file must hold a JSON object; individual entries that are not
/// `{username, password, ...}` objects are skipped.
pub fn import_from_file<R: VaultRepository>(
    vault: &mut VaultService<R>,
    path: &Path,
) -> Result<(bool, usize)> {
    if !path.exists() {
        return Err(VaultError::CommandFailed(format!(
            "import file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| VaultError::Serialization(format!("invalid JSON: {e}")))?;
    let Value::Object(map) = value else {
        return Err(VaultError::Serialization(
            "import file must contain a JSON object".into(),
        ));
    };

    vault.import_credentials(&map)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
