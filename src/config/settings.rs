use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, VaultError};
use crate::fsutil;

/// File name of the vault used when nothing else is configured.
pub const DEFAULT_VAULT_FILE: &str = "credentials.json";

/// On-disk configuration record, stored as JSON.
///
/// Unknown keys are preserved so that saving never drops settings written
/// by a newer build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the vault that commands operate on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_vault: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Resolves which vault file is active.
#[derive(Debug, Clone)]
pub struct ConfigurationService {
    config_path: PathBuf,
    data_dir: PathBuf,
}

impl ConfigurationService {
    pub fn new(config_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            data_dir: data_dir.into(),
        }
    }

    /// `<data_dir>/credentials.json`.
    pub fn default_vault(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_VAULT_FILE)
    }

    /// Load the config file.
    ///
    /// A missing or unparsable file yields default settings; a corrupt file
    /// is reported through `tracing` and otherwise ignored.
    pub fn load(&self) -> Settings {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(c) => c,
            Err(_) => return Settings::default(),
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(
                path = %self.config_path.display(),
                error = %e,
                "ignoring unreadable config file"
            );
            Settings::default()
        })
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| VaultError::Config(format!("serialize config: {e}")))?;
        fsutil::write_atomic(&self.config_path, json.as_bytes())
    }

    /// The configured vault path, or the default one.
    pub fn get_active_vault(&self) -> PathBuf {
        self.load()
            .active_vault
            .unwrap_or_else(|| self.default_vault())
    }

    /// Make `vault_name` the active vault and return its resolved path.
    ///
    /// A name containing a path separator is used as a path verbatim.
    /// Otherwise it names a file in the data directory, with `.json`
    /// appended if missing.
    pub fn set_active_vault(&self, vault_name: &str) -> Result<PathBuf> {
        let path = self.resolve_vault(vault_name);

        let mut settings = self.load();
        settings.active_vault = Some(path.clone());
        self.save(&settings)?;

        Ok(path)
    }

    /// Resolve a vault name the same way [`Self::set_active_vault`] does.
    pub fn resolve_vault(&self, vault_name: &str) -> PathBuf {
        if vault_name.contains(MAIN_SEPARATOR) || vault_name.contains('/') {
            return PathBuf::from(vault_name);
        }
        if vault_name.ends_with(".json") {
            self.data_dir.join(vault_name)
        } else {
            self.data_dir.join(format!("{vault_name}.json"))
        }
    }

    /// Display name of the active vault.
    pub fn vault_display_name(&self) -> String {
        Self::display_name(&self.get_active_vault())
    }

    /// Human-friendly name of a vault path: the file stem, capitalized.
    ///
    /// Example: `data/work.json` -> `Work`.
    pub fn display_name(vault: &Path) -> String {
        let stem = vault
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let mut chars = stem.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
