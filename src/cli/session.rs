//! Wiring: data-directory layout, login, and the unlocked vault handed to
//! commands.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::audit::AuditService;
use crate::auth::{
    verify_with_recovery, AuthenticationService, FileMasterHashRepository, RecoveryOutcome,
};
use crate::cli::{prompt_new_password, prompt_password, UserIo, PASSWORD_ENV};
use crate::config::ConfigurationService;
use crate::crypto::Pbkdf2PasswordHasher;
use crate::errors::{Result, VaultError};
use crate::vault::{FileVaultRepository, LegacyListMigrator, VaultService};

/// Master-hash file inside the data directory.
pub const HASH_FILE: &str = "master.hash";

/// Config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Services rooted at one data directory.
pub struct Context {
    data_dir: PathBuf,
    pub config: ConfigurationService,
    pub auth: AuthenticationService,
    pub audit: AuditService,
}

impl Context {
    /// Build the services for `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            config: ConfigurationService::new(data_dir.join(CONFIG_FILE), &data_dir),
            auth: AuthenticationService::new(
                FileMasterHashRepository::new(data_dir.join(HASH_FILE)),
                Pbkdf2PasswordHasher::new(),
            ),
            audit: AuditService::new(&data_dir),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The vault file to operate on: the `-f` override, else the active one.
    pub fn vault_path(&self, file_override: Option<&Path>) -> PathBuf {
        match file_override {
            Some(path) => path.to_path_buf(),
            None => self.config.get_active_vault(),
        }
    }

    /// Repository for the vault at `path`, upgrading legacy payloads on load.
    pub fn repository(&self, path: impl Into<PathBuf>) -> FileVaultRepository {
        FileVaultRepository::with_defaults(path).with_migrator(LegacyListMigrator)
    }

    /// Log in (or run first-time setup) and unlock the vault.
    pub fn open_session<'a>(
        &'a self,
        io: &'a dyn UserIo,
        file_override: Option<&Path>,
    ) -> Result<Session<'a>> {
        let path = self.vault_path(file_override);
        let vault_name = ConfigurationService::display_name(&path);
        let repo = self.repository(&path);

        io.show_header(&vault_name);
        let password = self.authenticate(io)?;

        debug!(vault = %path.display(), "opening vault");
        let vault = VaultService::open(repo, &password)?;

        Ok(Session {
            ctx: self,
            io,
            vault,
            vault_name,
        })
    }

    /// Obtain a verified master password.
    ///
    /// With no master hash on disk this is first-time setup: the password
    /// is chosen, confirmed and stored.  Otherwise the attempt is checked,
    /// finishing any interrupted password change first.  That recovery
    /// probes the vault the change was rotating, which need not be the one
    /// being opened.
    pub fn authenticate(&self, io: &dyn UserIo) -> Result<Zeroizing<String>> {
        if !self.auth.has_master_hash() {
            return self.first_time_setup(io);
        }

        let attempt = prompt_password(io, "Enter master password")?;
        let check = verify_with_recovery(&self.auth, &attempt, |path: &Path| {
            self.repository(path)
        })?;

        match check.recovery {
            RecoveryOutcome::Committed => self
                .audit
                .log_event("RECOVERY", "Completed interrupted master password change"),
            RecoveryOutcome::RolledBack => self
                .audit
                .log_event("RECOVERY", "Rolled back interrupted master password change"),
            _ => {}
        }

        if !check.granted {
            self.audit.log_event("LOGIN_FAILED", "Invalid master password");
            return Err(VaultError::AccessDenied);
        }

        self.audit.log_event("LOGIN", "Access granted");
        Ok(attempt)
    }

    fn first_time_setup(&self, io: &dyn UserIo) -> Result<Zeroizing<String>> {
        io.show_warning("No master password found. Starting first-time setup...");
        io.show_info("Your typing will be hidden for security.");

        let password = prompt_new_password(io, PASSWORD_ENV, "Create a new master password")?;
        if !self.auth.create_master_hash(&password) {
            return Err(VaultError::CommandFailed(
                "failed to save master password".into(),
            ));
        }

        self.audit.log_event("SETUP", "Master password created");
        io.show_success("Master password has been set up successfully!");
        Ok(password)
    }
}

/// An authenticated, unlocked vault plus the collaborators commands need.
pub struct Session<'a> {
    pub ctx: &'a Context,
    pub io: &'a dyn UserIo,
    pub vault: VaultService<FileVaultRepository>,
    pub vault_name: String,
}

impl Session<'_> {
    /// Path of the unlocked vault file.
    pub fn vault_path(&self) -> &Path {
        self.vault.repository().path()
    }

    /// Shorthand for the context's audit log.
    pub fn audit(&self, action: &str, details: &str) {
        self.ctx.audit.log_event(action, details);
    }
}
