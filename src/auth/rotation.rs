//! Master-password rotation across the vault file and the master hash.
//!
//! The two records are written by separate atomic renames, in this order:
//!
//! 1. the new hash is staged in `master.hash.pending`, naming the vault
//!    being rotated;
//! 2. that vault is re-encrypted under the new password;
//! 3. the pending hash replaces `master.hash`.
//!
//! The vault rename in step 2 is the commit point.  If the process dies
//! before it, the old password still opens everything and the pending file
//! is discarded at the next login.  If it dies after it, the next login
//! with the new password finishes step 3.  [`recover_interrupted_rotation`]
//! decides which case applies by probing the staged vault with the
//! attempted password, whichever vault the login itself is for.

use std::path::Path;

use tracing::{info, warn};

use super::service::AuthenticationService;
use crate::errors::Result;
use crate::vault::{VaultProbe, VaultRepository, VaultService};

/// What [`recover_interrupted_rotation`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No rotation was in progress.
    NothingPending,
    /// The vault had been rotated; the staged hash is now the master hash.
    Committed,
    /// The vault had not been rotated; the staged hash was dropped.
    RolledBack,
    /// The attempt is the old password but the vault has already moved to
    /// the new one.  The staged hash is kept and the attempt must be denied.
    Superseded,
    /// The attempt matches neither hash; nothing was changed.
    NoMatch,
}

/// Change the master password for both the vault and the master hash.
pub fn rotate_master_password<R: VaultRepository>(
    vault: &mut VaultService<R>,
    auth: &AuthenticationService,
    new_password: &str,
) -> Result<()> {
    auth.stage_master_hash(new_password, vault.repository().location())?;

    if let Err(e) = vault.change_master_password(new_password) {
        if let Err(discard) = auth.discard_staged() {
            warn!(error = %discard, "could not discard staged master hash");
        }
        return Err(e);
    }

    auth.commit_staged()?;
    info!(count = vault.len(), "master password rotated");
    Ok(())
}

/// Resolve a rotation left half-finished, using the password being tried.
///
/// `open_vault` builds a repository for the vault recorded with the staged
/// hash.  Only a password that actually opens that vault can settle which
/// state the system is in, so this runs at login before the normal hash
/// check.
pub fn recover_interrupted_rotation<R, F>(
    auth: &AuthenticationService,
    attempt: &str,
    open_vault: F,
) -> Result<RecoveryOutcome>
where
    R: VaultRepository,
    F: FnOnce(&Path) -> R,
{
    let Some(target) = auth.staged_vault() else {
        return Ok(RecoveryOutcome::NothingPending);
    };
    let vault = open_vault(&target);

    if auth.verify_staged(attempt) {
        return match vault.probe(attempt)? {
            VaultProbe::Unlocks => {
                auth.commit_staged()?;
                info!(vault = %target.display(), "completed interrupted master password rotation");
                Ok(RecoveryOutcome::Committed)
            }
            VaultProbe::Missing | VaultProbe::Locked => {
                auth.discard_staged()?;
                info!(vault = %target.display(), "rolled back interrupted master password rotation");
                Ok(RecoveryOutcome::RolledBack)
            }
        };
    }

    if auth.verify_password(attempt) {
        return match vault.probe(attempt)? {
            VaultProbe::Missing | VaultProbe::Unlocks => {
                auth.discard_staged()?;
                info!(vault = %target.display(), "rolled back interrupted master password rotation");
                Ok(RecoveryOutcome::RolledBack)
            }
            VaultProbe::Locked => {
                warn!(vault = %target.display(), "old master password used after vault was rotated");
                Ok(RecoveryOutcome::Superseded)
            }
        };
    }

    Ok(RecoveryOutcome::NoMatch)
}

/// Result of [`verify_with_recovery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginCheck {
    pub granted: bool,
    pub recovery: RecoveryOutcome,
}

/// Log in with `attempt`, finishing any interrupted rotation first.
pub fn verify_with_recovery<R, F>(
    auth: &AuthenticationService,
    attempt: &str,
    open_vault: F,
) -> Result<LoginCheck>
where
    R: VaultRepository,
    F: FnOnce(&Path) -> R,
{
    let recovery = recover_interrupted_rotation(auth, attempt, open_vault)?;
    let granted = match recovery {
        RecoveryOutcome::Superseded => false,
        _ => auth.verify_password(attempt),
    };
    Ok(LoginCheck { granted, recovery })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::FileMasterHashRepository;
    use crate::crypto::Pbkdf2PasswordHasher;
    use crate::errors::VaultError;
    use crate::vault::FileVaultRepository;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        auth: AuthenticationService,
        vault_path: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let auth = AuthenticationService::new(
                FileMasterHashRepository::new(dir.path().join("master.hash")),
                Pbkdf2PasswordHasher::new(),
            );
            assert!(auth.create_master_hash("old"));
            let vault_path = dir.path().join("credentials.json");

            let mut vault =
                VaultService::open(FileVaultRepository::with_defaults(&vault_path), "old").unwrap();
            vault.add("GitHub", "octo", "p1").unwrap();

            Self {
                _dir: dir,
                auth,
                vault_path,
            }
        }

        fn repo(&self) -> FileVaultRepository {
            FileVaultRepository::with_defaults(&self.vault_path)
        }

        fn stage(&self, password: &str) {
            self.auth.stage_master_hash(password, &self.vault_path).unwrap();
        }

        fn recover(&self, attempt: &str) -> RecoveryOutcome {
            recover_interrupted_rotation(&self.auth, attempt, |path: &Path| {
                FileVaultRepository::with_defaults(path)
            })
            .unwrap()
        }

        fn login(&self, attempt: &str) -> bool {
            verify_with_recovery(&self.auth, attempt, |path: &Path| {
                FileVaultRepository::with_defaults(path)
            })
            .unwrap()
            .granted
        }
    }

    #[test]
    fn full_rotation_moves_both_records() {
        let fx = Fixture::new();
        let mut vault = VaultService::open(fx.repo(), "old").unwrap();

        rotate_master_password(&mut vault, &fx.auth, "new").unwrap();

        assert!(fx.auth.verify_password("new"));
        assert!(!fx.auth.verify_password("old"));
        assert!(!fx.auth.has_staged());
        assert!(VaultService::open(fx.repo(), "new").is_ok());
        assert!(matches!(
            VaultService::open(fx.repo(), "old"),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn crash_before_vault_write_keeps_old_password() {
        let fx = Fixture::new();
        // Step 1 done, step 2 never happened.
        fx.stage("new");

        // The new password must not get in.
        assert!(!fx.login("new"));
        assert!(!fx.auth.has_staged());

        assert!(fx.login("old"));
        assert!(VaultService::open(fx.repo(), "old").is_ok());
    }

    #[test]
    fn crash_before_vault_write_recovered_by_old_password() {
        let fx = Fixture::new();
        fx.stage("new");

        assert_eq!(fx.recover("old"), RecoveryOutcome::RolledBack);
        assert!(fx.auth.verify_password("old"));
    }

    #[test]
    fn crash_after_vault_write_completes_with_new_password() {
        let fx = Fixture::new();
        // Steps 1 and 2 done, step 3 never happened.
        fx.stage("new");
        let mut vault = VaultService::open(fx.repo(), "old").unwrap();
        vault.change_master_password("new").unwrap();

        // Old password passes the stale hash but no longer opens the vault.
        assert_eq!(fx.recover("old"), RecoveryOutcome::Superseded);
        assert!(!fx.login("old"));
        assert!(fx.auth.has_staged());

        // New password finishes the commit.
        assert!(fx.login("new"));
        assert!(!fx.auth.has_staged());
        assert!(fx.auth.verify_password("new"));
        assert!(!fx.auth.verify_password("old"));
    }

    #[test]
    fn unrelated_password_changes_nothing() {
        let fx = Fixture::new();
        fx.stage("new");

        assert_eq!(fx.recover("guess"), RecoveryOutcome::NoMatch);
        assert!(fx.auth.has_staged());
    }

    #[test]
    fn nothing_pending_is_plain_verification() {
        let fx = Fixture::new();
        assert_eq!(fx.recover("old"), RecoveryOutcome::NothingPending);
        assert!(fx.login("old"));
    }

    #[test]
    fn recovery_probes_the_rotated_vault_not_the_one_being_opened() {
        let fx = Fixture::new();
        let other_path = fx._dir.path().join("work.json");
        let mut other =
            VaultService::open(FileVaultRepository::with_defaults(&other_path), "old").unwrap();
        other.add("Netflix", "nf", "p2").unwrap();

        // Default vault rotated, then a crash before the hash commit.
        fx.stage("new");
        let mut vault = VaultService::open(fx.repo(), "old").unwrap();
        vault.change_master_password("new").unwrap();

        // Logging in to the untouched work vault with the old password must
        // not throw the staged hash away.
        let opened = std::cell::RefCell::new(Vec::new());
        let check = verify_with_recovery(&fx.auth, "old", |path: &Path| {
            opened.borrow_mut().push(path.to_path_buf());
            FileVaultRepository::with_defaults(path)
        })
        .unwrap();
        assert_eq!(check.recovery, RecoveryOutcome::Superseded);
        assert!(!check.granted);
        assert_eq!(opened.into_inner(), vec![fx.vault_path.clone()]);
        assert!(fx.auth.has_staged());

        // The new password settles it and the rotated vault stays reachable.
        assert!(fx.login("new"));
        assert!(fx.auth.verify_password("new"));
        assert!(VaultService::open(fx.repo(), "new").is_ok());
    }
}
