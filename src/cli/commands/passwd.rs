//! `credvault passwd` — change the master password.
//!
//! Re-encrypts the open vault under the new password and replaces the
//! master hash, in the crash-safe order described in
//! [`crate::auth::rotation`].

use crate::auth::rotate_master_password;
use crate::cli::{prompt_new_password, Session, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(session: &mut Session<'_>) -> Result<()> {
    let io = session.io;

    let new_password = prompt_new_password(io, NEW_PASSWORD_ENV, "Enter NEW master password")?;
    rotate_master_password(&mut session.vault, &session.ctx.auth, &new_password)?;

    session.audit(
        "PASSWD",
        &format!("Master password changed ({} credentials re-encrypted)", session.vault.len()),
    );
    io.show_success("Master password changed successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::io::testing::ScriptedIo;
    use crate::cli::session::testing::{context, session};
    use crate::errors::VaultError;
    use crate::vault::VaultService;

    #[test]
    fn rotates_vault_and_hash() {
        let (_dir, ctx) = context();
        let io = ScriptedIo::new(&["changed", "changed"]);
        let mut s = session(&ctx, &io);
        s.vault.add("GitHub", "octo", "p1").unwrap();

        execute(&mut s).unwrap();

        assert!(ctx.auth.verify_password("changed"));
        assert!(!ctx.auth.verify_password("master"));
        let reopened =
            VaultService::open(ctx.repository(ctx.vault_path(None)), "changed").unwrap();
        assert_eq!(reopened.get("github").unwrap().password, "p1");
        assert_eq!(ctx.audit.get_parsed_logs(1)[0].action, "PASSWD");
    }

    #[test]
    fn mismatch_changes_nothing() {
        let (_dir, ctx) = context();
        let io = ScriptedIo::new(&["one", "two"]);
        let mut s = session(&ctx, &io);
        s.vault.add("GitHub", "octo", "p1").unwrap();

        assert!(matches!(execute(&mut s), Err(VaultError::PasswordMismatch)));
        assert!(ctx.auth.verify_password("master"));
        assert!(VaultService::open(ctx.repository(ctx.vault_path(None)), "master").is_ok());
    }
}
