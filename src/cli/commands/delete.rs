//! `credvault delete` — remove a credential from the vault.

use crate::cli::Session;
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(session: &mut Session<'_>, service: &str, force: bool) -> Result<()> {
    let io = session.io;

    let Some(cred) = session.vault.get(service) else {
        io.show_warning(&format!("Service '{service}' not found."));
        return Ok(());
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !io.confirm(&format!("Delete credential for {}?", cred.service_name), false)? {
        io.show_info("Cancelled.");
        return Ok(());
    }

    if session.vault.delete(service)? {
        session.audit("DELETE", &format!("Credential for {} deleted", cred.service_name));
        io.show_success(&format!("Credential for {} deleted.", cred.service_name));
    }
    Ok(())
}
