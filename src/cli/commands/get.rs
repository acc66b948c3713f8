//! `credvault get` — copy a service's password to the clipboard.

use crate::cli::{Clipboard, Session};
use crate::errors::Result;

/// Execute the `get` command.
///
/// The password is never printed.
pub fn execute(session: &mut Session<'_>, clipboard: &dyn Clipboard, service: &str) -> Result<()> {
    let io = session.io;

    let Some(cred) = session.vault.get(service) else {
        io.show_warning(&format!("Service '{service}' not found."));
        return Ok(());
    };

    clipboard.copy(&cred.password)?;
    session.audit("GET", &format!("Password for {} copied", cred.service_name));
    io.show_success(&format!(
        "Password for {} copied to clipboard.",
        cred.service_name
    ));
    Ok(())
}
