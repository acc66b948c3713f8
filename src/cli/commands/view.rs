//! `credvault view` — list every credential (service and username).

use crate::cli::Session;
use crate::errors::Result;

/// Execute the `view` command.  Passwords are not shown.
pub fn execute(session: &mut Session<'_>) -> Result<()> {
    session.io.show_credentials(session.vault.list());
    session.audit("VIEW", &format!("{} credentials listed", session.vault.len()));
    Ok(())
}
