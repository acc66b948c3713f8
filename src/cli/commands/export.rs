//! `credvault export` — write the decrypted vault to a plaintext JSON file.

use std::path::Path;

use crate::cli::Session;
use crate::errors::Result;
use crate::vault::transfer::export_to_file;

/// Execute the `export` command.
///
/// Without `yes`, the user must confirm writing plaintext passwords.
pub fn execute(session: &mut Session<'_>, path: &Path, yes: bool) -> Result<()> {
    let io = session.io;

    io.show_warning("The export file will contain every password in PLAINTEXT.");
    if !yes && !io.confirm("Write plaintext export?", false)? {
        io.show_info("Cancelled.");
        return Ok(());
    }

    let count = export_to_file(&session.vault, path, session.vault_path())?;

    session.audit(
        "EXPORT",
        &format!("{count} credentials exported to {}", path.display()),
    );
    io.show_success(&format!(
        "Exported {count} credentials to {}",
        path.display()
    ));
    Ok(())
}
