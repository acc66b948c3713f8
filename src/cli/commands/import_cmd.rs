//! `credvault import` — merge credentials from a plaintext JSON file.
//!
//! The file must be a JSON object keyed by service:
//!
//! ```json
//! { "github": { "service_name": "GitHub", "username": "octo", "password": "..." } }
//! ```
//!
//! Entries without string `username` and `password` are skipped.  Existing
//! services are overwritten.

use std::path::Path;

use crate::cli::Session;
use crate::errors::Result;
use crate::vault::transfer::import_from_file;

/// Execute the `import` command.
pub fn execute(session: &mut Session<'_>, path: &Path) -> Result<()> {
    let io = session.io;

    let (_, count) = import_from_file(&mut session.vault, path)?;
    if count == 0 {
        io.show_warning("No valid credentials found in the import file.");
        return Ok(());
    }

    session.audit(
        "IMPORT",
        &format!("{count} credentials imported from {}", path.display()),
    );
    io.show_success(&format!(
        "Imported {count} credentials ({} total)",
        session.vault.len()
    ));
    Ok(())
}
