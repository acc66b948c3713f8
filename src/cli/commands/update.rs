//! `credvault update` — change a credential's username and/or password.

use crate::cli::Session;
use crate::errors::Result;

/// Execute the `update` command.
///
/// Empty answers keep the current value.
pub fn execute(session: &mut Session<'_>, service: &str) -> Result<()> {
    let io = session.io;

    let Some(current) = session.vault.get(service) else {
        io.show_warning(&format!(
            "Service '{service}' not found. Use 'add' to create it."
        ));
        return Ok(());
    };

    io.show_info(&format!(
        "Updating {}. Press Enter to keep current values.",
        current.service_name
    ));
    io.show_info(&format!("Current username: {}", current.username));

    let new_user = io.get_input("New username")?;
    let new_pass = io.get_password("New password")?;

    if new_user.is_empty() && new_pass.is_empty() {
        io.show_info("No changes made.");
        return Ok(());
    }

    let new_user = (!new_user.is_empty()).then_some(new_user.as_str());
    let new_pass = (!new_pass.is_empty()).then_some(new_pass.as_str());

    if session.vault.update(service, new_user, new_pass)? {
        session.audit(
            "UPDATE",
            &format!("Credential for {} updated", current.service_name),
        );
        io.show_success(&format!("Updated {}.", current.service_name));
    } else {
        io.show_error("Update failed.");
    }
    Ok(())
}
