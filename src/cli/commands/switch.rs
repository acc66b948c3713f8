//! `credvault switch` — change which vault file is active.
//!
//! Needs no master password: only the config file is touched.

use crate::cli::{Context, UserIo};
use crate::config::ConfigurationService;
use crate::errors::Result;

/// Execute the `switch` command.
pub fn execute(ctx: &Context, io: &dyn UserIo, vault: &str) -> Result<()> {
    let path = ctx.config.set_active_vault(vault)?;

    io.show_header(&ConfigurationService::display_name(&path));
    ctx.audit
        .log_event("SWITCH", &format!("Active vault set to {}", path.display()));
    io.show_success(&format!("Switched active vault to: {}", path.display()));
    Ok(())
}
