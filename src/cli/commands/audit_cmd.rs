//! `credvault audit` — display the audit log.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20

use crate::cli::Session;
use crate::errors::Result;

/// Execute the `audit` command.
pub fn execute(session: &mut Session<'_>, last: usize) -> Result<()> {
    let entries = session.ctx.audit.get_parsed_logs(last);
    session.io.show_audit(&entries);
    Ok(())
}
