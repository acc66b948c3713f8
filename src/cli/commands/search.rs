//! `credvault search` — fuzzy match on service names.

use crate::cli::Session;
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(session: &mut Session<'_>, query: &str) -> Result<()> {
    let matches = session.vault.search(query);
    session.audit("SEARCH", &format!("'{query}' matched {}", matches.len()));
    session.io.show_search_results(&matches, query);
    Ok(())
}
