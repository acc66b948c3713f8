//! `credvault add` — store a new credential.

use zeroize::Zeroizing;

use crate::cli::Session;
use crate::crypto::{check_password, generate_password};
use crate::errors::Result;

/// Execute the `add` command.
///
/// With `generate = Some(len)` a random password of that length is used
/// instead of prompting.
pub fn execute(session: &mut Session<'_>, service: &str, generate: Option<usize>) -> Result<()> {
    let io = session.io;

    if session.vault.get(service).is_some() {
        io.show_error(&format!(
            "Service '{service}' already exists. Use 'update' to change it."
        ));
        return Ok(());
    }

    let username = io.get_input(&format!("Enter username for {service}"))?;
    let password = match generate {
        Some(length) => {
            io.show_info(&format!("Generated a {length}-character password."));
            Zeroizing::new(generate_password(length, true, true))
        }
        None => read_acceptable_password(session)?,
    };

    if session.vault.add(service, &username, &password)? {
        session.audit("ADD", &format!("Credential for {service} added"));
        io.show_success(&format!("Credential for {service} added."));
    } else {
        io.show_error(&format!("Service '{service}' already exists."));
    }
    Ok(())
}

/// Prompt until the password passes the strength check or the user keeps a
/// weak one.
fn read_acceptable_password(session: &Session<'_>) -> Result<Zeroizing<String>> {
    let io = session.io;
    loop {
        let password = io.get_password("Enter password")?;
        if password.is_empty() {
            io.show_warning("Password cannot be empty.");
            continue;
        }

        let check = check_password(&password);
        if check.passed {
            return Ok(password);
        }

        io.show_warning(&format!("Weak password: {}", check.feedback.join(", ")));
        if io.confirm("Keep weak password?", false)? {
            return Ok(password);
        }
    }
}
