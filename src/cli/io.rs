//! User interaction seam.
//!
//! Commands talk to the terminal only through [`UserIo`], so they can be
//! driven by a scripted implementation in tests.

use std::io::{self, BufRead, IsTerminal, Write};

use zeroize::Zeroizing;

use crate::audit::AuditEntry;
use crate::cli::output;
use crate::errors::{Result, VaultError};
use crate::vault::CredentialMap;

/// Prompts and rendering used by the commands.
pub trait UserIo {
    /// Read a line of visible input.  May be empty.
    fn get_input(&self, prompt: &str) -> Result<String>;

    /// Read a line of hidden input.  May be empty.
    fn get_password(&self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    fn show_header(&self, vault_name: &str);
    fn show_info(&self, msg: &str);
    fn show_warning(&self, msg: &str);
    fn show_error(&self, msg: &str);
    fn show_success(&self, msg: &str);

    fn show_credentials(&self, credentials: &CredentialMap);
    fn show_search_results(&self, matches: &CredentialMap, query: &str);
    fn show_audit(&self, entries: &[AuditEntry]);
}

/// Terminal implementation of [`UserIo`].
///
/// Prompts go through `dialoguer` when stdin is a terminal.  When stdin is
/// piped, each prompt consumes one line of it instead, so the binary can be
/// scripted.
pub struct ConsoleIo {
    interactive: bool,
}

impl ConsoleIo {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_piped_line(&self, prompt: &str) -> Result<String> {
        eprint!("{prompt}: ");
        let _ = io::stderr().flush();

        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            eprintln!();
            return Err(VaultError::UserCancelled);
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for ConsoleIo {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_failed(e: dialoguer::Error) -> VaultError {
    VaultError::CommandFailed(format!("input prompt: {e}"))
}

impl UserIo for ConsoleIo {
    fn get_input(&self, prompt: &str) -> Result<String> {
        if !self.interactive {
            return self.read_piped_line(prompt);
        }
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_failed)
    }

    fn get_password(&self, prompt: &str) -> Result<Zeroizing<String>> {
        if !self.interactive {
            return self.read_piped_line(prompt).map(Zeroizing::new);
        }
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Zeroizing::new)
            .map_err(prompt_failed)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            let answer = self.read_piped_line(&format!("{prompt} [y/n]"))?;
            return Ok(match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => true,
                "n" | "no" => false,
                _ => default,
            });
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_failed)
    }

    fn show_header(&self, vault_name: &str) {
        output::header(vault_name);
    }

    fn show_info(&self, msg: &str) {
        output::info(msg);
    }

    fn show_warning(&self, msg: &str) {
        output::warning(msg);
    }

    fn show_error(&self, msg: &str) {
        output::error(msg);
    }

    fn show_success(&self, msg: &str) {
        output::success(msg);
    }

    fn show_credentials(&self, credentials: &CredentialMap) {
        if credentials.is_empty() {
            output::warning("Vault is empty.");
            output::tip("Run `credvault add <SERVICE>` to add your first credential.");
            return;
        }
        output::print_credentials_table("Vault Contents", credentials);
    }

    fn show_search_results(&self, matches: &CredentialMap, query: &str) {
        if matches.is_empty() {
            output::warning(&format!("No credentials found matching '{query}'."));
            return;
        }
        output::print_credentials_table(&format!("Search Results: '{query}'"), matches);
    }

    fn show_audit(&self, entries: &[AuditEntry]) {
        if entries.is_empty() {
            output::info("No audit entries found.");
            return;
        }
        output::print_audit_table(entries);
    }
}
