//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::style;

use crate::audit::AuditEntry;
use crate::vault::CredentialMap;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the banner naming the vault in use.
pub fn header(vault_name: &str) {
    let rule = "=+~+=".repeat(2);
    println!(
        "{} {} {}",
        style(&rule).blue(),
        style(format!("Credential Vault : {vault_name}")).cyan().bold(),
        style(&rule).blue()
    );
}

/// Print a Service/Username table, sorted by service key.
pub fn print_credentials_table(title: &str, credentials: &CredentialMap) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Username"]);

    for cred in credentials.values() {
        table.add_row(vec![
            Cell::new(&cred.service_name).fg(Color::Green),
            Cell::new(&cred.username).fg(Color::Magenta),
        ]);
    }

    println!("{}", style(title).cyan().bold());
    println!("{table}");
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Action", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.clone(),
            colorize_action(&entry.action),
            entry.details.clone(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize action names for display.
fn colorize_action(action: &str) -> String {
    match action {
        "SETUP" | "ADD" | "IMPORT" => style(action).green().to_string(),
        "UPDATE" | "SWITCH" => style(action).blue().to_string(),
        "DELETE" | "LOGIN_FAILED" => style(action).red().to_string(),
        "PASSWD" | "RECOVERY" => style(action).yellow().to_string(),
        "GET" | "EXPORT" => style(action).cyan().to_string(),
        _ => action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_action_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(colorize_action("ADD"), "ADD");
        assert_eq!(colorize_action("SOMETHING"), "SOMETHING");
    }
}
