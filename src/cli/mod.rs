//! CLI module — Clap argument parser, terminal adapters, and command implementations.

pub mod clipboard;
pub mod commands;
pub mod io;
pub mod output;
pub mod session;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::crypto::password::DEFAULT_LENGTH;
use crate::errors::{Result, VaultError};

pub use clipboard::{Clipboard, SystemClipboard};
pub use io::{ConsoleIo, UserIo};
pub use session::{Context, Session};

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "CREDVAULT_PASSWORD";

/// Environment variable holding the replacement password for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "CREDVAULT_NEW_PASSWORD";

/// credvault CLI: encrypted local credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted local credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use this vault file instead of the active one
    #[arg(short = 'f', long, global = true, value_name = "FILEPATH")]
    pub file: Option<PathBuf>,

    /// Directory holding the master hash, config and audit log
    #[arg(long, env = "CREDVAULT_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a new credential
    Add {
        /// Service name (e.g. GitHub)
        service: String,
        /// Generate a random password instead of prompting for one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(short, long, default_value_t = DEFAULT_LENGTH, requires = "generate")]
        length: usize,
    },

    /// Copy a service's password to the clipboard
    Get {
        /// Service name
        service: String,
    },

    /// Delete a credential
    Delete {
        /// Service name
        service: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Update a credential's username and/or password
    Update {
        /// Service name
        service: String,
    },

    /// Fuzzy-search credentials by service name
    Search {
        /// Search text
        query: String,
    },

    /// Switch the active vault (name or path)
    Switch {
        /// Vault name (e.g. work) or path to a vault file
        vault: String,
    },

    /// View all credentials
    View,

    /// Change the master password
    Passwd,

    /// Export the decrypted vault to a plaintext JSON file
    Export {
        /// Destination file
        path: PathBuf,
        /// Skip the plaintext warning prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import credentials from a JSON file
    Import {
        /// Source file
        path: PathBuf,
    },

    /// View the audit log
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },
}

/// Run `cli.command` against the terminal adapters given.
///
/// `switch` runs without authentication; every other command logs in first.
pub fn execute(cli: &Cli, io: &dyn UserIo, clipboard: &dyn Clipboard) -> Result<()> {
    let ctx = Context::new(&cli.data_dir)?;

    if let Commands::Switch { vault } = &cli.command {
        return commands::switch::execute(&ctx, io, vault);
    }

    let mut session = ctx.open_session(io, cli.file.as_deref())?;
    dispatch(&mut session, &cli.command, clipboard)
}

fn dispatch(session: &mut Session<'_>, command: &Commands, clipboard: &dyn Clipboard) -> Result<()> {
    match command {
        Commands::Add {
            service,
            generate,
            length,
        } => commands::add::execute(session, service, generate.then_some(*length)),
        Commands::Get { service } => commands::get::execute(session, clipboard, service),
        Commands::Delete { service, force } => commands::delete::execute(session, service, *force),
        Commands::Update { service } => commands::update::execute(session, service),
        Commands::Search { query } => commands::search::execute(session, query),
        Commands::Switch { vault } => commands::switch::execute(session.ctx, session.io, vault),
        Commands::View => commands::view::execute(session),
        Commands::Passwd => commands::passwd::execute(session),
        Commands::Export { path, yes } => commands::export::execute(session, path, *yes),
        Commands::Import { path } => commands::import_cmd::execute(session, path),
        Commands::Audit { last } => commands::audit_cmd::execute(session, *last),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

fn env_password(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Get the master password, trying in order:
/// 1. `CREDVAULT_PASSWORD` env var (scripts, tests)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(io: &dyn UserIo, prompt: &str) -> Result<Zeroizing<String>> {
    match env_password(PASSWORD_ENV) {
        Some(pw) => Ok(pw),
        None => io.get_password(prompt),
    }
}

/// Prompt for a new master password with confirmation.
///
/// A non-empty `env_var` short-circuits the prompt.  Empty passwords are
/// rejected.
pub fn prompt_new_password(
    io: &dyn UserIo,
    env_var: &str,
    prompt: &str,
) -> Result<Zeroizing<String>> {
    let password = match env_password(env_var) {
        Some(pw) => pw,
        None => {
            let password = io.get_password(prompt)?;
            let confirm = io.get_password("Confirm master password")?;
            if *password != *confirm {
                return Err(VaultError::PasswordMismatch);
            }
            password
        }
    };

    if password.is_empty() {
        return Err(VaultError::CommandFailed("password cannot be empty".into()));
    }
    Ok(password)
}
