use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use credvault::cli::{execute, output, Cli, ConsoleIo, SystemClipboard};
use credvault::errors::VaultError;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with command output.
    let filter = EnvFilter::try_from_env("CREDVAULT_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("credvault=debug")
        } else {
            EnvFilter::new("credvault=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(&cli, &ConsoleIo::new(), &SystemClipboard) {
        match e {
            VaultError::AccessDenied => output::error("ACCESS DENIED"),
            VaultError::UserCancelled => output::error("Cancelled."),
            e => output::error(&e.to_string()),
        }
        std::process::exit(1);
    }
}
