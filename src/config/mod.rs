//! Application configuration: which vault file is active.

pub mod settings;

pub use settings::{ConfigurationService, Settings, DEFAULT_VAULT_FILE};
