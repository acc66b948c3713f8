//! System clipboard access.

use crate::errors::{Result, VaultError};

/// Somewhere a password can be handed to the user without printing it.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

/// The OS clipboard, via `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| VaultError::CommandFailed(format!("clipboard write failed: {e}")))
    }
}
