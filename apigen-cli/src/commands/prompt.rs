use std::io::IsTerminal;
use std::path::Path;

use apigen_core::{ConfirmOverwrite, GenerateError};
use dialoguer::Confirm;

/// Asks on the terminal; declines when stdin is not interactive.
pub struct TerminalConfirm;

impl ConfirmOverwrite for TerminalConfirm {
    fn confirm(&self, path: &Path) -> Result<bool, GenerateError> {
        if !std::io::stdin().is_terminal() {
            tracing::warn!(path = %path.display(), "not a terminal, keeping existing file");
            return Ok(false);
        }
        Confirm::new()
            .with_prompt(format!("Overwrite {}?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| GenerateError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })
    }
}
