//! Clipboard write for the deploy URL.

use anyhow::Context;

/// Copies `text` to the system clipboard as plain text.
pub fn copy_text(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to write to clipboard")?;
    Ok(())
}
