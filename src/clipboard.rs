//! System clipboard access through `arboard`, used by the paste action.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Backend(#[from] arboard::Error),
}

/// Read clipboard text. CRLF line endings are folded to LF so pasted cheats
/// look the same as typed ones.
pub fn get() -> Result<String, ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    let text = cb.get_text()?;
    Ok(crate::drivers::keyboard::normalize_newlines(&text))
}
