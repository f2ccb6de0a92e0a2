//! Copy and download for a selected message.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::conversation::Message;

/// `chat-<id>.txt`, the name a browser download would get.
pub fn download_name(message: &Message) -> String {
    format!("chat-{}.txt", message.id)
}

/// Write the raw text into `dir`. Returns the written path.
pub fn download(message: &Message, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(download_name(message));
    std::fs::write(&path, &message.text)?;
    log::info!("Saved message {} to {}", message.id, path.display());
    Ok(path)
}

/// OSC 52 "set clipboard" escape carrying `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Ask the terminal to put `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
