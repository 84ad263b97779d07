//! Clipboard access via the OSC 52 escape sequence
//!
//! Writes the payload straight to the controlling terminal, which puts
//! it on the system clipboard in every modern emulator without touching
//! a display server. Terminals that ignore OSC 52 simply drop the
//! sequence; callers keep a visible fallback for that case.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, stdout, Write};

/// Copy `text` to the system clipboard through the terminal
pub fn copy(text: &str) -> io::Result<()> {
    let mut out = stdout();
    write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
    out.flush()
}
