//! Subcommand implementations

pub mod info;
pub mod markup;
pub mod render;

use std::io::{self, Read};

use typeset_core::error::Result;

/// The positional text, or everything on stdin
pub(crate) fn text_or_stdin(text: Option<&str>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}
