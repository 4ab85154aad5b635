//! Markup command implementation
//!
//! Prints what the markup processor made of the input: the plain text and
//! every character run, as JSON.

use crate::cli::MarkupArgs;
use typeset_core::error::{Result, TypesetError};
use typeset_markup::MarkupProcessor;

pub fn run(args: &MarkupArgs) -> Result<()> {
    let markup = super::text_or_stdin(args.text.as_deref())?;
    println!("{}", to_json(&markup, !args.compact)?);
    Ok(())
}

/// Processed markup as JSON
pub fn to_json(markup: &str, pretty: bool) -> Result<String> {
    let data = MarkupProcessor::new().process(markup);
    let json = if pretty {
        serde_json::to_string_pretty(&data)
    } else {
        serde_json::to_string(&data)
    };
    json.map_err(|e| TypesetError::Other(format!("JSON encoding failed: {}", e)))
}
