//! Command-line interface for typeset
//!
//! The `typeset` binary renders markup with a font file, prints parsed
//! markup runs and lists what the pipeline supports. Argument definitions
//! and option parsing live here so they can be tested without a process.

pub mod cli;
pub mod commands;
pub mod config;
