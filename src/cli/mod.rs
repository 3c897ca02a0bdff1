//! CLI module for blobdeck
//!
//! Provides command-line interface for:
//! - serve: Start the web front-end
//! - list: One-shot container listing

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, StorageArgs};
pub use commands::{list, run, run_command, serve, StorageSettings};
pub use errors::{CliError, CliErrorCode, CliResult};
