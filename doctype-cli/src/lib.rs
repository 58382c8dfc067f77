//! doctype CLI library.
//!
//! Command implementations live here so they can be tested without spawning
//! the binary; `main.rs` only parses arguments and maps results to exit codes.

pub mod build;
pub mod catalog;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod table;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::DoctypeConfig;
pub use error::CliError;
