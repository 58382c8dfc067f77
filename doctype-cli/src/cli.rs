//! CLI definition for the doctype command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// doctype - check story-defined content types against the field-type catalog.
///
/// Field types come from the built-in catalog plus any catalog files named
/// with `--catalog` or in `.doctype.yaml` / `doctype.toml`.
#[derive(Parser, Debug)]
#[command(name = "doctype")]
#[command(version)]
#[command(about = "Validate content type declarations against the field-type catalog")]
#[command(
    long_about = "doctype resolves declared fields (name, type, required, group, order) against \
    a catalog of field types and reports every problem it finds.\n\n\
    Declarations are YAML or JSON files, either written directly or as story argTypes.\n\n\
    Environment variables:\n  \
    DOCTYPE_CATALOGS  Extra catalog files or directories, e.g. [catalog/extra.yaml]\n  \
    DOCTYPE_BUILTINS  Set to false to start from an empty catalog"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Extra catalog file or directory (repeatable)
    #[arg(long = "catalog", global = true, value_name = "PATH")]
    pub catalogs: Vec<PathBuf>,

    /// Do not load the built-in field types
    #[arg(long, global = true)]
    pub no_builtins: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered field types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build one declaration and print the resulting descriptor
    Build {
        /// Declaration or story file (.yaml, .yml or .json)
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate declarations and the block references between them
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
