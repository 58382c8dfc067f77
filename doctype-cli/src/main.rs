//! doctype CLI - validate content type declarations against the field-type catalog.
//!
//! Commands:
//! - `doctype types`: List the registered field types
//! - `doctype build <file>`: Build one declaration and print its descriptor
//! - `doctype check [paths...]`: Validate declarations and block references
//!
//! Environment variables:
//! - DOCTYPE_CATALOGS: Extra catalog files or directories
//! - DOCTYPE_BUILTINS: Set to false to skip the built-in field types
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error or validation failure

use clap::Parser;
use tracing_subscriber::EnvFilter;

use doctype::{build, catalog, check};
use doctype::{Cli, CliError, Commands, DoctypeConfig};

/// Map a command result to an exit code, printing the error.
fn handle_result(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = DoctypeConfig::load()?.with_overrides(&cli.catalogs, cli.no_builtins);
    let registry = catalog::load_registry(&config).await?;

    match cli.command {
        Commands::Types { json } => catalog::run_types(&registry, json),
        Commands::Build { path, format } => build::run_build(&registry, &path, format).await,
        Commands::Check { paths, json } => {
            check::run_check(&registry, &paths, &config.catalogs, json).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("doctype=debug,doctype_fields=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = handle_result(run(cli).await);
    std::process::exit(exit_code);
}
