//! Errors surfaced by the doctype commands.

use doctype_fields::{DoctypeError, RegistryError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The field-type catalog could not be loaded
    #[error("failed to load field types: {0}")]
    Registry(#[from] RegistryError),

    /// A document could not be read or parsed
    #[error(transparent)]
    Document(#[from] DoctypeError),

    /// A declaration did not validate
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration files or environment could not be read
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// `check` found problems; the report has already been printed
    #[error("{failed} of {total} declaration(s) invalid, {set_problems} problem(s) between content types")]
    CheckFailed {
        failed: usize,
        total: usize,
        set_problems: usize,
    },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Config(Box::new(err))
    }
}
