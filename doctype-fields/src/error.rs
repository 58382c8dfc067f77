//! Error types for the field-type registry and the descriptor builder

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised while populating or querying the field-type registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A name or alternate name is already taken
    #[error("duplicate field type: {name}")]
    DuplicateType { name: String },

    /// Type name not in the catalog
    #[error("unknown field type: {name}")]
    UnknownType { name: String },

    /// No catalog entry uses this editor
    #[error("no field type uses editor '{editor}'")]
    UnknownEditor { editor: String },

    /// More than one catalog entry uses this editor
    #[error("editor '{editor}' is ambiguous between: {}", .candidates.join(", "))]
    AmbiguousEditor {
        editor: String,
        candidates: Vec<String>,
    },

    /// Catalog entry with an empty editor identifier
    #[error("field type '{name}' has no editor identifier")]
    MissingEditor { name: String },

    /// Catalog file with an extension we cannot parse
    #[error("unsupported catalog format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One problem found while building a content type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Content-type alias is empty or not identifier-safe
    #[error("invalid alias '{alias}': {reason}")]
    InvalidAlias { alias: String, reason: String },

    /// Field name is empty or not identifier-safe
    #[error("invalid field name '{name}': {reason}")]
    InvalidFieldName { name: String, reason: String },

    /// Two declarations share a name
    #[error("duplicate field name '{name}' (declarations {first} and {duplicate})")]
    DuplicateFieldName {
        name: String,
        first: usize,
        duplicate: usize,
    },

    /// Declared type name is not in the catalog
    #[error("field '{field}' has unknown type '{type_name}'")]
    UnknownType { field: String, type_name: String },

    /// The preview control cannot show a value of the field's shape
    #[error("field '{field}' uses control '{control}', which cannot edit a {shape} value")]
    IncompatibleControl {
        field: String,
        control: String,
        shape: String,
    },

    /// Options declared on a field whose type is not a choice
    #[error("field '{field}' declares options but type '{type_name}' is not a choice")]
    OptionsNotSupported { field: String, type_name: String },

    /// Allowed blocks declared on a field whose type is not a block list
    #[error("field '{field}' declares blocks but type '{type_name}' is not a block list")]
    BlocksNotSupported { field: String, type_name: String },

    /// Allowed block alias is not identifier-safe
    #[error("field '{field}' allows invalid block alias '{block}': {reason}")]
    InvalidBlockAlias {
        field: String,
        block: String,
        reason: String,
    },

    /// Story argument with neither a type summary nor an editor alias
    #[error("field '{field}' has no type: set table.type.summary or umbraco.propertyEditorAlias")]
    MissingFieldType { field: String },

    /// Explicit editor alias that no catalog entry uses
    #[error("field '{field}' uses editor '{editor}', which no field type maps to")]
    UnknownEditor { field: String, editor: String },

    /// Explicit editor alias shared by several catalog entries
    #[error("field '{field}' uses editor '{editor}', which is ambiguous between: {}", .candidates.join(", "))]
    AmbiguousEditor {
        field: String,
        editor: String,
        candidates: Vec<String>,
    },
}

impl Violation {
    /// The field the violation is about, if it is field-level.
    pub fn field(&self) -> Option<&str> {
        match self {
            Violation::InvalidAlias { .. } => None,
            Violation::InvalidFieldName { name, .. }
            | Violation::DuplicateFieldName { name, .. } => Some(name.as_str()),
            Violation::UnknownType { field, .. }
            | Violation::IncompatibleControl { field, .. }
            | Violation::OptionsNotSupported { field, .. }
            | Violation::BlocksNotSupported { field, .. }
            | Violation::InvalidBlockAlias { field, .. }
            | Violation::MissingFieldType { field }
            | Violation::UnknownEditor { field, .. }
            | Violation::AmbiguousEditor { field, .. } => Some(field.as_str()),
        }
    }
}

/// Every violation found in one build, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub content_type: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "content type '{}' has {} violation(s)",
            self.content_type,
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// One problem found while assembling several descriptors into a set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetViolation {
    /// Two content types share an alias
    #[error("duplicate content type alias '{alias}'")]
    DuplicateContentType { alias: String },

    /// Block list allows an element type that is not in the set
    #[error("'{content_type}.{field}' allows unknown block '{block}'")]
    UnknownBlockElement {
        content_type: String,
        field: String,
        block: String,
    },

    /// Block list allows a content type that is not an element type
    #[error("'{content_type}.{field}' allows '{block}', which is not an element type")]
    BlockNotElement {
        content_type: String,
        field: String,
        block: String,
    },
}

/// Every violation found while assembling a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetValidationError {
    pub violations: Vec<SetViolation>,
}

impl fmt::Display for SetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "content type set has {} violation(s)",
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for SetValidationError {}

/// Errors for callers that read declaration documents from disk.
#[derive(Debug, Error)]
pub enum DoctypeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Set(#[from] SetValidationError),

    /// Document could not be parsed as a declaration or a story
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
