//! Field-type registry and content-type descriptor builder
//!
//! `doctype-fields` turns declared content-type fields (name, type name,
//! required flag, group, order) into validated descriptors that a CMS
//! exporter can consume. It does not write any import format itself.
//!
//! # Architecture
//!
//! - **Registry**: the catalog of field types, loaded once and read-only after
//! - **Builder**: a pure `build(meta, fields)` that reports every violation in one pass
//! - **Stories**: adapter for story-style `argTypes` metadata
//! - **Sets**: cross-checks block lists against element types

pub mod builder;
pub mod document;
pub mod error;
pub mod registry;
pub mod set;
pub mod story;
pub mod types;
pub mod validation;

pub use builder::{build, ContentTypeBuilder, DEFAULT_GROUP, DEFAULT_ICON};
pub use document::{collect_documents, load_document, DeclarationDocument, Document};
pub use error::{
    DoctypeError, RegistryError, Result, SetValidationError, SetViolation, ValidationError,
    Violation,
};
pub use registry::{CatalogFile, FieldTypeRegistry, RegistryLoader};
pub use set::ContentTypeSet;
pub use story::{StoryDocument, StoryTranslation};
pub use types::{
    ContentTypeDescriptor, ContentTypeMeta, ControlKind, FieldDeclaration, FieldType,
    FieldTypeName, Optionality, ResolvedField, ValueShape,
};
