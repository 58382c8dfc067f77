//! ContentTypeBuilder: declarations in, validated descriptor out.
//!
//! `build` is a pure function of its inputs and the registry it borrows. It
//! walks every declaration once, collects every violation it can find, and
//! only assembles a descriptor when there are none.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ValidationError, Violation};
use crate::registry::FieldTypeRegistry;
use crate::types::{
    ContentTypeDescriptor, ContentTypeMeta, FieldDeclaration, FieldType, Optionality,
    ResolvedField, ValueShape,
};
use crate::validation::{title_case, validate_alias};

/// Group used for fields that do not name one.
pub const DEFAULT_GROUP: &str = "Content";

/// Icon used for content types that do not name one.
pub const DEFAULT_ICON: &str = "icon-document";

/// Builds content-type descriptors against one registry.
#[derive(Debug, Clone, Copy)]
pub struct ContentTypeBuilder<'r> {
    registry: &'r FieldTypeRegistry,
}

impl<'r> ContentTypeBuilder<'r> {
    pub fn new(registry: &'r FieldTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r FieldTypeRegistry {
        self.registry
    }

    /// Validate `fields` for the content type described by `meta`.
    ///
    /// Returns every violation at once on failure. Field order in the result
    /// is by explicit `order`, then declaration position; fields without an
    /// explicit order come after all ordered fields.
    pub fn build(
        &self,
        meta: &ContentTypeMeta,
        fields: &[FieldDeclaration],
    ) -> Result<ContentTypeDescriptor, ValidationError> {
        let mut violations = Vec::new();

        if let Err(reason) = validate_alias(&meta.alias) {
            violations.push(Violation::InvalidAlias {
                alias: meta.alias.clone(),
                reason,
            });
        }

        // Lower-cased name -> position of its first declaration
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut resolved: Vec<(usize, ResolvedField)> = Vec::with_capacity(fields.len());

        for (idx, decl) in fields.iter().enumerate() {
            if let Err(reason) = validate_alias(&decl.name) {
                violations.push(Violation::InvalidFieldName {
                    name: decl.name.clone(),
                    reason,
                });
            }

            if !decl.name.is_empty() {
                let key = decl.name.to_ascii_lowercase();
                if let Some(&first) = first_seen.get(&key) {
                    violations.push(Violation::DuplicateFieldName {
                        name: decl.name.clone(),
                        first,
                        duplicate: idx,
                    });
                } else {
                    first_seen.insert(key, idx);
                }
            }

            match self.registry.get(&decl.type_name) {
                Some(field_type) => {
                    check_against_type(decl, field_type, &mut violations);
                    resolved.push((idx, resolve_field(decl, field_type)));
                }
                None => violations.push(Violation::UnknownType {
                    field: decl.name.clone(),
                    type_name: decl.type_name.clone(),
                }),
            }
        }

        if !violations.is_empty() {
            debug!(
                alias = %meta.alias,
                violations = violations.len(),
                "content type failed validation"
            );
            return Err(ValidationError {
                content_type: meta.alias.clone(),
                violations,
            });
        }

        // Stable sort keeps declaration order for ties
        resolved.sort_by_key(|(idx, field)| {
            let order = field.declaration.order;
            (order.is_none(), order, *idx)
        });

        let descriptor = ContentTypeDescriptor {
            alias: meta.alias.clone(),
            name: non_blank(meta.name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| title_case(&meta.alias)),
            icon: non_blank(meta.icon.as_deref())
                .unwrap_or(DEFAULT_ICON)
                .to_string(),
            description: meta.description.clone(),
            is_element: meta.is_element,
            allowed_at_root: meta.allowed_at_root,
            folder: meta.folder.clone(),
            fields: resolved.into_iter().map(|(_, field)| field).collect(),
        };

        debug!(
            alias = %descriptor.alias,
            fields = descriptor.fields.len(),
            "built content type descriptor"
        );
        Ok(descriptor)
    }
}

/// Build one descriptor against `registry`.
pub fn build(
    registry: &FieldTypeRegistry,
    meta: &ContentTypeMeta,
    fields: &[FieldDeclaration],
) -> Result<ContentTypeDescriptor, ValidationError> {
    ContentTypeBuilder::new(registry).build(meta, fields)
}

fn check_against_type(
    decl: &FieldDeclaration,
    field_type: &FieldType,
    violations: &mut Vec<Violation>,
) {
    if let Some(control) = decl.control {
        if !field_type.shape.accepts_control(control) {
            violations.push(Violation::IncompatibleControl {
                field: decl.name.clone(),
                control: control.to_string(),
                shape: field_type.shape.to_string(),
            });
        }
    }

    if !decl.options.is_empty() && field_type.shape != ValueShape::Choice {
        violations.push(Violation::OptionsNotSupported {
            field: decl.name.clone(),
            type_name: field_type.name.to_string(),
        });
    }

    if !decl.blocks.is_empty() {
        if field_type.shape != ValueShape::Blocks {
            violations.push(Violation::BlocksNotSupported {
                field: decl.name.clone(),
                type_name: field_type.name.to_string(),
            });
        } else {
            for block in &decl.blocks {
                if let Err(reason) = validate_alias(block) {
                    violations.push(Violation::InvalidBlockAlias {
                        field: decl.name.clone(),
                        block: block.clone(),
                        reason,
                    });
                }
            }
        }
    }
}

fn resolve_field(decl: &FieldDeclaration, field_type: &FieldType) -> ResolvedField {
    // The declaration decides; the catalog default never makes a field required.
    let optionality = if decl.required {
        Optionality::Required
    } else {
        Optionality::Optional
    };

    let options = if !decl.options.is_empty() {
        decl.options.clone()
    } else if field_type.shape == ValueShape::Choice {
        field_type.options.clone()
    } else {
        Vec::new()
    };

    ResolvedField {
        declaration: decl.clone(),
        field_type: field_type.clone(),
        optionality,
        label: non_blank(decl.label.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&decl.name)),
        group: non_blank(decl.group.as_deref())
            .unwrap_or(DEFAULT_GROUP)
            .to_string(),
        options,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
