//! Story metadata adapter.
//!
//! A doctype story describes its content type in two places:
//! `parameters.umbraco` carries content-type metadata, and `argTypes` lists
//! one entry per property. Authors mark a property's field type with
//! `table.type.summary` and make it mandatory with `table.category: Required`;
//! anything not marked required is optional.
//!
//! An optional `umbraco` block on an argument adds explicit metadata:
//!
//! - type: `umbraco.type`, else `table.type.summary`, else a reverse lookup of
//!   `umbraco.propertyEditorAlias` (narrowed by `dataTypeGuid`)
//! - required: `umbraco.mandatory: true` *or* `table.category: Required`;
//!   `mandatory: false` does not clear a `Required` category
//! - group: `umbraco.group`, else the category unless it is `Required`
//! - name, label and order: `umbraco.alias`, `umbraco.label`, `umbraco.sortOrder`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builder::build;
use crate::error::{RegistryError, ValidationError, Violation};
use crate::registry::FieldTypeRegistry;
use crate::types::{ContentTypeDescriptor, ContentTypeMeta, ControlKind, FieldDeclaration};
use crate::validation::camel_case;

/// Category value that marks an argument as mandatory.
pub const REQUIRED_CATEGORY: &str = "Required";

/// A story definition, as exported from the story file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    /// Story path such as `DocTypes/AI Hero`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub parameters: StoryParameters,
    /// Arguments in declaration order.
    #[serde(default)]
    pub arg_types: IndexMap<String, ArgType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umbraco: Option<UmbracoContentType>,
}

/// Content-type metadata under `parameters.umbraco`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmbracoContentType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_element: bool,
    #[serde(default, alias = "allowedAsRoot")]
    pub allowed_at_root: bool,
    /// Back-office folder, e.g. `AI Content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// One entry of `argTypes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<ArgTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umbraco: Option<UmbracoProperty>,
}

/// Story controls come as a bare name, an object with a `type`, or `false`.
///
/// Controls this crate does not know are kept by name and never checked
/// against the field's value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlSpec {
    Kind(ControlKind),
    Detailed {
        #[serde(rename = "type")]
        kind: ControlKind,
    },
    Disabled(bool),
    Other(String),
    OtherDetailed {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl ControlSpec {
    pub fn kind(&self) -> Option<ControlKind> {
        match self {
            ControlSpec::Kind(kind) | ControlSpec::Detailed { kind } => Some(*kind),
            ControlSpec::Disabled(_) | ControlSpec::Other(_) | ControlSpec::OtherDetailed { .. } => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgTable {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_summary: Option<TypeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Explicit property metadata under `argTypes.<name>.umbraco`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmbracoProperty {
    /// Field-type name, e.g. `string` or `colorpicker`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_editor_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    /// Element-type aliases a block list accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_blocks: Vec<String>,
}

/// Builder input extracted from a story, plus whatever could not be extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryTranslation {
    pub meta: ContentTypeMeta,
    pub fields: Vec<FieldDeclaration>,
    pub violations: Vec<Violation>,
}

impl StoryDocument {
    /// Content-type metadata; the alias falls back to the last title segment.
    pub fn content_type_meta(&self) -> ContentTypeMeta {
        let umbraco = self.parameters.umbraco.clone().unwrap_or_default();
        let title_name = self
            .title
            .as_deref()
            .and_then(|t| t.rsplit('/').next())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let alias = umbraco
            .alias
            .clone()
            .or_else(|| umbraco.name.as_deref().map(camel_case))
            .or_else(|| title_name.map(camel_case))
            .unwrap_or_default();

        ContentTypeMeta {
            alias,
            name: umbraco.name.or_else(|| title_name.map(str::to_string)),
            icon: umbraco.icon,
            description: umbraco.description,
            is_element: umbraco.is_element
                || umbraco.entity_type.as_deref() == Some("element-type"),
            allowed_at_root: umbraco.allowed_at_root,
            folder: umbraco.group,
        }
    }

    /// Translate every argument into a field declaration.
    ///
    /// Arguments whose type cannot be determined are left out of `fields` and
    /// reported in `violations` instead.
    pub fn translate(&self, registry: &FieldTypeRegistry) -> StoryTranslation {
        let mut fields = Vec::with_capacity(self.arg_types.len());
        let mut violations = Vec::new();

        for (key, arg) in &self.arg_types {
            match arg.to_declaration(key, registry) {
                Ok(decl) => fields.push(decl),
                Err(violation) => violations.push(violation),
            }
        }

        StoryTranslation {
            meta: self.content_type_meta(),
            fields,
            violations,
        }
    }

    /// Translate and build in one step, reporting adapter and builder
    /// violations together.
    pub fn build(
        &self,
        registry: &FieldTypeRegistry,
    ) -> Result<ContentTypeDescriptor, ValidationError> {
        let StoryTranslation {
            meta,
            fields,
            mut violations,
        } = self.translate(registry);

        match build(registry, &meta, &fields) {
            Ok(descriptor) if violations.is_empty() => Ok(descriptor),
            Ok(_) => Err(ValidationError {
                content_type: meta.alias,
                violations,
            }),
            Err(mut err) => {
                violations.append(&mut err.violations);
                err.violations = violations;
                Err(err)
            }
        }
    }
}

impl ArgType {
    fn umbraco(&self) -> UmbracoProperty {
        self.umbraco.clone().unwrap_or_default()
    }

    fn category(&self) -> Option<&str> {
        self.table.as_ref().and_then(|t| t.category.as_deref())
    }

    /// Type name written by the author: `umbraco.type`, else `table.type.summary`.
    fn declared_type(&self) -> Option<&str> {
        let explicit = self
            .umbraco
            .as_ref()
            .and_then(|u| u.type_name.as_deref());
        let summary = self
            .table
            .as_ref()
            .and_then(|t| t.type_summary.as_ref())
            .and_then(|s| s.summary.as_deref());

        [explicit, summary]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    fn is_required_category(&self) -> bool {
        self.category()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(REQUIRED_CATEGORY))
    }

    /// A declared type name wins; otherwise the explicit editor alias is
    /// looked up in the registry.
    fn to_declaration(
        &self,
        key: &str,
        registry: &FieldTypeRegistry,
    ) -> Result<FieldDeclaration, Violation> {
        let umbraco = self.umbraco();
        let name = umbraco.alias.clone().unwrap_or_else(|| key.to_string());

        let type_name = match (self.declared_type(), umbraco.property_editor_alias.as_deref()) {
            (Some(declared), _) => declared.to_string(),
            (None, Some(editor)) => {
                match registry.resolve_editor(editor, umbraco.data_type_guid.as_deref()) {
                    Ok(field_type) => field_type.name.to_string(),
                    Err(RegistryError::AmbiguousEditor { candidates, .. }) => {
                        return Err(Violation::AmbiguousEditor {
                            field: name,
                            editor: editor.to_string(),
                            candidates,
                        })
                    }
                    Err(_) => {
                        return Err(Violation::UnknownEditor {
                            field: name,
                            editor: editor.to_string(),
                        })
                    }
                }
            }
            (None, None) => return Err(Violation::MissingFieldType { field: name }),
        };

        let group = umbraco.group.clone().or_else(|| {
            self.category()
                .filter(|_| !self.is_required_category())
                .map(str::to_string)
        });

        Ok(FieldDeclaration {
            name,
            type_name,
            required: umbraco.mandatory.unwrap_or(false) || self.is_required_category(),
            group,
            order: umbraco.sort_order,
            description: self.description.clone(),
            label: umbraco.label,
            control: self.control.as_ref().and_then(ControlSpec::kind),
            options: self.options.clone(),
            blocks: umbraco.allowed_blocks,
        })
    }
}
