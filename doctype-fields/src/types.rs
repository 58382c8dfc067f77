//! Core field-type and content-type types.
//!
//! Everything here serializes to/from YAML and JSON via serde. Field types
//! are catalog entries owned by the registry; declarations and content-type
//! metadata are author input; descriptors are builder output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a catalog entry, e.g. `string`, `richtext` or `blocklist`.
///
/// Always lower-case ASCII letters, digits and `-`, starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldTypeName(String);

impl FieldTypeName {
    /// Create a new name, validating the format.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.is_empty() {
            return Err("field type name cannot be empty".to_string());
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(format!(
                "field type name '{}' must start with a lower-case letter",
                name
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(format!(
                "field type name '{}' must be lowercase alphanumeric with hyphens only",
                name
            ));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldTypeName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldTypeName> for String {
    fn from(name: FieldTypeName) -> Self {
        name.0
    }
}

impl fmt::Display for FieldTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The shape of the value the delivery API returns for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueShape {
    /// Plain string.
    Text,
    /// HTML markup returned as a string.
    Html,
    /// One value out of a fixed option list.
    Choice,
    /// Media reference (url, alt text, dimensions).
    Media,
    /// Link reference (url and link text).
    Link,
    /// Ordered list of element-type blocks.
    Blocks,
}

impl ValueShape {
    /// Whether a story control can preview a value of this shape.
    pub fn accepts_control(self, control: ControlKind) -> bool {
        use ControlKind::*;
        match self {
            ValueShape::Text | ValueShape::Html => matches!(control, Text | Textarea),
            ValueShape::Choice => matches!(control, Select | Radio | InlineRadio),
            ValueShape::Media | ValueShape::Link | ValueShape::Blocks => {
                matches!(control, Object)
            }
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueShape::Text => "text",
            ValueShape::Html => "html",
            ValueShape::Choice => "choice",
            ValueShape::Media => "media",
            ValueShape::Link => "link",
            ValueShape::Blocks => "blocks",
        };
        f.write_str(s)
    }
}

/// The preview control a story uses for an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    Text,
    Textarea,
    Select,
    Radio,
    InlineRadio,
    Object,
    Boolean,
    Number,
    Color,
    Date,
    Range,
    Check,
    InlineCheck,
    MultiSelect,
    File,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControlKind::Text => "text",
            ControlKind::Textarea => "textarea",
            ControlKind::Select => "select",
            ControlKind::Radio => "radio",
            ControlKind::InlineRadio => "inline-radio",
            ControlKind::Object => "object",
            ControlKind::Boolean => "boolean",
            ControlKind::Number => "number",
            ControlKind::Color => "color",
            ControlKind::Date => "date",
            ControlKind::Range => "range",
            ControlKind::Check => "check",
            ControlKind::InlineCheck => "inline-check",
            ControlKind::MultiSelect => "multi-select",
            ControlKind::File => "file",
        };
        f.write_str(s)
    }
}

/// Whether a field must be filled in by editors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Optionality {
    #[default]
    Optional,
    Required,
}

impl Optionality {
    pub fn is_required(self) -> bool {
        self == Optionality::Required
    }
}

impl fmt::Display for Optionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optionality::Optional => f.write_str("optional"),
            Optionality::Required => f.write_str("required"),
        }
    }
}

/// A catalog entry: maps a type name onto the CMS editor that backs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldType {
    pub name: FieldTypeName,
    /// Property editor identifier in the target CMS, e.g. `Umbraco.TextBox`.
    pub editor: String,
    pub shape: ValueShape,
    /// Catalog default. Declarations always override it.
    #[serde(default)]
    pub default_optionality: Optionality,
    /// Data-type key in the target CMS, when one specific instance is meant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Preset values for choice shapes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate names that resolve to this entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<FieldTypeName>,
}

impl FieldType {
    /// Create a catalog entry with no data type, options, description or aliases.
    pub fn new(name: FieldTypeName, editor: impl Into<String>, shape: ValueShape) -> Self {
        Self {
            name,
            editor: editor.into(),
            shape,
            default_optionality: Optionality::Optional,
            data_type: None,
            options: Vec::new(),
            description: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_default_optionality(mut self, optionality: Optionality) -> Self {
        self.default_optionality = optionality;
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alias(mut self, alias: FieldTypeName) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Canonical name followed by every alternate name.
    pub fn all_names(&self) -> impl Iterator<Item = &FieldTypeName> {
        std::iter::once(&self.name).chain(self.aliases.iter())
    }
}

/// One property of a content type, as declared by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDeclaration {
    /// Property alias, unique within the content type.
    pub name: String,
    /// Catalog name the field resolves through. Matched case-insensitively.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlKind>,
    /// Explicit choice values; overrides the catalog presets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Element-type aliases allowed inside a block list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
}

impl FieldDeclaration {
    /// An optional, unordered declaration with nothing but a name and a type.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            group: None,
            order: None,
            description: None,
            label: None,
            control: None,
            options: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn control(mut self, control: ControlKind) -> Self {
        self.control = Some(control);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks = blocks.into_iter().map(Into::into).collect();
        self
    }
}

/// Content-type level metadata: everything except the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContentTypeMeta {
    pub alias: String,
    /// Display name. Derived from the alias when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reusable block rather than a document type.
    #[serde(default)]
    pub is_element: bool,
    #[serde(default)]
    pub allowed_at_root: bool,
    /// Folder the content type is filed under in the CMS back office.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl ContentTypeMeta {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: None,
            icon: None,
            description: None,
            is_element: false,
            allowed_at_root: false,
            folder: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn element(mut self) -> Self {
        self.is_element = true;
        self
    }

    pub fn allowed_at_root(mut self) -> Self {
        self.allowed_at_root = true;
        self
    }
}

/// A declaration paired with the catalog entry it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedField {
    pub declaration: FieldDeclaration,
    pub field_type: FieldType,
    pub optionality: Optionality,
    pub label: String,
    pub group: String,
    /// Effective choice values: declared options, else the catalog presets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ResolvedField {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn is_required(&self) -> bool {
        self.optionality.is_required()
    }

    pub fn editor(&self) -> &str {
        &self.field_type.editor
    }
}

/// The validated, normalized content type, ready for an exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContentTypeDescriptor {
    pub alias: String,
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_element: bool,
    pub allowed_at_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Fields in their final sort order.
    pub fields: Vec<ResolvedField>,
}

impl ContentTypeDescriptor {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(ResolvedField::name).collect()
    }

    /// Distinct group labels in the order their first field appears.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !groups.contains(&field.group.as_str()) {
                groups.push(&field.group);
            }
        }
        groups
    }

    /// Fields of one group, in sort order.
    pub fn fields_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ResolvedField> {
        self.fields.iter().filter(move |f| f.group == group)
    }
}
