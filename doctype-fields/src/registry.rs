//! FieldTypeRegistry: the catalog of supported field types.
//!
//! The registry is populated once, either from the embedded default catalog,
//! from catalog files on disk, or both, and is read-only afterwards. Lookups
//! go through a single name index that covers canonical names and alternate
//! names alike.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::types::FieldType;

/// Default catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../builtin/field-types.yaml");

/// On-disk catalog document: a list of field types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(rename = "field-types", default)]
    pub field_types: Vec<FieldType>,
}

enum CatalogSource {
    File(PathBuf),
    Dir(PathBuf),
}

/// Loader for `FieldTypeRegistry`. Created by `FieldTypeRegistry::load()`.
///
/// Nothing is registered until `build()` runs, and `build()` either returns a
/// fully populated registry or an error.
pub struct RegistryLoader {
    builtins: bool,
    sources: Vec<CatalogSource>,
}

impl RegistryLoader {
    /// Seed the registry with the embedded default catalog.
    pub fn with_builtins(mut self) -> Self {
        self.builtins = true;
        self
    }

    /// Add a single catalog file (`.yaml`, `.yml` or `.json`).
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::File(path.into()));
        self
    }

    /// Add every catalog file in a directory, in file-name order.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Dir(path.into()));
        self
    }

    /// Register everything, in the order the sources were added.
    pub async fn build(self) -> Result<FieldTypeRegistry> {
        let mut registry = FieldTypeRegistry::new();

        if self.builtins {
            registry.register_all(builtin_field_types()?)?;
        }

        for source in self.sources {
            match source {
                CatalogSource::File(path) => {
                    let types = read_catalog(&path).await?;
                    registry.register_all(types)?;
                }
                CatalogSource::Dir(dir) => {
                    for path in catalog_files_in(&dir).await? {
                        let types = read_catalog(&path).await?;
                        registry.register_all(types)?;
                    }
                }
            }
        }

        debug!(types = registry.len(), "field type registry loaded");
        Ok(registry)
    }
}

/// Parse the embedded default catalog.
pub fn builtin_field_types() -> Result<Vec<FieldType>> {
    let catalog: CatalogFile = serde_yaml_ng::from_str(BUILTIN_CATALOG)?;
    Ok(catalog.field_types)
}

/// Parse catalog text, picking the format from the file extension.
pub fn parse_catalog(path: &Path, content: &str) -> Result<Vec<FieldType>> {
    let catalog: CatalogFile = match extension_of(path) {
        Some("yaml") | Some("yml") => serde_yaml_ng::from_str(content)?,
        Some("json") => serde_json::from_str(content)?,
        _ => {
            return Err(RegistryError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    if catalog.field_types.is_empty() {
        warn!(?path, "catalog file declares no field types");
    }
    Ok(catalog.field_types)
}

async fn read_catalog(path: &Path) -> Result<Vec<FieldType>> {
    let content = fs::read_to_string(path).await?;
    let types = parse_catalog(path, &content)?;
    debug!(?path, count = types.len(), "read catalog file");
    Ok(types)
}

/// Catalog files directly inside `dir`, sorted so registration order is stable.
async fn catalog_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !matches!(extension_of(&path), Some("yaml" | "yml" | "json")) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// The catalog of field types, indexed by every name they answer to.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    types: Vec<FieldType>,
    name_index: HashMap<String, usize>,
}

impl FieldTypeRegistry {
    /// An empty registry. Mostly useful for tests and custom catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a registry from the default catalog and/or files.
    ///
    /// ```rust,ignore
    /// let registry = FieldTypeRegistry::load()
    ///     .with_builtins()
    ///     .with_file("catalog/project-types.yaml")
    ///     .build()
    ///     .await?;
    /// ```
    pub fn load() -> RegistryLoader {
        RegistryLoader {
            builtins: false,
            sources: Vec::new(),
        }
    }

    /// A registry holding just the embedded default catalog.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_all(builtin_field_types()?)?;
        Ok(registry)
    }

    /// Add a field type.
    ///
    /// Fails without touching the registry if the canonical name or any
    /// alternate name is already registered, or if the editor is empty.
    pub fn register(&mut self, field_type: FieldType) -> Result<()> {
        if field_type.editor.trim().is_empty() {
            return Err(RegistryError::MissingEditor {
                name: field_type.name.to_string(),
            });
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in field_type.all_names() {
            if self.name_index.contains_key(name.as_str()) || seen.contains(&name.as_str()) {
                return Err(RegistryError::DuplicateType {
                    name: name.to_string(),
                });
            }
            seen.push(name.as_str());
        }

        let idx = self.types.len();
        for name in field_type.all_names() {
            self.name_index.insert(name.to_string(), idx);
        }
        debug!(name = %field_type.name, editor = %field_type.editor, "registered field type");
        self.types.push(field_type);
        Ok(())
    }

    fn register_all(&mut self, types: Vec<FieldType>) -> Result<()> {
        for field_type in types {
            self.register(field_type)?;
        }
        Ok(())
    }

    /// Look up a field type by name or alternate name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<&FieldType> {
        self.get(name).ok_or_else(|| RegistryError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Like `resolve`, without the error.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        let key = name.trim().to_ascii_lowercase();
        self.name_index.get(&key).map(|&i| &self.types[i])
    }

    /// Find the single field type backed by `editor`.
    ///
    /// When `data_type` is given, only entries with that data-type key are
    /// considered. Zero or several matches are errors.
    pub fn resolve_editor(&self, editor: &str, data_type: Option<&str>) -> Result<&FieldType> {
        let candidates: Vec<&FieldType> = self
            .types
            .iter()
            .filter(|t| t.editor.eq_ignore_ascii_case(editor))
            .filter(|t| match data_type {
                Some(key) => t
                    .data_type
                    .as_deref()
                    .is_some_and(|own| own.eq_ignore_ascii_case(key)),
                None => true,
            })
            .collect();

        match candidates.as_slice() {
            [] => Err(RegistryError::UnknownEditor {
                editor: editor.to_string(),
            }),
            [only] => Ok(*only),
            many => Err(RegistryError::AmbiguousEditor {
                editor: editor.to_string(),
                candidates: many.iter().map(|t| t.name.to_string()).collect(),
            }),
        }
    }

    /// All field types, in registration order.
    pub fn all(&self) -> &[FieldType] {
        &self.types
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldTypeName, Optionality, ValueShape};
    use tempfile::TempDir;

    fn name(s: &str) -> FieldTypeName {
        FieldTypeName::new(s).unwrap()
    }

    const BUILTIN_NAMES: [&str; 7] = [
        "string",
        "richtext",
        "colorpicker",
        "brandcolors",
        "mediapicker",
        "urlpicker",
        "blocklist",
    ];

    #[test]
    fn builtin_catalog_has_every_documented_type() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        assert_eq!(registry.len(), BUILTIN_NAMES.len());
        for n in BUILTIN_NAMES {
            let ft = registry.resolve(n).unwrap();
            assert!(!ft.editor.is_empty(), "{n} should have an editor");
        }
    }

    #[test]
    fn builtin_shapes_match_delivery_values() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("string").unwrap().shape, ValueShape::Text);
        assert_eq!(registry.resolve("richtext").unwrap().shape, ValueShape::Html);
        assert_eq!(
            registry.resolve("brandcolors").unwrap().options,
            vec!["mustard", "coral", "blue", "green", "gray"]
        );
        assert_eq!(
            registry.resolve("blocklist").unwrap().editor,
            "Umbraco.BlockList"
        );
    }

    #[test]
    fn resolve_unknown_type_fails() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        let err = registry.resolve("unknownType").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownType { ref name } if name == "unknownType"));
        assert!(FieldTypeRegistry::new().resolve("string").is_err());
    }

    #[test]
    fn resolve_ignores_case_and_whitespace() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("RichText").unwrap().name.as_str(), "richtext");
        assert_eq!(registry.resolve(" string ").unwrap().name.as_str(), "string");
    }

    #[test]
    fn alternate_names_resolve_to_canonical_entry() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("colorkeys").unwrap().name.as_str(), "brandcolors");
        assert_eq!(registry.resolve("heroimage").unwrap().name.as_str(), "mediapicker");
        assert_eq!(registry.resolve("backlink").unwrap().name.as_str(), "urlpicker");
        // Alternate names are not separate entries
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn register_duplicate_fails_and_leaves_registry_unchanged() {
        let mut registry = FieldTypeRegistry::new();
        registry
            .register(FieldType::new(name("string"), "Umbraco.TextBox", ValueShape::Text))
            .unwrap();

        let err = registry
            .register(FieldType::new(name("string"), "Umbraco.TextArea", ValueShape::Text))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { ref name } if name == "string"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("string").unwrap().editor, "Umbraco.TextBox");
    }

    #[test]
    fn register_alias_collision_fails() {
        let mut registry = FieldTypeRegistry::builtin().unwrap();
        let clash = FieldType::new(name("imagepicker"), "Umbraco.MediaPicker3", ValueShape::Media)
            .with_alias(name("heroimage"));
        let err = registry.register(clash).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { ref name } if name == "heroimage"));
        assert!(!registry.contains("imagepicker"));
    }

    #[test]
    fn register_alias_equal_to_own_name_fails() {
        let mut registry = FieldTypeRegistry::new();
        let ft = FieldType::new(name("textarea"), "Umbraco.TextArea", ValueShape::Text)
            .with_alias(name("textarea"));
        assert!(registry.register(ft).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn register_requires_editor() {
        let mut registry = FieldTypeRegistry::new();
        let err = registry
            .register(FieldType::new(name("number"), "  ", ValueShape::Text))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingEditor { .. }));
    }

    #[test]
    fn register_keeps_catalog_default_optionality() {
        let mut registry = FieldTypeRegistry::new();
        registry
            .register(
                FieldType::new(name("title"), "Umbraco.TextBox", ValueShape::Text)
                    .with_default_optionality(Optionality::Required),
            )
            .unwrap();
        assert_eq!(
            registry.resolve("title").unwrap().default_optionality,
            Optionality::Required
        );
    }

    #[test]
    fn resolve_editor_needs_data_type_for_shared_editors() {
        let registry = FieldTypeRegistry::builtin().unwrap();

        let err = registry
            .resolve_editor("Umbraco.DropDown.Flexible", None)
            .unwrap_err();
        match err {
            RegistryError::AmbiguousEditor { candidates, .. } => {
                assert_eq!(candidates, vec!["colorpicker", "brandcolors"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }

        let ft = registry
            .resolve_editor(
                "Umbraco.DropDown.Flexible",
                Some("7fe18493-bd95-40e9-8076-1ed877450db0"),
            )
            .unwrap();
        assert_eq!(ft.name.as_str(), "colorpicker");
    }

    #[test]
    fn resolve_editor_unique_and_unknown() {
        let registry = FieldTypeRegistry::builtin().unwrap();
        assert_eq!(
            registry.resolve_editor("Umbraco.TextBox", None).unwrap().name.as_str(),
            "string"
        );
        assert!(matches!(
            registry.resolve_editor("Umbraco.Slider", None),
            Err(RegistryError::UnknownEditor { .. })
        ));
    }

    #[test]
    fn parse_catalog_rejects_unknown_extension() {
        let err = parse_catalog(Path::new("types.toml"), "").unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedFormat { .. }));
    }

    #[test]
    fn parse_catalog_reads_json() {
        let json = r#"{"field-types": [
            {"name": "checkbox", "editor": "Umbraco.TrueFalse", "shape": "text"}
        ]}"#;
        let types = parse_catalog(Path::new("extra.json"), json).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].editor, "Umbraco.TrueFalse");
    }

    #[test]
    fn loader_with_builtins_matches_builtin() {
        let loaded = tokio_test::block_on(FieldTypeRegistry::load().with_builtins().build()).unwrap();
        assert_eq!(loaded.all(), FieldTypeRegistry::builtin().unwrap().all());
    }

    #[tokio::test]
    async fn loader_without_sources_is_empty() {
        let registry = FieldTypeRegistry::load().build().await.unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn loader_adds_file_catalog_after_builtins() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.yaml");
        std::fs::write(
            &path,
            "field-types:\n  - name: textarea\n    editor: Umbraco.TextArea\n    shape: text\n",
        )
        .unwrap();

        let registry = FieldTypeRegistry::load()
            .with_builtins()
            .with_file(&path)
            .build()
            .await
            .unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.all().last().unwrap().name.as_str(), "textarea");
    }

    #[tokio::test]
    async fn loader_fails_on_duplicate_across_sources() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dup.yaml");
        std::fs::write(
            &path,
            "field-types:\n  - name: string\n    editor: Umbraco.TextArea\n    shape: text\n",
        )
        .unwrap();

        let result = FieldTypeRegistry::load()
            .with_builtins()
            .with_file(&path)
            .build()
            .await;
        assert!(matches!(result, Err(RegistryError::DuplicateType { .. })));
    }

    #[tokio::test]
    async fn loader_reads_directory_in_name_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("b.json"),
            r#"{"field-types": [{"name": "datepicker", "editor": "Umbraco.DateTime", "shape": "text"}]}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("a.yaml"),
            "field-types:\n  - name: number\n    editor: Umbraco.Integer\n    shape: text\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("notes.md"), "not a catalog").unwrap();

        let registry = FieldTypeRegistry::load()
            .with_dir(tmp.path())
            .build()
            .await
            .unwrap();
        let names: Vec<_> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["number", "datepicker"]);
    }

    #[tokio::test]
    async fn loader_fails_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = FieldTypeRegistry::load()
            .with_file(tmp.path().join("missing.yaml"))
            .build()
            .await;
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }

    #[tokio::test]
    async fn loader_fails_on_malformed_catalog() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "field-types:\n  - name: Bad Name\n    editor: X\n    shape: text\n")
            .unwrap();
        let result = FieldTypeRegistry::load().with_file(&path).build().await;
        assert!(matches!(result, Err(RegistryError::Yaml(_))));
    }
}
