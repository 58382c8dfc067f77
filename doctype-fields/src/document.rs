//! Declaration documents on disk.
//!
//! Two document kinds are accepted, in YAML or JSON:
//!
//! ```text
//! # declaration document        # story document
//! content-type:                  title: DocTypes/AI Hero
//!   alias: aiPage                parameters:
//! fields:                          umbraco: { alias: aiHero }
//!   - name: pageTitle            argTypes:
//!     type: string                 heading: { table: { type: { summary: string } } }
//! ```
//!
//! A document with an `argTypes` key is a story; anything else is read as a
//! declaration document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::builder::build;
use crate::error::{DoctypeError, ValidationError};
use crate::registry::FieldTypeRegistry;
use crate::story::StoryDocument;
use crate::types::{ContentTypeDescriptor, ContentTypeMeta, FieldDeclaration};

/// Key whose presence marks a story document.
const STORY_KEY: &str = "argTypes";

/// Content-type metadata plus its fields, written directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeclarationDocument {
    pub content_type: ContentTypeMeta,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

/// Either kind of document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Declaration(DeclarationDocument),
    Story(StoryDocument),
}

impl Document {
    /// Parse `content`, picking the format from the extension of `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self, DoctypeError> {
        let parse_error = |message: String| DoctypeError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let value: serde_json::Value =
                    serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                let is_story = value.get(STORY_KEY).is_some();
                if is_story {
                    serde_json::from_value(value)
                        .map(Document::Story)
                        .map_err(|e| parse_error(e.to_string()))
                } else {
                    serde_json::from_value(value)
                        .map(Document::Declaration)
                        .map_err(|e| parse_error(e.to_string()))
                }
            }
            Some("yaml") | Some("yml") => {
                let value: serde_yaml_ng::Value =
                    serde_yaml_ng::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                let is_story = value.get(STORY_KEY).is_some();
                if is_story {
                    serde_yaml_ng::from_value(value)
                        .map(Document::Story)
                        .map_err(|e| parse_error(e.to_string()))
                } else {
                    serde_yaml_ng::from_value(value)
                        .map(Document::Declaration)
                        .map_err(|e| parse_error(e.to_string()))
                }
            }
            _ => Err(parse_error(
                "expected a .yaml, .yml or .json file".to_string(),
            )),
        }
    }

    /// Alias the document declares, before validation.
    pub fn alias(&self) -> String {
        match self {
            Document::Declaration(doc) => doc.content_type.alias.clone(),
            Document::Story(story) => story.content_type_meta().alias,
        }
    }

    /// Validate the document against `registry`.
    pub fn build(
        &self,
        registry: &FieldTypeRegistry,
    ) -> Result<ContentTypeDescriptor, ValidationError> {
        match self {
            Document::Declaration(doc) => build(registry, &doc.content_type, &doc.fields),
            Document::Story(story) => story.build(registry),
        }
    }
}

/// Read and parse one document.
pub async fn load_document(path: &Path) -> Result<Document, DoctypeError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| DoctypeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let document = Document::parse(path, &content)?;
    debug!(?path, alias = %document.alias(), "loaded document");
    Ok(document)
}

/// Expand `paths` into document files: files are kept as given, directories
/// are walked recursively for `.yaml`, `.yml` and `.json` files. Hidden
/// entries (such as `.doctype.yaml` or `.git/`) are skipped while walking.
pub async fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DoctypeError> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = fs::metadata(path).await.map_err(|source| DoctypeError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.is_dir() {
            collect_dir(path, &mut files).await?;
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

async fn collect_dir(root: &Path, files: &mut Vec<PathBuf>) -> Result<(), DoctypeError> {
    let io_error = |path: &Path, source| DoctypeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut pending = vec![root.to_path_buf()];
    let mut found = Vec::new();
    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await.map_err(|e| io_error(&dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| io_error(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            ) {
                found.push(path);
            }
        }
    }
    found.sort();
    files.extend(found);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DECLARATION: &str = r#"
content-type:
  alias: aiPage
  name: AI Page
  allowed-at-root: true
fields:
  - name: pageTitle
    type: string
    required: true
    order: 0
  - name: backgroundColor
    type: colorpicker
    order: 1
"#;

    #[test]
    fn parses_declaration_yaml() {
        let doc = Document::parse(Path::new("aiPage.yaml"), DECLARATION).unwrap();
        assert_eq!(doc.alias(), "aiPage");
        let Document::Declaration(decl) = &doc else {
            panic!("expected a declaration document");
        };
        assert_eq!(decl.fields.len(), 2);
        assert!(decl.content_type.allowed_at_root);
    }

    #[test]
    fn parses_story_json() {
        let json = r#"{
            "title": "DocTypes/Services Section",
            "argTypes": {
                "heading": {"control": "text", "table": {"type": {"summary": "string"}, "category": "Required"}},
                "items": {"control": "object", "table": {"type": {"summary": "blocklist"}}}
            }
        }"#;
        let doc = Document::parse(Path::new("services.json"), json).unwrap();
        assert!(matches!(doc, Document::Story(_)));
        assert_eq!(doc.alias(), "servicesSection");

        let registry = FieldTypeRegistry::builtin().unwrap();
        let descriptor = doc.build(&registry).unwrap();
        assert_eq!(descriptor.field_names(), vec!["heading", "items"]);
    }

    #[test]
    fn unknown_extension_is_a_parse_error() {
        let err = Document::parse(Path::new("aiPage.toml"), DECLARATION).unwrap_err();
        assert!(matches!(err, DoctypeError::Parse { .. }));
    }

    #[test]
    fn declaration_without_content_type_is_a_parse_error() {
        let err = Document::parse(Path::new("x.yaml"), "fields: []\n").unwrap_err();
        assert!(err.to_string().contains("x.yaml"));
    }

    #[tokio::test]
    async fn load_and_collect_documents() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("blocks");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join("aiPage.yaml"), DECLARATION).unwrap();
        std::fs::write(
            nested.join("card.yml"),
            "content-type:\n  alias: featuredCard\n  is-element: true\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("README.md"), "# docs").unwrap();
        std::fs::write(tmp.path().join(".doctype.yaml"), "builtins: true\n").unwrap();
        std::fs::create_dir_all(tmp.path().join(".cache")).unwrap();
        std::fs::write(tmp.path().join(".cache").join("old.json"), "{}").unwrap();

        let files = collect_documents(&[tmp.path().to_path_buf()]).await.unwrap();
        assert_eq!(files.len(), 2);

        let doc = load_document(&tmp.path().join("aiPage.yaml")).await.unwrap();
        assert_eq!(doc.alias(), "aiPage");
    }

    #[tokio::test]
    async fn load_missing_document_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_document(&tmp.path().join("missing.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, DoctypeError::Io { .. }));
    }
}
