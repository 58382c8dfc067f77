//! The `build` command: one declaration in, one descriptor out.

use std::path::Path;

use doctype_fields::{load_document, ContentTypeDescriptor, FieldTypeRegistry};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::table::{new_table, yes_no};

/// Run the build command.
pub async fn run_build(
    registry: &FieldTypeRegistry,
    path: &Path,
    format: OutputFormat,
) -> Result<(), CliError> {
    let descriptor = build_file(registry, path).await?;
    println!("{}", render_descriptor(&descriptor, format)?);
    Ok(())
}

pub async fn build_file(
    registry: &FieldTypeRegistry,
    path: &Path,
) -> Result<ContentTypeDescriptor, CliError> {
    let document = load_document(path).await?;
    let descriptor = document.build(registry)?;
    debug!(alias = %descriptor.alias, fields = descriptor.fields.len(), "built descriptor");
    Ok(descriptor)
}

pub fn render_descriptor(
    descriptor: &ContentTypeDescriptor,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(descriptor)?),
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(descriptor)?),
        OutputFormat::Table => Ok(render_table(descriptor)),
    }
}

fn render_table(descriptor: &ContentTypeDescriptor) -> String {
    let kind = if descriptor.is_element {
        "element type"
    } else {
        "document type"
    };
    let mut out = format!(
        "{} ({}) - {}, icon {}\n",
        descriptor.name, descriptor.alias, kind, descriptor.icon
    );
    if descriptor.allowed_at_root {
        out.push_str("Allowed at root\n");
    }
    out.push('\n');

    let mut table = new_table(&[
        "#", "Field", "Label", "Type", "Editor", "Required", "Group",
    ]);
    for (position, field) in descriptor.fields.iter().enumerate() {
        table.add_row(vec![
            position.to_string(),
            field.name().to_string(),
            field.label.clone(),
            field.field_type.name.to_string(),
            field.editor().to_string(),
            yes_no(field.is_required()).to_string(),
            field.group.clone(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AI_PAGE: &str = r#"
content-type:
  alias: aiPage
fields:
  - name: backgroundColor
    type: colorpicker
    order: 1
  - name: pageTitle
    type: string
    required: true
    order: 0
"#;

    async fn built(content: &str) -> Result<ContentTypeDescriptor, CliError> {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("aiPage.yaml");
        std::fs::write(&path, content).unwrap();
        let registry = FieldTypeRegistry::builtin().unwrap();
        build_file(&registry, &path).await
    }

    #[tokio::test]
    async fn test_build_file_orders_fields() {
        let descriptor = built(AI_PAGE).await.unwrap();
        assert_eq!(descriptor.field_names(), vec!["pageTitle", "backgroundColor"]);
    }

    #[tokio::test]
    async fn test_build_file_reports_violations() {
        let err = built("content-type:\n  alias: aiPage\nfields:\n  - name: x\n    type: unknownType\n")
            .await
            .unwrap_err();
        let CliError::Validation(validation) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(validation.len(), 1);
    }

    #[tokio::test]
    async fn test_render_formats() {
        let descriptor = built(AI_PAGE).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&render_descriptor(&descriptor, OutputFormat::Json).unwrap())
                .unwrap();
        assert_eq!(json["alias"], "aiPage");
        assert_eq!(json["fields"].as_array().unwrap().len(), 2);

        let yaml = render_descriptor(&descriptor, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("alias: aiPage"));

        let table = render_descriptor(&descriptor, OutputFormat::Table).unwrap();
        assert!(table.contains("Ai Page (aiPage) - document type"));
        assert!(table.contains("Umbraco.DropDown.Flexible"));
    }
}
