//! Loading the field-type registry and the `types` command.

use doctype_fields::{FieldTypeRegistry, RegistryLoader};

use crate::config::DoctypeConfig;
use crate::error::CliError;
use crate::table::{description_cell, new_table};

/// Load the registry described by `config`. Any failing catalog aborts the
/// load; a partial registry is never returned.
pub async fn load_registry(config: &DoctypeConfig) -> Result<FieldTypeRegistry, CliError> {
    Ok(loader_for(config).build().await?)
}

fn loader_for(config: &DoctypeConfig) -> RegistryLoader {
    let mut loader = FieldTypeRegistry::load();
    if config.builtins {
        loader = loader.with_builtins();
    }
    for path in &config.catalogs {
        loader = if path.is_dir() {
            loader.with_dir(path)
        } else {
            loader.with_file(path)
        };
    }
    loader
}

/// Run the types command.
pub fn run_types(registry: &FieldTypeRegistry, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", render_types_json(registry)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("No field types registered.");
        return Ok(());
    }

    println!("{}", render_types_table(registry));
    println!("\n{} field type(s) registered.", registry.len());
    Ok(())
}

pub fn render_types_json(registry: &FieldTypeRegistry) -> Result<String, CliError> {
    let output = serde_json::json!({ "field-types": registry.all() });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn render_types_table(registry: &FieldTypeRegistry) -> String {
    let mut table = new_table(&["Name", "Editor", "Shape", "Aliases", "Description"]);

    for field_type in registry.all() {
        let aliases: Vec<&str> = field_type.aliases.iter().map(|a| a.as_str()).collect();
        table.add_row(vec![
            field_type.name.to_string(),
            field_type.editor.clone(),
            field_type.shape.to_string(),
            aliases.join(", "),
            description_cell(field_type.description.as_deref(), 40),
        ]);
    }

    table.to_string()
}
