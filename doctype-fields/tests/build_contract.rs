//! End-to-end checks of the declaration → descriptor contract, using the
//! public API only.

use std::path::{Path, PathBuf};

use doctype_fields::{
    build, collect_documents, load_document, ContentTypeMeta, ContentTypeSet, FieldDeclaration,
    FieldType, FieldTypeName, FieldTypeRegistry, Optionality, RegistryError, SetViolation,
    ValueShape, Violation,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn every_builtin_type_has_an_editor() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    for field_type in registry.all() {
        let resolved = registry.resolve(field_type.name.as_str()).unwrap();
        assert!(!resolved.editor.is_empty());
        for alias in &field_type.aliases {
            assert_eq!(registry.resolve(alias.as_str()).unwrap().name, field_type.name);
        }
    }
}

#[test]
fn unregistered_names_never_fall_back() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    for name in ["unknownType", "textarea", "number", "checkbox", "", "string "] {
        let result = registry.resolve(name);
        if name.trim() == "string" {
            assert!(result.is_ok());
        } else {
            assert!(
                matches!(result, Err(RegistryError::UnknownType { .. })),
                "{name:?} should be unknown"
            );
        }
    }
}

#[test]
fn ai_page_example() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    let descriptor = build(
        &registry,
        &ContentTypeMeta::new("aiPage"),
        &[
            FieldDeclaration::new("pageTitle", "string").required().order(0),
            FieldDeclaration::new("backgroundColor", "colorpicker").order(1),
        ],
    )
    .unwrap();

    assert_eq!(descriptor.fields.len(), 2);
    assert_eq!(descriptor.field_names(), vec!["pageTitle", "backgroundColor"]);
    assert!(descriptor.fields[0].is_required());
    assert!(!descriptor.fields[1].is_required());
}

#[test]
fn unknown_type_example() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    let err = build(
        &registry,
        &ContentTypeMeta::new("aiPage"),
        &[FieldDeclaration::new("x", "unknownType").order(0)],
    )
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(err.violations[0].field(), Some("x"));
    assert!(matches!(err.violations[0], Violation::UnknownType { .. }));
}

#[test]
fn required_catalog_default_does_not_leak_into_fields() {
    let mut registry = FieldTypeRegistry::builtin().unwrap();
    registry
        .register(
            FieldType::new(
                FieldTypeName::new("headline").unwrap(),
                "Umbraco.TextBox",
                ValueShape::Text,
            )
            .with_default_optionality(Optionality::Required),
        )
        .unwrap();

    let descriptor = build(
        &registry,
        &ContentTypeMeta::new("article"),
        &[
            FieldDeclaration::new("title", "headline"),
            FieldDeclaration::new("kicker", "headline").required(),
        ],
    )
    .unwrap();

    assert_eq!(descriptor.fields[0].optionality, Optionality::Optional);
    assert_eq!(descriptor.fields[1].optionality, Optionality::Required);
}

#[tokio::test]
async fn ai_hero_story_marks_only_heading_required() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    let document = load_document(&fixture("ai_hero.story.yaml")).await.unwrap();
    let descriptor = document.build(&registry).unwrap();

    assert_eq!(descriptor.alias, "aiHero");
    assert_eq!(descriptor.icon, "icon-picture");
    assert!(descriptor.allowed_at_root);
    assert_eq!(
        descriptor.field_names(),
        vec![
            "heading",
            "description",
            "backgroundColor",
            "image",
            "backLink",
            "className"
        ]
    );
    let required: Vec<_> = descriptor
        .fields
        .iter()
        .filter(|f| f.is_required())
        .map(|f| f.name())
        .collect();
    assert_eq!(required, vec!["heading"]);
    assert_eq!(
        descriptor.field("image").unwrap().editor(),
        "Umbraco.MediaPicker3"
    );
    assert_eq!(
        descriptor.field("backLink").unwrap().editor(),
        "Umbraco.MultiUrlPicker"
    );
}

#[tokio::test]
async fn services_section_needs_its_card_element() {
    let registry = FieldTypeRegistry::builtin().unwrap();

    let section = load_document(&fixture("services_section.story.json"))
        .await
        .unwrap()
        .build(&registry)
        .unwrap();
    let card = load_document(&fixture("featured_card.yaml"))
        .await
        .unwrap()
        .build(&registry)
        .unwrap();

    let err = ContentTypeSet::assemble(vec![section.clone()]).unwrap_err();
    assert!(matches!(
        err.violations[0],
        SetViolation::UnknownBlockElement { ref block, .. } if block == "featuredCard"
    ));

    let set = ContentTypeSet::assemble(vec![section, card]).unwrap();
    assert_eq!(set.documents().count(), 1);
    assert_eq!(set.elements().count(), 1);
    assert_eq!(
        set.get("featuredCard").unwrap().field("symbolColor").unwrap().options,
        vec!["sky", "coral", "mustard", "green", "gray"]
    );
}

#[tokio::test]
async fn fixture_directory_builds_cleanly() {
    let registry = FieldTypeRegistry::builtin().unwrap();
    let files = collect_documents(&[fixture("")]).await.unwrap();
    assert_eq!(files.len(), 3);

    let mut descriptors = Vec::new();
    for file in &files {
        let document = load_document(file).await.unwrap();
        descriptors.push(document.build(&registry).unwrap());
    }
    assert_eq!(ContentTypeSet::assemble(descriptors).unwrap().len(), 3);
}

#[tokio::test]
async fn shared_registry_serves_concurrent_builds() {
    let registry = std::sync::Arc::new(FieldTypeRegistry::builtin().unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let alias = format!("page{i}");
                build(
                    &registry,
                    &ContentTypeMeta::new(alias),
                    &[FieldDeclaration::new("pageTitle", "string").required()],
                )
            })
        })
        .collect();

    for task in tasks {
        let descriptor = task.await.unwrap().unwrap();
        assert!(descriptor.fields[0].is_required());
    }
}
