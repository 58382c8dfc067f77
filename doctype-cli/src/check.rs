//! The `check` command: validate many declarations, then the links between them.

use std::path::{Path, PathBuf};

use doctype_fields::{
    collect_documents, load_document, ContentTypeDescriptor, ContentTypeSet, FieldTypeRegistry,
};
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::error::CliError;
use crate::table::new_table;

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub problems: Vec<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Everything `check` found.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    /// Problems between content types, e.g. block lists naming missing elements
    pub set_problems: Vec<String>,
}

impl CheckReport {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }

    pub fn is_ok(&self) -> bool {
        self.failed() == 0 && self.set_problems.is_empty()
    }
}

/// Validate every document under `paths`. Files that fail to parse or build
/// are reported and left out of the set check. Files inside `catalogs` are
/// field-type catalogs, not declarations, and are skipped.
pub async fn check_paths(
    registry: &FieldTypeRegistry,
    paths: &[PathBuf],
    catalogs: &[PathBuf],
) -> Result<CheckReport, CliError> {
    let files = collect_documents(paths).await?;
    let catalogs = canonical_paths(catalogs).await;
    let mut report = CheckReport::default();
    let mut descriptors: Vec<ContentTypeDescriptor> = Vec::new();

    for path in files {
        let canonical = canonical_path(&path).await;
        if catalogs.iter().any(|c| canonical.starts_with(c)) {
            debug!(?path, "skipping catalog file");
            continue;
        }
        let file_report = match check_file(registry, &path).await {
            Ok(descriptor) => {
                let alias = descriptor.alias.clone();
                descriptors.push(descriptor);
                FileReport {
                    path,
                    alias: Some(alias),
                    problems: Vec::new(),
                }
            }
            Err((alias, problems)) => FileReport {
                path,
                alias,
                problems,
            },
        };
        report.files.push(file_report);
    }

    if let Err(err) = ContentTypeSet::assemble(descriptors) {
        report.set_problems = err.violations.iter().map(|v| v.to_string()).collect();
    }

    debug!(
        files = report.files.len(),
        failed = report.failed(),
        set_problems = report.set_problems.len(),
        "check finished"
    );
    Ok(report)
}

async fn canonical_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf())
}

async fn canonical_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut canonical = Vec::with_capacity(paths.len());
    for path in paths {
        canonical.push(canonical_path(path).await);
    }
    canonical
}

async fn check_file(
    registry: &FieldTypeRegistry,
    path: &Path,
) -> Result<ContentTypeDescriptor, (Option<String>, Vec<String>)> {
    let document = load_document(path)
        .await
        .map_err(|e| (None, vec![e.to_string()]))?;
    document.build(registry).map_err(|e| {
        (
            Some(e.content_type.clone()),
            e.iter().map(|v| v.to_string()).collect(),
        )
    })
}

/// Run the check command. Fails with [`CliError::CheckFailed`] after printing
/// the report when anything is wrong.
pub async fn run_check(
    registry: &FieldTypeRegistry,
    paths: &[PathBuf],
    catalogs: &[PathBuf],
    json: bool,
) -> Result<(), CliError> {
    let report = check_paths(registry, paths, catalogs).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::CheckFailed {
            failed: report.failed(),
            total: report.files.len(),
            set_problems: report.set_problems.len(),
        })
    }
}

pub fn render_report(report: &CheckReport) -> String {
    if report.files.is_empty() {
        return "No declarations found.".to_string();
    }

    let mut table = new_table(&["File", "Content type", "Status", "Problems"]);
    for file in &report.files {
        table.add_row(vec![
            file.path.display().to_string(),
            file.alias.clone().unwrap_or_default(),
            if file.is_ok() { "ok" } else { "failed" }.to_string(),
            file.problems.join("\n"),
        ]);
    }

    let mut out = table.to_string();
    if !report.set_problems.is_empty() {
        out.push_str("\n\nProblems between content types:\n");
        for problem in &report.set_problems {
            out.push_str(&format!("  - {problem}\n"));
        }
    }
    out.push_str(&format!(
        "\n{} of {} declaration(s) valid.",
        report.files.len() - report.failed(),
        report.files.len()
    ));
    out
}
