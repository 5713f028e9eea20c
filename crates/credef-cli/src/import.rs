//! # Import Subcommand
//!
//! Imports vocabulary candidates into a project, either from a local file
//! or from the catalog's vocabulary endpoint. Candidates whose source id or
//! name already appears among the target's children are skipped.
//!
//! Catalog access reads `CREDEF_CATALOG_URL`, `CREDEF_CATALOG_TOKEN` and
//! `CREDEF_CATALOG_TIMEOUT_SECS`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args};
use serde::Deserialize;

use credef_catalog_client::{CatalogApiConfig, CatalogClient};
use credef_core::PropertyId;
use credef_schema::{
    EditorState, ImportOutcome, ImportReport, PropertyTree, SkipReason, VocabularyCandidate,
};

/// Arguments for the `credef import` subcommand.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["candidates", "classification"])))]
pub struct ImportArgs {
    /// Path to the project file.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Read candidates from a JSON or YAML file.
    #[arg(long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    /// Fetch candidates for this classification from the catalog.
    #[arg(long, value_name = "NAME")]
    pub classification: Option<String>,

    /// Import under this object property instead of the top level.
    #[arg(long, value_name = "PROPERTY_ID")]
    pub parent: Option<PropertyId>,

    /// Report what would be imported without saving the project.
    #[arg(long)]
    pub dry_run: bool,
}

/// A candidates file holds either a bare list or `{ "candidates": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateFile {
    List(Vec<VocabularyCandidate>),
    Wrapped { candidates: Vec<VocabularyCandidate> },
}

/// Execute the import subcommand.
///
/// Returns exit code: 0 on success, 1 if the parent property does not
/// exist.
pub fn run_import(args: &ImportArgs) -> Result<u8> {
    let project = crate::load_project(&args.project)?;
    let mut editor = EditorState::from_project(project);

    let outcome = match (&args.candidates, &args.classification) {
        (Some(path), _) => {
            let candidates = load_candidates(path)?;
            let ticket = editor.begin_import(args.parent);
            editor.complete_import(ticket, &candidates)?
        }
        (None, Some(classification)) => fetch_and_apply(&mut editor, args.parent, classification)?,
        (None, None) => bail!("either --candidates or --classification is required"),
    };

    match outcome {
        ImportOutcome::Applied(report) => {
            print_report(editor.tree(), &report);
            if args.dry_run {
                println!("Dry run: {} not modified", args.project.display());
            } else {
                crate::save_project(&args.project, editor.project())?;
            }
            Ok(0)
        }
        ImportOutcome::TargetMissing => {
            eprintln!(
                "parent property not found in {}: {}",
                args.project.display(),
                args.parent.map(|id| id.to_string()).unwrap_or_default()
            );
            Ok(1)
        }
        ImportOutcome::Stale => bail!("import was superseded before it completed"),
    }
}

fn load_candidates(path: &Path) -> Result<Vec<VocabularyCandidate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read candidates file: {}", path.display()))?;
    let file: CandidateFile = match crate::ProjectFormat::from_path(path) {
        crate::ProjectFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse candidates JSON: {}", path.display()))?,
        crate::ProjectFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse candidates YAML: {}", path.display()))?,
    };
    Ok(match file {
        CandidateFile::List(candidates) | CandidateFile::Wrapped { candidates } => candidates,
    })
}

fn fetch_and_apply(
    editor: &mut EditorState,
    parent: Option<PropertyId>,
    classification: &str,
) -> Result<ImportOutcome> {
    let config = CatalogApiConfig::from_env().context("catalog is not configured")?;
    let client = CatalogClient::new(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    tracing::info!(classification, "fetching vocabulary candidates");
    let outcome = runtime
        .block_on(editor.import_from_source(&client, parent, classification))
        .with_context(|| format!("import of classification '{classification}' failed"))?;
    Ok(outcome)
}

fn print_report(tree: &PropertyTree, report: &ImportReport) {
    println!(
        "Imported {} propert{}, skipped {}",
        report.imported_count(),
        if report.imported_count() == 1 { "y" } else { "ies" },
        report.skipped_count()
    );
    for id in &report.imported {
        if let Some(node) = tree.find(*id) {
            println!("  + {} ({}) {}", node.name(), node.property_type().as_str(), id);
        }
    }
    for skipped in &report.skipped {
        let reason = match skipped.reason {
            SkipReason::AlreadyImported => "already imported",
            SkipReason::NameTaken => "name taken",
        };
        println!("  = {} ({reason}, existing {})", skipped.name, skipped.existing);
    }
}
