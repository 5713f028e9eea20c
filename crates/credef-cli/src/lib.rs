//! # credef-cli: CLI Tool for Credential Schema Projects
//!
//! Provides the `credef` command-line interface over the schema model and
//! compiler in `credef-schema`.
//!
//! ## Subcommands
//!
//! - `credef new`: Create an empty project file.
//! - `credef compile`: Compile a project to a JSON Schema or a JSON-LD
//!   context, check the output, and print or write it.
//! - `credef context-url`: Derive the URL a context document would carry.
//! - `credef import`: Import vocabulary candidates from a file or from the
//!   catalog.
//! - `credef issuers`: List active issuers from the catalog.
//!
//! Project files are JSON unless their extension is `.yaml` or `.yml`:
//!
//! ```bash
//! credef new home.json --title "Home Credential" --category property
//! credef import home.json --classification property
//! credef compile home.json --mode jsonld-context --out home.context.json
//! ```

pub mod compile;
pub mod context_url;
pub mod import;
pub mod issuers;
pub mod new;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use credef_schema::SchemaProject;

/// On-disk encoding of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Json,
    Yaml,
}

impl ProjectFormat {
    /// Pick the encoding from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read a project file.
pub fn load_project(path: &Path) -> Result<SchemaProject> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read project file: {}", path.display()))?;
    let project = match ProjectFormat::from_path(path) {
        ProjectFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse project JSON: {}", path.display()))?,
        ProjectFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse project YAML: {}", path.display()))?,
    };
    Ok(project)
}

/// Write a project file, replacing any existing one.
pub fn save_project(path: &Path, project: &SchemaProject) -> Result<()> {
    let content = match ProjectFormat::from_path(path) {
        ProjectFormat::Json => {
            let mut json = serde_json::to_string_pretty(project)
                .context("failed to serialize project")?;
            json.push('\n');
            json
        }
        ProjectFormat::Yaml => {
            serde_yaml::to_string(project).context("failed to serialize project")?
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write project file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), project = %project.id, "project saved");
    Ok(())
}

/// Write a compiled document as pretty JSON to `out`, or to stdout.
pub fn emit_document(document: &Value, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("failed to serialize document")?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write output: {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credef_schema::{PropertyUpdate, SchemaMetadata};

    fn sample() -> SchemaProject {
        let mut project = SchemaProject::new(SchemaMetadata::titled("Home Credential"));
        let id = project.properties.add_property(None).unwrap().unwrap();
        project
            .properties
            .update_property(id, PropertyUpdate::new().name("address").required(true));
        project
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ProjectFormat::from_path(Path::new("a.yaml")), ProjectFormat::Yaml);
        assert_eq!(ProjectFormat::from_path(Path::new("a.YML")), ProjectFormat::Yaml);
        assert_eq!(ProjectFormat::from_path(Path::new("a.json")), ProjectFormat::Json);
        assert_eq!(ProjectFormat::from_path(Path::new("project")), ProjectFormat::Json);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        let project = sample();
        save_project(&path, &project).unwrap();
        assert_eq!(load_project(&path).unwrap(), project);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("home.yaml");
        let project = sample();
        save_project(&path, &project).unwrap();
        assert_eq!(load_project(&path).unwrap(), project);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_project(&dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read project file"));
    }

    #[test]
    fn test_emit_document_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        emit_document(&serde_json::json!({"type": "object"}), Some(&path)).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["type"], "object");
    }
}
