//! # New Subcommand
//!
//! Creates a project file with metadata and zero top-level properties.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use credef_schema::{SchemaMetadata, SchemaMode, SchemaProject};

/// Arguments for the `credef new` subcommand.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Path of the project file to create (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PROJECT")]
    pub path: PathBuf,

    /// Schema title.
    #[arg(long)]
    pub title: String,

    /// Schema description.
    #[arg(long)]
    pub description: Option<String>,

    /// Artifact the project publishes (json-schema or jsonld-context).
    #[arg(long, default_value = "json-schema")]
    pub mode: SchemaMode,

    /// Credential category; becomes a context URL path segment.
    #[arg(long)]
    pub category: Option<String>,

    /// Context URL leaf. Defaults to the slugified title.
    #[arg(long)]
    pub credential_name: Option<String>,

    /// Reject undeclared attributes at every object level.
    #[arg(long)]
    pub strict: bool,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Execute the new subcommand.
pub fn run_new(args: &NewArgs) -> Result<u8> {
    if args.path.exists() && !args.force {
        bail!(
            "project file already exists: {} (use --force to overwrite)",
            args.path.display()
        );
    }

    let project = SchemaProject::new(metadata_from(args));
    crate::save_project(&args.path, &project)?;

    tracing::info!(project = %project.id, path = %args.path.display(), "project created");
    println!("Created {} ({})", args.path.display(), project.id);
    Ok(0)
}

fn metadata_from(args: &NewArgs) -> SchemaMetadata {
    SchemaMetadata {
        title: args.title.clone(),
        description: args.description.clone(),
        mode: args.mode,
        category: args.category.clone(),
        credential_name: args.credential_name.clone(),
        additional_properties: !args.strict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: PathBuf) -> NewArgs {
        NewArgs {
            path,
            title: "Home Credential".into(),
            description: None,
            mode: SchemaMode::JsonldContext,
            category: Some("property".into()),
            credential_name: None,
            strict: true,
            force: false,
        }
    }

    #[test]
    fn test_new_writes_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.json");
        assert_eq!(run_new(&args(path.clone())).unwrap(), 0);

        let project = crate::load_project(&path).unwrap();
        assert!(project.properties.is_empty());
        assert_eq!(project.metadata.title, "Home Credential");
        assert_eq!(project.metadata.mode, SchemaMode::JsonldContext);
        assert!(!project.metadata.additional_properties);
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.yaml");
        run_new(&args(path.clone())).unwrap();
        let err = run_new(&args(path.clone())).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let mut forced = args(path);
        forced.force = true;
        assert_eq!(run_new(&forced).unwrap(), 0);
    }
}
