//! # Context-URL Subcommand
//!
//! Prints the URL a context document would identify itself with, from
//! explicit values or from a project's metadata.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use credef_schema::{derive_context_url_with_base, DEFAULT_CONTEXT_BASE_URL};

/// Arguments for the `credef context-url` subcommand.
#[derive(Args, Debug)]
pub struct ContextUrlArgs {
    /// Read title, category and credential name from this project.
    #[arg(long, conflicts_with_all = ["title", "category", "credential_name"])]
    pub project: Option<PathBuf>,

    /// Schema title.
    #[arg(long)]
    pub title: Option<String>,

    /// Credential category.
    #[arg(long)]
    pub category: Option<String>,

    /// Explicit URL leaf.
    #[arg(long)]
    pub credential_name: Option<String>,

    /// Base URL context documents are published under.
    #[arg(long, env = "CREDEF_CONTEXT_BASE_URL", default_value = DEFAULT_CONTEXT_BASE_URL)]
    pub context_base: String,
}

/// Execute the context-url subcommand.
pub fn run_context_url(args: &ContextUrlArgs) -> Result<u8> {
    println!("{}", resolve_url(args)?);
    Ok(0)
}

fn resolve_url(args: &ContextUrlArgs) -> Result<String> {
    if let Some(path) = &args.project {
        let project = crate::load_project(path)?;
        let metadata = &project.metadata;
        return Ok(derive_context_url_with_base(
            &args.context_base,
            &metadata.title,
            metadata.category.as_deref(),
            metadata.credential_name.as_deref(),
        ));
    }

    if args.title.is_none() && args.credential_name.is_none() {
        bail!("either --title, --credential-name or --project is required");
    }
    Ok(derive_context_url_with_base(
        &args.context_base,
        args.title.as_deref().unwrap_or_default(),
        args.category.as_deref(),
        args.credential_name.as_deref(),
    ))
}
