//! # Compile Subcommand
//!
//! Compiles a project to its published artifact and checks the result
//! before it is written:
//!
//! - `json-schema`: the document must build as a Draft 2020-12 schema, and
//!   every object level must carry the project's `additionalProperties`.
//! - `jsonld-context`: the document must be a well-formed term context with
//!   an absolute `@id`.
//!
//! Compiler warnings (unnamed nodes, duplicate names, arrays without item
//! definitions) are logged. With `--deny-warnings` they fail the command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use credef_schema::{
    audit_strictness, compile_checked_as, CompileOptions, CompiledArtifact, SchemaMode,
    SchemaProject, DEFAULT_CONTEXT_BASE_URL, DEFAULT_VOCABULARY_BASE_URL,
};

/// Deployment URL namespaces, shared by commands that derive URLs.
#[derive(Args, Debug, Clone)]
pub struct NamespaceArgs {
    /// Base URL context documents are published under.
    #[arg(long, env = "CREDEF_CONTEXT_BASE_URL", default_value = DEFAULT_CONTEXT_BASE_URL)]
    pub context_base: String,

    /// Prefix for term IRIs of properties imported with a bare catalogue id.
    #[arg(long, env = "CREDEF_VOCABULARY_BASE_URL", default_value = DEFAULT_VOCABULARY_BASE_URL)]
    pub vocabulary_base: String,
}

impl NamespaceArgs {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            context_base_url: self.context_base.clone(),
            vocabulary_base_url: self.vocabulary_base.clone(),
        }
    }
}

/// Arguments for the `credef compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the project file.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Compile in this mode instead of the one in the project metadata.
    #[arg(long)]
    pub mode: Option<SchemaMode>,

    /// Write the document here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Exit with status 1 if the compiler reports any warning.
    #[arg(long)]
    pub deny_warnings: bool,

    #[command(flatten)]
    pub namespaces: NamespaceArgs,
}

/// Execute the compile subcommand.
///
/// Returns exit code: 0 on success, 1 if `--deny-warnings` rejected the
/// output.
pub fn run_compile(args: &CompileArgs) -> Result<u8> {
    let project = crate::load_project(&args.project)?;
    let mode = args.mode.unwrap_or(project.metadata.mode);
    let artifact = compile_checked_as(&project, mode, &args.namespaces.compile_options())
        .with_context(|| format!("failed to compile {}", args.project.display()))?;

    for warning in &artifact.warnings {
        tracing::warn!(
            node = %warning.node_id,
            path = %warning.path,
            kind = %warning.kind,
            "compiler warning"
        );
    }

    audit_artifact(&project, &artifact)?;

    if args.deny_warnings && !artifact.warnings.is_empty() {
        eprintln!(
            "{} warning(s) in {}; nothing written",
            artifact.warnings.len(),
            args.project.display()
        );
        return Ok(1);
    }

    crate::emit_document(&artifact.document, args.out.as_deref())?;
    eprintln!(
        "Compiled {} as {} ({}, {} warning(s))",
        args.project.display(),
        artifact.mode,
        artifact.digest,
        artifact.warnings.len()
    );
    Ok(0)
}

/// Every object level of a compiled schema must carry the project's
/// `additionalProperties` value.
fn audit_artifact(project: &SchemaProject, artifact: &CompiledArtifact) -> Result<()> {
    if artifact.mode != SchemaMode::JsonSchema {
        return Ok(());
    }
    let findings = audit_strictness(&artifact.document, project.metadata.additional_properties);
    if !findings.is_empty() {
        let listing: Vec<String> = findings.iter().map(ToString::to_string).collect();
        bail!(
            "additionalProperties is inconsistent at {} level(s):\n{}",
            findings.len(),
            listing.join("\n")
        );
    }
    Ok(())
}
