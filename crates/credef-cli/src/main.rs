//! # credef CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credef_cli::compile::{run_compile, CompileArgs};
use credef_cli::context_url::{run_context_url, ContextUrlArgs};
use credef_cli::import::{run_import, ImportArgs};
use credef_cli::issuers::{run_issuers, IssuersArgs};
use credef_cli::new::{run_new, NewArgs};

/// Credential schema toolchain.
///
/// Edits property-tree projects and compiles them to a JSON Schema for
/// validating credential subjects or a JSON-LD context for their terms.
#[derive(Parser, Debug)]
#[command(name = "credef", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty project file.
    New(NewArgs),

    /// Compile a project to a JSON Schema or a JSON-LD context.
    Compile(CompileArgs),

    /// Derive the URL a context document identifies itself with.
    ContextUrl(ContextUrlArgs),

    /// Import vocabulary candidates from a file or the catalog.
    Import(ImportArgs),

    /// List active issuers from the catalog.
    Issuers(IssuersArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "credef CLI starting");

    let result = match cli.command {
        Commands::New(args) => run_new(&args),
        Commands::Compile(args) => run_compile(&args),
        Commands::ContextUrl(args) => run_context_url(&args),
        Commands::Import(args) => run_import(&args),
        Commands::Issuers(args) => run_issuers(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
