//! # Issuers Subcommand
//!
//! Lists the catalog's active credential issuers.

use anyhow::{Context, Result};
use clap::Args;

use credef_catalog_client::{CatalogApiConfig, CatalogClient, Issuer};

/// Arguments for the `credef issuers` subcommand.
#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the issuers subcommand.
pub fn run_issuers(args: &IssuersArgs) -> Result<u8> {
    let config = CatalogApiConfig::from_env().context("catalog is not configured")?;
    let client = CatalogClient::new(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let issuers = runtime
        .block_on(client.issuers().list_active())
        .context("failed to list issuers")?;
    tracing::info!(count = issuers.len(), "active issuers listed");

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&issuers).context("failed to serialize issuers")?
        );
    } else {
        for issuer in &issuers {
            println!("{}", issuer_row(issuer));
        }
    }
    Ok(0)
}

fn issuer_row(issuer: &Issuer) -> String {
    format!(
        "{}  {}  {}",
        issuer.id,
        issuer.name,
        issuer.decentralized_identifier.as_deref().unwrap_or("-")
    )
}
