//! Vault Inspection Tool
//!
//! Fetches (or loads) a vault snapshot, groups it by underlying asset and
//! prints the eligible vaults per asset.
//!
//! Usage:
//!   cargo run --bin vault_inspect -- fetch --chain-id 1
//!   cargo run --bin vault_inspect -- file --path ./snapshot.json --json

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use vaultboard_backend::{
    models::{AssetGroup, VaultRecord},
    scrapers::{load_snapshot_file, morpho_api::MORPHO_API_URL, MorphoClient},
    vault::{aggregate_owned, VaultHighlights},
};

/// Inspect asset groupings of Morpho vaults
#[derive(Parser, Debug)]
#[command(name = "vault_inspect")]
#[command(about = "Group Morpho vaults by underlying asset and list the eligible ones")]
struct Cli {
    /// Print the grouped assets as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the live snapshot for a chain
    Fetch {
        /// Chain to query
        #[arg(short, long, default_value = "1")]
        chain_id: u64,

        /// GraphQL endpoint
        #[arg(long, env = "MORPHO_API_URL", default_value = MORPHO_API_URL)]
        endpoint: String,

        /// Request timeout in seconds
        #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
        timeout_secs: u64,
    },

    /// Load a saved GraphQL response (or bare item array) from disk
    File {
        #[arg(short, long)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let records: Vec<VaultRecord> = match cli.command {
        Commands::Fetch {
            chain_id,
            endpoint,
            timeout_secs,
        } => {
            let client = MorphoClient::new(endpoint, Duration::from_secs(timeout_secs.max(1)))?;
            client.fetch_vaults(chain_id).await?
        }
        Commands::File { path } => load_snapshot_file(&path)?,
    };

    let record_count = records.len();
    let groups = aggregate_owned(records);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!("=== Vault Snapshot ===\n");
    println!("Records:        {}", record_count);
    println!("Assets listed:  {}", groups.len());
    println!(
        "Eligible vaults: {}",
        groups.iter().map(|g| g.vaults.len()).sum::<usize>()
    );
    println!();

    for group in &groups {
        print_group(group);
    }

    Ok(())
}

fn print_group(group: &AssetGroup) {
    println!(
        "{:<8} {}  ({} vaults)",
        group.symbol,
        group.address,
        group.vaults.len()
    );

    let highlights = VaultHighlights::for_group(group);
    if let Some(v) = &highlights.high_tvl {
        println!("  top tvl:  {} {}", v.symbol, v.address);
    }
    for v in &highlights.high_apy {
        println!(
            "  top apy:  {} {} net_apy={}",
            v.symbol,
            v.address,
            v.state.net_apy.unwrap_or_default()
        );
    }

    for v in &group.vaults {
        println!(
            "    - {:<12} {} whitelisted={} net_apy={}",
            v.symbol,
            v.address,
            v.whitelisted,
            v.state.net_apy.unwrap_or_default()
        );
    }
    println!();
}
