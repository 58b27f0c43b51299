//! Screener CLI
//!
//! Command-line interface for the OFAC crypto wallet screener.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener_api::{ApiConfig, ApiServer};
use screener_cache::Snapshot;
use screener_core::normalize_address;
use screener_core::traits::DocumentSource;
use screener_sdn::{extract_addresses, FetchConfig, SdnFetcher};

/// Screener - OFAC crypto wallet screening
#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server with the background refresh loop
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Download the SDN list once and check a single address
    Check {
        /// The wallet address to check
        address: String,
        /// SDN list URL
        #[arg(long, env = "SDN_URL")]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "screener=debug,info"
    } else {
        "screener=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Check { address, url } => cmd_check(&address, url).await,
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);

    // Keep the handle alive for the lifetime of the process; the loop owns
    // the periodic refresh schedule.
    let _refresh_loop = server.state().start_background_refresh();

    let ip: IpAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    println!(
        "{}",
        format!("🛡  Screener API listening on {}:{}", bind, port)
            .cyan()
            .bold()
    );

    server
        .run(SocketAddr::new(ip, port))
        .await
        .context("Server error")?;

    Ok(())
}

/// One-shot download and check
async fn cmd_check(address: &str, url: Option<String>) -> Result<()> {
    let config = match url {
        Some(url) => FetchConfig::with_url(url),
        None => FetchConfig::default(),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    spinner.set_message("Downloading OFAC SDN list...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let fetcher = SdnFetcher::with_config(config);
    let document = fetcher.fetch().await.context("Failed to download SDN list")?;

    spinner.set_message("Extracting crypto addresses...");
    let triples = extract_addresses(&document).context("Failed to parse SDN list")?;
    let snapshot = Snapshot::from_records(triples);

    spinner.finish_and_clear();
    println!(
        "Loaded {} sanctioned crypto addresses.",
        snapshot.len().to_string().bold()
    );

    match snapshot.get(&normalize_address(address)) {
        Some(record) => {
            println!("{}", "⚠ SANCTIONED".red().bold());
            println!("  entity:   {}", record.entity);
            println!("  id type:  {}", record.currency_label);
        }
        None => {
            println!("{}", "✓ Not on the SDN list".green().bold());
        }
    }

    Ok(())
}
