//! Threadmap Daemon - Main entry point
//!
//! Polls an OpenThread Border Router's REST API, reconciles the mesh
//! topology with the paired-device inventory, and publishes the result as
//! state files plus a rendered SVG.

mod config;
mod poller;
mod sensors;
mod state;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use threadmap_otbr::{probe_url, OtbrClient};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "threadmap")]
#[command(about = "Thread mesh topology polling and visualization daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "threadmap.toml")]
    config: PathBuf,

    /// Border router URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single refresh, print a summary, and exit
    #[arg(long)]
    once: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Threadmap v{}", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut cfg = config::load_config(&args.config)?;
    if let Some(url) = args.url {
        cfg.daemon.otbr_url = url;
    }

    let timeout = Duration::from_secs(cfg.daemon.request_timeout_secs);

    // Validate reachability before anything else, like the setup flow would
    match probe_url(&cfg.daemon.otbr_url, timeout).await {
        Ok(report) => {
            info!(
                url = %cfg.daemon.otbr_url,
                network = %report.network_name,
                "Connected to border router"
            );
        }
        Err(e) => {
            bail!("Border router at {} is unreachable: {e}", cfg.daemon.otbr_url);
        }
    }

    let inventory = config::load_inventory(Path::new(&cfg.inventory.path))?;
    let client = OtbrClient::new(&cfg.daemon.otbr_url, timeout)?;
    let state = state::AppState::new(cfg, client, inventory);

    if args.once {
        // Single refresh mode
        poller::refresh_once(&state)
            .await
            .map_err(anyhow::Error::from)?;

        let snapshot = state.snapshot();
        if let Some(topology) = snapshot.topology {
            println!(
                "Network '{}' ({}): {} nodes, {} devices",
                topology.network_name,
                topology.state,
                topology.nodes.len(),
                topology.total_devices
            );
            for node in topology.sorted_nodes() {
                println!(
                    "  - {} [{:?}] rloc 0x{:04X}, LQ {}, {} children",
                    node.name, node.role, node.rloc16, node.link_quality, node.child_count
                );
            }
        }
    } else {
        // Daemon mode - poll until interrupted
        tokio::select! {
            result = poller::run(state) => result?,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
            }
        }
    }

    Ok(())
}
