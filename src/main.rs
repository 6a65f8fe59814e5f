//! Plant tracker navigation controller, headless driver.
//!
//! # Architecture Overview
//!
//! ```text
//!     location change      ┌──────────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ routing ──▶ navigation ──▶ loader ──▶ backend  │
//!                          │    match      controller     GET +      (JSON)    │
//!                          │                   │          classify             │
//!                          │                   ▼                               │
//!     page components      │   context ◀── prefetch cache                      │
//!     ◀────────────────────┼── (read + refresh)                                │
//!                          │                                                    │
//!                          │   config · observability (tracing, metrics)       │
//!                          └──────────────────────────────────────────────────┘
//! ```
//!
//! Drives the controller from the command line: visit a sequence of paths
//! against a live backend and print the settled state.

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use plant_nav::config::{load_config, validation::validate_config, ConfigError, NavigatorConfig};
use plant_nav::loader::{HttpLoader, NoopPreloader};
use plant_nav::navigation::{
    HeadlessHost, Location, NavigationController, RefreshOutcome, TransitionOutcome,
};
use plant_nav::observability::{logging::init_logging, metrics::init_metrics};

#[derive(Parser)]
#[command(name = "plant-nav")]
#[command(about = "Headless driver for the plant tracker navigation controller", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override backend.base_url from the configuration.
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate through paths in order and print the settled state
    Visit {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Mount at a path, then refresh it
    Refresh { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NavigatorConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability);
    tracing::info!(base_url = %config.backend.base_url, "plant-nav starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let host = Arc::new(HeadlessHost::new());
    let loader = Arc::new(HttpLoader::new(&config, Arc::new(NoopPreloader))?);
    let nav = NavigationController::new(loader, host.clone());

    let report = match cli.command {
        Commands::Visit { paths } => {
            for path in paths {
                let outcome = nav.location_changed(Location::parse(&path)).await;
                tracing::info!(path = %path, outcome = ?outcome, "Navigation settled");
                if matches!(outcome, TransitionOutcome::Redirected { .. }) {
                    break;
                }
            }
            state_report(&nav, &host)
        }
        Commands::Refresh { path } => {
            nav.location_changed(Location::parse(&path)).await;
            let outcome = match nav.refresh(Some(&path)).await {
                RefreshOutcome::NotApplicable => json!("not_applicable"),
                RefreshOutcome::Refreshed { version } => json!({ "refreshed": version }),
                RefreshOutcome::Rejected(result) => json!({ "rejected": result }),
            };
            let mut report = state_report(&nav, &host);
            report["refresh"] = outcome;
            report
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn state_report(nav: &NavigationController, host: &HeadlessHost) -> Value {
    let snapshot = nav.snapshot();
    json!({
        "snapshot": snapshot.as_ref(),
        "title": host.title(),
        "redirected_to": host.redirected_to(),
        "page": nav.context().displayed_result().map(|page| page.as_ref().clone()),
    })
}
