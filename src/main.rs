use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cad_discovery::client::{ApsClient, ResourceClient};
use cad_discovery::config::Config;
use cad_discovery::discovery::HierarchyWalker;
use cad_discovery::report::{DiscoveryReport, FailureReport, SingleViewReport};
use cad_discovery::viewer::{extract_views, tree_render, ManifestResolver};

#[derive(Parser)]
#[command(name = "cad-discovery")]
#[command(about = "Find CAD files in a cloud model repository and resolve their viewer handles")]
struct Cli {
    /// API host (overrides APS_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hubs visible to the access token
    Hubs,
    /// Walk hubs and list every CAD file
    Discover {
        /// Hub name or id to include (repeatable; default: all hubs)
        #[arg(long = "hub")]
        hubs: Vec<String>,

        /// Worker pool size (overrides CAD_DISCOVERY_WORKERS)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Recurse into subfolders inline instead of fanning out on the pool
        #[arg(long)]
        sequential: bool,

        /// Also resolve 2D/3D view GUIDs for every file found
        #[arg(long)]
        views: bool,
    },
    /// Resolve the view GUIDs of a single version URN
    Views {
        /// Version URN of the file
        urn: String,

        /// Print the manifest as a tree instead of JSON
        #[arg(long)]
        tree: bool,
    },
}

/// Initialize tracing on stderr so stdout carries only the JSON report.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "cad_discovery=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Hubs => {
            let client = ApsClient::from_config(&config)?;
            let hubs = client.list_hubs().await?;
            println!("{}", serde_json::to_string_pretty(&hubs)?);
        }
        Commands::Discover {
            hubs,
            workers,
            sequential,
            views,
        } => {
            if let Some(workers) = workers {
                config = config.with_workers(workers);
            }
            if sequential {
                config.fan_out_subfolders = false;
            }

            let client = Arc::new(ApsClient::from_config(&config)?);
            let walker = HierarchyWalker::new(Arc::clone(&client), &config);
            let discovery = walker.discover(&hubs).await?;

            let mut failures: Vec<FailureReport> =
                discovery.failures.iter().map(FailureReport::from).collect();

            let view_report = if views {
                let report = ManifestResolver::new(client)
                    .resolve_all(&discovery.items, walker.pool())
                    .await;
                failures.extend(report.failures.iter().map(FailureReport::from));
                Some(report.views)
            } else {
                None
            };

            let report = DiscoveryReport {
                items: &discovery.items,
                views: view_report.as_deref(),
                failures,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Views { urn, tree } => {
            let client = Arc::new(ApsClient::from_config(&config)?);
            let fetched = ManifestResolver::new(client).fetch(&urn).await;

            match fetched {
                Ok(manifest) if tree => print!("{}", tree_render::render_manifest(&manifest)),
                fetched => {
                    let outcome = fetched.and_then(|manifest| extract_views(&urn, &manifest));
                    let report = SingleViewReport::new(&urn, outcome);
                    if let Some(failure) = &report.failure {
                        warn!(urn = %urn, error = %failure.error, "View resolution failed");
                    }
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
    }

    Ok(())
}
