//! Firewatch API Server
//!
//! Owns the observation store, runs the recommendation fetcher in the
//! background, and serves the dashboard API.
//!
//! Run with: cargo run --bin firewatch -- --config ./config.toml
//!
//! Environment variables override the config file, see `firewatch-cli config`.

use anyhow::Context;
use clap::Parser;
use firewatch::api::{serve, AppState};
use firewatch::config::Config;
use firewatch::logging::init_tracing;
use firewatch::recommend::{HttpRecommendationClient, RecommendationFetcher};
use firewatch::state::ObservationStore;
use firewatch::storage::FileSnapshotStorage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "firewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wildfire observation state server")]
struct Args {
    /// Config file (default: standard locations, then environment)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let resolved = Config::resolve(args.config.as_deref()).context("loading configuration")?;
    let config = resolved.config.clone();

    init_tracing(&config.logging);
    resolved.log_outcome();

    tracing::info!("Starting Firewatch v{}", env!("CARGO_PKG_VERSION"));

    let snapshot_config = config.storage.snapshot_config();
    tracing::info!("Snapshot file: {:?}", snapshot_config.path());

    let store = Arc::new(ObservationStore::load(Arc::new(FileSnapshotStorage::new(
        snapshot_config,
    ))));

    let (state, fetcher_handle) = if config.recommendations.enabled {
        tracing::info!(
            endpoint = %config.recommendations.endpoint,
            "Recommendation fetcher enabled"
        );

        let client = HttpRecommendationClient::new(config.recommendations.client_config())
            .context("building recommendation client")?;
        let fetcher = Arc::new(RecommendationFetcher::new(
            Arc::clone(&store),
            Arc::new(client),
        ));
        let handle = Arc::clone(&fetcher).start();

        (AppState::with_fetcher(store, fetcher), Some(handle))
    } else {
        tracing::info!("Recommendation fetcher disabled");
        (AppState::new(store), None)
    };

    serve(state, &config.api).await?;

    if let Some(handle) = fetcher_handle {
        handle.abort();
    }

    tracing::info!("Firewatch shutdown complete");
    Ok(())
}
