//! Firewatch CLI
//!
//! Command-line interface that works directly on the observation snapshot:
//! - Show state and the safety panel
//! - Dispatch actions or set observation fields
//! - Run one recommendation cycle
//! - Reset state, generate config

use anyhow::Context;
use clap::{Parser, Subcommand};
use firewatch::api::dto::{ActionBatch, ObservationUpdate};
use firewatch::config::{generate_default_config, Config};
use firewatch::logging::init_tracing;
use firewatch::recommend::{
    CycleOutcome, HttpRecommendationClient, PanelReport, RecommendationFetcher,
};
use firewatch::state::{Action, ObservationState, ObservationStore};
use firewatch::storage::{FileSnapshotStorage, SnapshotStorage};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "firewatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and update the wildfire observation state")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current state and recommendation panel
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dispatch one action or a JSON array of actions
    Dispatch {
        /// e.g. '{"type": "SET_CURRENT_SEVERITY", "payload": 4}'
        actions: String,
    },

    /// Set observation fields
    Observe {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(long)]
        severity: Option<i64>,
        #[arg(long)]
        weather: Option<String>,
        /// Temperature (°F)
        #[arg(long, allow_hyphen_values = true)]
        temp: Option<f64>,
        /// Wind speed (mph)
        #[arg(long)]
        wind: Option<f64>,
        /// Relative humidity (%)
        #[arg(long)]
        humidity: Option<f64>,
        #[arg(long)]
        population: Option<f64>,
        /// Active fire count
        #[arg(long)]
        fires: Option<u64>,
        #[arg(long)]
        region: Option<String>,
    },

    /// Run one recommendation cycle against the configured service
    Recommend,

    /// Reset the observation state
    Reset {
        /// Only clear recommendations, loading flag, and error
        #[arg(long)]
        recommendations_only: bool,
        /// Delete the snapshot file instead of writing defaults
        #[arg(long, conflicts_with = "recommendations_only")]
        purge: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let resolved = Config::resolve(cli.config.as_deref()).context("loading configuration")?;
    let config = resolved.config.clone();
    init_tracing(&config.logging);
    resolved.log_outcome();

    let storage = Arc::new(FileSnapshotStorage::new(config.storage.snapshot_config()));

    if let Commands::Reset { purge: true, .. } = &cli.command {
        storage.clear().context("removing snapshot")?;
        println!("Removed {}", storage.path().display());
        return Ok(());
    }

    let store = Arc::new(ObservationStore::load(storage));

    match cli.command {
        Commands::Status { json } => {
            let state = store.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print_state(&state);
            }
        }

        Commands::Dispatch { actions } => {
            let batch: ActionBatch =
                serde_json::from_str(&actions).context("parsing actions")?;
            let actions = batch.into_actions();

            for action in &actions {
                if !action.is_known() {
                    eprintln!("Ignoring unknown action type {}", action.name());
                }
            }

            let state = store.dispatch_all(actions);
            print_state(&state);
        }

        Commands::Observe {
            lat,
            lng,
            severity,
            weather,
            temp,
            wind,
            humidity,
            population,
            fires,
            region,
        } => {
            let update = ObservationUpdate {
                latitude: lat,
                longitude: lng,
                severity,
                population,
                weather,
                wind_speed: wind,
                humidity,
                temperature: temp,
                active_fire_count: fires,
                selected_region: region,
            };

            if let Err(e) = update.validate() {
                eprintln!("{}", e);
                std::process::exit(1);
            }

            let actions = update.into_actions();
            if actions.is_empty() {
                eprintln!("Nothing to set; pass at least one field (see --help)");
                std::process::exit(1);
            }

            let state = store.dispatch_all(actions);
            print_state(&state);
        }

        Commands::Recommend => {
            let client = HttpRecommendationClient::new(config.recommendations.client_config())
                .context("building recommendation client")?;
            let fetcher = RecommendationFetcher::new(Arc::clone(&store), Arc::new(client));

            match fetcher.run_cycle().await {
                CycleOutcome::NotReady => {
                    println!("Latitude, longitude, and weather are required; recommendations cleared.")
                }
                CycleOutcome::NoActiveFires => println!("No active fires detected."),
                CycleOutcome::Fetched(count) => println!("Received {} recommendation(s).", count),
                CycleOutcome::Failed => println!("Recommendation request failed."),
            }
            println!();
            print!("{}", PanelReport::from_state(&store.snapshot()));
        }

        Commands::Reset {
            recommendations_only,
            ..
        } => {
            let action = if recommendations_only {
                Action::ResetRecommendations
            } else {
                Action::ResetAll
            };
            let state = store.dispatch_all([action]);
            print_state(&state);
        }

        // Handled before the configuration is loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_state(state: &ObservationState) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    println!("{:<16} {}", "Region", or_dash(state.selected_region.clone()));
    println!("{:<16} {}", "Population", or_dash(state.population.map(|v| v.to_string())));
    println!("{:<16} {}", "Loading", state.recommendations_loading);
    println!();
    print!("{}", PanelReport::from_state(state));
}
