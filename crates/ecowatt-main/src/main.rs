// Copyright (c) 2025 ECOWATT LABS S.R.O.
//
// This file is part of EcoWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@ecowatt-labs.cz

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use parking_lot::RwLock;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use ecowatt_core::QLearningOptimizer;
use ecowatt_forecast::{AnomalyDetector, DemandForecaster};
use ecowatt_simulator::{TelemetryStore, generate_history, sample_at};
use ecowatt_types::EcowattConfig;
use ecowatt_web::AppState;

#[derive(Debug, Parser)]
#[command(name = "ecowatt", about = "EcoWatt - adaptive smart energy backend", version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "ecowatt.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train the optimizer, fit the models and serve the HTTP API (default)
    Serve,
    /// Run a training pass and print the learned policy table
    Train {
        /// Episodes to run
        #[arg(long)]
        episodes: Option<usize>,
    },
    /// Generate synthetic telemetry into the CSV store
    Simulate {
        /// Days of hourly history to generate
        #[arg(long)]
        days: Option<u32>,
        /// Keep appending one live sample per configured interval
        #[arg(long)]
        live: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Train { episodes } => train(&config, episodes),
        Command::Simulate { days, live } => simulate(&config, days, live).await,
    }
}

async fn serve(config: EcowattConfig) -> Result<()> {
    info!("🚀 Starting EcoWatt - adaptive smart energy backend");
    info!("📋 Configuration summary:");
    info!(
        "   Optimizer: {} regimes, alpha={}, gamma={}, epsilon={}",
        config.optimizer.regime_count,
        config.optimizer.alpha,
        config.optimizer.gamma,
        config.optimizer.epsilon
    );
    info!("   Startup training: {} episodes", config.optimizer.training_episodes);
    info!("   Telemetry store: {}", config.server.telemetry_csv_path);

    let mut rng = rand::thread_rng();

    // Telemetry history: reuse the store when present, otherwise seed it.
    let store = TelemetryStore::new(&config.server.telemetry_csv_path);
    if !store.exists() {
        info!(
            "No telemetry store found, generating {} days of synthetic history",
            config.simulator.history_days
        );
        let records = generate_history(Utc::now(), config.simulator.history_days, &mut rng);
        store.write_all(&records)?;
    }
    let records = store.load()?;

    let forecaster = DemandForecaster::fit(&records)?;
    let detector = AnomalyDetector::fit(&records)?;

    // Training runs to completion before the first request is served; the
    // handlers only ever read the table.
    let mut optimizer = QLearningOptimizer::new(&config.optimizer)?;
    optimizer.train(config.optimizer.training_episodes, &mut rng);

    let state = AppState {
        optimizer: Arc::new(RwLock::new(optimizer)),
        forecaster: Arc::new(forecaster),
        detector: Arc::new(detector),
        store,
    };
    ecowatt_web::start_server(state, &config.server.bind_address, config.server.port)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

fn train(config: &EcowattConfig, episodes: Option<usize>) -> Result<()> {
    let episodes = episodes.unwrap_or(config.optimizer.training_episodes);
    let mut rng = rand::thread_rng();

    let mut optimizer = QLearningOptimizer::new(&config.optimizer)?;
    let report = optimizer.train(episodes, &mut rng);
    let metrics = optimizer.metrics();

    println!(
        "Trained {} episodes, mean episode reward {:.2}",
        report.episodes, report.mean_episode_reward
    );
    println!("Policy table (rows = regimes, columns = {:?}):", metrics.actions);
    for (regime, row) in metrics.q_table.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:8.3}")).collect();
        println!("  regime {regime}: [{}]  avg {:.3}", cells.join(", "), metrics.avg_rewards[regime]);
    }
    Ok(())
}

async fn simulate(config: &EcowattConfig, days: Option<u32>, live: bool) -> Result<()> {
    let mut rng = rand::thread_rng();
    let store = TelemetryStore::new(&config.server.telemetry_csv_path);

    if !store.exists() {
        let days = days.unwrap_or(config.simulator.history_days);
        let records = generate_history(Utc::now(), days, &mut rng);
        store.write_all(&records)?;
        println!("Generated {} records into {}", records.len(), store.path().display());
    } else if let Some(days) = days {
        let records = generate_history(Utc::now(), days, &mut rng);
        store.write_all(&records)?;
        println!("Regenerated {} records into {}", records.len(), store.path().display());
    }

    if live {
        info!(
            "🌍 Live simulation running ({}s interval), Ctrl+C to stop",
            config.simulator.live_interval_secs
        );
        loop {
            let record = sample_at(Utc::now(), &mut rng);
            store.append(&record)?;
            tokio::time::sleep(Duration::from_secs(config.simulator.live_interval_secs)).await;
        }
    }
    Ok(())
}
