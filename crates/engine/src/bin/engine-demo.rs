//! engine-demo — run predictive-maintenance cycles over the demo fleet.
//!
//! Seeds an in-memory store with the two-vehicle demo fleet, drifts
//! each vehicle's telemetry between cycles, runs the full pipeline, and
//! prints cycle summaries plus the final per-agent trust table.
//!
//! Uses the Gemini oracle when `GEMINI_API_KEY` is set; otherwise the
//! deterministic fallback heuristics carry diagnosis alone.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use automind_core::config::{load_dotenv, Config};
use automind_engine::{DiagnosisStage, DriftSimulator, EngineStore, MemoryStore, Orchestrator, TrustScorer};
use automind_oracle::{AnomalyOracle, GeminiOracle};

#[derive(Parser, Debug)]
#[command(name = "engine-demo", version, about)]
struct Cli {
    /// Cycles to run per vehicle.
    #[arg(long, default_value_t = 3)]
    cycles: u32,

    /// Seed for the drift and trust-glitch RNGs (reproducible runs).
    #[arg(long)]
    seed: Option<u64>,

    /// Skip telemetry drift between cycles.
    #[arg(long)]
    no_drift: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let oracle: Option<Arc<dyn AnomalyOracle>> = match &config.oracle.api_key {
        Some(key) => {
            let oracle = GeminiOracle::new(
                key.clone(),
                config.oracle.model.clone(),
                Duration::from_millis(config.oracle.timeout_ms),
            )
            .context("failed to build gemini oracle")?;
            info!(model = %config.oracle.model, "gemini oracle configured");
            Some(Arc::new(oracle))
        }
        None => {
            info!("no GEMINI_API_KEY set, running fallback heuristics only");
            None
        }
    };

    let scorer = match cli.seed {
        Some(seed) => TrustScorer::with_seed(seed),
        None => TrustScorer::new(),
    };
    let drift = match cli.seed {
        Some(seed) => DriftSimulator::with_seed(seed),
        None => DriftSimulator::new(),
    };

    let store = Arc::new(MemoryStore::with_demo_fleet());
    let orchestrator = Orchestrator::new(
        store.clone(),
        DiagnosisStage::new(oracle),
        Arc::new(scorer),
    );

    for cycle in 1..=cli.cycles {
        for id in store.vehicle_ids() {
            if !cli.no_drift {
                let (vehicle, snapshot) = store
                    .get_vehicle(&id)
                    .await
                    .context("demo vehicle disappeared")?;
                store.set_snapshot(&id, drift.drift(&vehicle.model, &snapshot));
            }

            match orchestrator.run_cycle(&id).await {
                Ok(outcome) => {
                    println!(
                        "[cycle {}] {} ({:?}, health {}): {}",
                        cycle,
                        outcome.vehicle.model,
                        outcome.vehicle.status,
                        outcome.vehicle.health_score,
                        outcome.summary
                    );
                }
                Err(e) => warn!(vehicle = %id, error = %e, "cycle failed"),
            }
        }
    }

    println!("\nAgent trust scores:");
    let mut scores: Vec<_> = orchestrator
        .agent_trust_scores()
        .await
        .context("trust scores unavailable")?
        .into_iter()
        .collect();
    scores.sort();
    for (agent, score) in scores {
        println!("  {:<20} {:>3}", agent, score);
    }

    let events = orchestrator.list_trust_events().await?;
    println!("{} trust events recorded", events.len());

    Ok(())
}
