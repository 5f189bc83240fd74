//! Headless monitor: runs the engine for a while and reports quality metrics
//!
//! Usage: `biofusion-monitor [CONFIG_FILE] [SECONDS]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use biofusion_core::config::{ConfigError, ConfigLoader};
use biofusion_core::engine::{EngineState, TickScheduler};
use biofusion_core::quality::QualityAssessment;
use biofusion_core::view::{chart_points, snapshot_readouts};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_RUN_SECONDS: u64 = 5;
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let loader = match args.next() {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            ConfigLoader::with_paths(vec![path])
        }
        None => ConfigLoader::new(),
    };
    let run_seconds = match args.next() {
        Some(raw) => raw.parse::<u64>()?,
        None => DEFAULT_RUN_SECONDS,
    };

    let config = loader.load()?;
    let summary = config.get_summary();
    info!(
        seed = summary.seed,
        tick_interval_ms = summary.tick_interval_ms,
        window_seconds = summary.window_seconds,
        run_seconds,
        "Starting monitor"
    );
    let chart_limit = config.display.chart_points;

    let mut handle = TickScheduler::start(EngineState::new(config)?);

    let mut report = tokio::time::interval(REPORT_INTERVAL);
    report.tick().await;
    for _ in 0..run_seconds {
        report.tick().await;
        let snapshot = handle.snapshot();
        let metrics = snapshot.metrics;
        let assessment = QualityAssessment::from_metrics(&metrics);

        info!(
            tick = snapshot.tick_index,
            snr_db = metrics.signal_to_noise_ratio_db,
            artifact = metrics.artifact_score,
            drift = metrics.drift_score,
            confidence = metrics.fusion_confidence,
            quality = ?assessment.overall,
            "Stream quality"
        );
        if !assessment.is_acceptable() {
            warn!(tick = snapshot.tick_index, "Stream quality is poor");
        }
    }

    let Some(state) = handle.stop().await? else {
        return Ok(());
    };
    info!(
        ticks = state.tick_index(),
        artifacts = state.artifact_total(),
        fusion_fallbacks = state.fusion_fallbacks(),
        "Monitor finished"
    );

    let snapshot = state.snapshot();
    let output = serde_json::json!({
        "readouts": snapshot_readouts(&snapshot),
        "chart": chart_points(&snapshot.samples, chart_limit),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
