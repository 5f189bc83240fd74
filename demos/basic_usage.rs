// demos/basic_usage.rs
//! Basic usage example for the BioFusion engine

use biofusion_core::config::ConfigLoader;
use biofusion_core::view::{chart_points, metric_readouts};
use biofusion_core::{EngineState, Modality, TickScheduler};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("BioFusion Engine Basic Usage Example");
    println!("====================================");

    // Load configuration
    println!("Loading configuration...");
    let config = ConfigLoader::new().load()?;
    let summary = config.get_summary();
    println!("Configuration loaded successfully");
    println!("  - Tick interval: {} ms", summary.tick_interval_ms);
    println!("  - Window: {} samples ({:.1} s)", summary.buffer_capacity, summary.window_seconds);
    println!("  - Seed: {:#x}", summary.seed);

    // Synchronous driving
    println!("\nRunning 100 ticks synchronously...");
    let mut state = EngineState::new(config.clone())?;
    state.run_ticks(50);
    state.force_artifact(Modality::Cardiac);
    state.run_ticks(50);
    for readout in metric_readouts(&state.metrics()) {
        println!("  {:<13} {:>7} ({:?})", readout.label, readout.display_value(), readout.status);
    }
    println!("  Artifacts so far: {}", state.artifact_total());

    // Timer-driven run
    println!("\nRunning the scheduler for 2 seconds...");
    let mut handle = TickScheduler::start(EngineState::new(config)?);
    for _ in 0..4 {
        sleep(Duration::from_millis(500)).await;
        let snapshot = handle.snapshot();
        if let Some(latest) = snapshot.latest_sample() {
            println!(
                "  tick {:>4}  t={:.2}s  fused={:+.3}  confidence={:.2}",
                snapshot.tick_index, latest.t, latest.fused, snapshot.metrics.fusion_confidence
            );
        }
    }

    if let Some(state) = handle.stop().await? {
        let points = chart_points(&state.samples(), 5);
        println!("\nLast chart points:");
        for point in points {
            println!("  {}", serde_json::to_string(&point)?);
        }
    }

    println!("\nExample completed successfully!");
    Ok(())
}
