//! Score a saved trajectory.

use std::path::PathBuf;

use anyhow::Context;
use tremor_core::TremorScorer;
use tremor_model::trajectory::parse_trajectory;

pub fn run(path: PathBuf, window: usize) -> anyhow::Result<()> {
    if window == 0 {
        anyhow::bail!("Smoothing window must be at least 1");
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Trajectory file not found: {}", path.display()))?;
    let trajectory = parse_trajectory(&content)
        .with_context(|| format!("Failed to parse trajectory in {}", path.display()))?;

    let measurement = TremorScorer::new(window).measure(trajectory.as_slice());

    println!("Scoring trajectory at: {}", path.display());
    println!("  Positions: {}", trajectory.len());
    println!("  Path length: {:.2} px", trajectory.path_length());
    println!("  Velocity samples: {}", measurement.velocities.len());
    println!("  Smoothing window: {window}");
    println!("Tremor Intensity: {:.4}", measurement.intensity);

    if trajectory.len() < 2 {
        println!("\nFewer than two positions; nothing to measure.");
    }

    Ok(())
}
