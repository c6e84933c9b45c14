//! Analyze a recorded frame sequence.

use std::path::PathBuf;

use anyhow::Context;
use tremor_common::config::AnalysisDefaults;
use tremor_model::report::AnalysisReport;
use tremor_session::{AnalysisSession, ImageSequenceSource, SessionConfig};

pub struct AnalyzeOptions {
    pub workers: Option<usize>,
    pub max_frames: Option<usize>,
    pub output: Option<PathBuf>,
    pub json: bool,
}

pub async fn run(
    inputs: Vec<PathBuf>,
    analysis: AnalysisDefaults,
    options: AnalyzeOptions,
) -> anyhow::Result<()> {
    analysis.validate()?;

    let mut source = if inputs.len() == 1 && inputs[0].is_dir() {
        ImageSequenceSource::from_dir(&inputs[0])
            .with_context(|| format!("Failed to list frames in {}", inputs[0].display()))?
    } else {
        ImageSequenceSource::from_paths(inputs)
    };

    if source.remaining() == 0 {
        anyhow::bail!("No image frames found to analyze");
    }

    let mut session = AnalysisSession::new(SessionConfig::from(&analysis));
    session.start()?;
    session
        .record_from(&mut source, options.max_frames)
        .context("Failed to read frames")?;
    let recorded = session.stop()?;

    if !options.json {
        println!("Recorded {recorded} frames");
    }

    let report = match options.workers {
        Some(workers) if workers > 1 => session.analyze_concurrent(workers).await?,
        _ => session.analyze()?,
    };

    if let Some(path) = &options.output {
        report
            .save(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary(report);
        if let Some(path) = &options.output {
            println!("  Report saved to: {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    println!("Tremor Intensity: {:.4}", report.intensity);
    println!(
        "  Hand detected in {}/{} frames ({:.1}%)",
        report.frames_with_hand,
        report.frames_analyzed,
        report.detection_rate() * 100.0
    );
    println!(
        "  Settings: min area {} px², smoothing window {}",
        report.settings.min_contour_area, report.settings.smoothing_window
    );
    if !report.has_measurement() {
        println!("  Not enough detections to measure motion; a score of 0 is not meaningful.");
    }
}
