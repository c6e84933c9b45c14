//! Tremor CLI — Command-line interface for hand-tremor analysis.
//!
//! Usage:
//!   tremor analyze <INPUT>...   Analyze a recorded frame sequence
//!   tremor score <FILE>         Score a saved trajectory
//!   tremor synth <DIR>          Render a synthetic tremor sequence
//!   tremor config               Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tremor_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "tremor",
    about = "Estimate hand-tremor intensity from video frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/tremor/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded frame sequence
    Analyze {
        /// Image files, or a directory of frames sorted by file name
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Minimum hand region area in px² (overrides config)
        #[arg(long)]
        min_area: Option<f64>,

        /// Velocity smoothing window in frames (overrides config)
        #[arg(long)]
        window: Option<usize>,

        /// Gaussian blur sigma applied before thresholding (overrides config)
        #[arg(long)]
        blur: Option<f32>,

        /// Locate hands on this many worker tasks
        #[arg(long)]
        workers: Option<usize>,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<usize>,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Score a trajectory file (JSON array of {"x", "y"} positions)
    Score {
        /// Path to the trajectory file
        path: PathBuf,

        /// Velocity smoothing window in frames (overrides config)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Render a synthetic sequence of a dark disc oscillating on a light background
    Synth {
        /// Output directory for PNG frames
        output: PathBuf,

        /// Number of frames
        #[arg(long, default_value = "60")]
        frames: usize,

        /// Horizontal oscillation amplitude in pixels
        #[arg(long, default_value = "4.0")]
        amplitude: f64,

        /// Oscillation frequency in Hz
        #[arg(long, default_value = "5.0")]
        frequency: f64,

        /// Nominal frame rate used to place the oscillation
        #[arg(long, default_value = "30.0")]
        fps: f64,

        /// Frame width
        #[arg(long, default_value = "320")]
        width: u32,

        /// Frame height
        #[arg(long, default_value = "240")]
        height: u32,

        /// Disc radius in pixels
        #[arg(long, default_value = "30")]
        radius: i32,

        /// Leave the hand out of every Nth frame
        #[arg(long)]
        drop_every: Option<usize>,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    tremor_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            inputs,
            min_area,
            window,
            blur,
            workers,
            max_frames,
            output,
            json,
        } => {
            let mut analysis = config.analysis.clone();
            if let Some(area) = min_area {
                analysis.min_contour_area = area;
            }
            if let Some(window) = window {
                analysis.smoothing_window = window;
            }
            if blur.is_some() {
                analysis.blur_sigma = blur;
            }
            commands::analyze::run(
                inputs,
                analysis,
                commands::analyze::AnalyzeOptions {
                    workers,
                    max_frames,
                    output,
                    json,
                },
            )
            .await
        }
        Commands::Score { path, window } => {
            let window = window.unwrap_or(config.analysis.smoothing_window);
            commands::score::run(path, window)
        }
        Commands::Synth {
            output,
            frames,
            amplitude,
            frequency,
            fps,
            width,
            height,
            radius,
            drop_every,
        } => commands::synth::run(
            output,
            commands::synth::SynthOptions {
                frames,
                amplitude,
                frequency,
                fps,
                width,
                height,
                radius,
                drop_every,
            },
        ),
        Commands::Config { init } => commands::config::run(&config, cli.config, init),
    }
}
