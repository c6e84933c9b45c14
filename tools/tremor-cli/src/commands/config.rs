//! Show or initialize configuration.

use std::path::PathBuf;

use tremor_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, explicit_path: Option<PathBuf>, init: bool) -> anyhow::Result<()> {
    let path = explicit_path.unwrap_or_else(config_file_path);

    if init {
        if path.exists() {
            println!("Config already exists at: {}", path.display());
        } else {
            AppConfig::default().save_to(&path)?;
            println!("Wrote default config to: {}", path.display());
        }
        println!();
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not present, using defaults)");
    }
    println!();

    println!("Analysis:");
    println!("  Min contour area: {} px²", config.analysis.min_contour_area);
    println!("  Smoothing window: {}", config.analysis.smoothing_window);
    match config.analysis.blur_sigma {
        Some(sigma) => println!("  Blur sigma: {sigma}"),
        None => println!("  Blur sigma: off"),
    }
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  JSON: {}", config.logging.json);
    if let Some(ref file) = config.logging.file {
        println!("  File: {}", file.display());
    }

    if let Err(e) = config.validate() {
        println!();
        println!("[WARN] {e}");
    }

    Ok(())
}
