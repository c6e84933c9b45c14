//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{TremorError, TremorResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Hand localization and scoring knobs.
    #[serde(default)]
    pub analysis: AnalysisDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDefaults {
    /// Regions whose enclosed area (px²) does not exceed this are noise.
    pub min_contour_area: f64,

    /// Moving-average window over velocity samples. Half-width is `window / 2`.
    pub smoothing_window: usize,

    /// Optional Gaussian blur sigma applied before thresholding.
    #[serde(default)]
    pub blur_sigma: Option<f32>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tremor_core=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            min_contour_area: 100.0,
            smoothing_window: 5,
            blur_sigma: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AnalysisDefaults {
    /// Reject knob values the pipeline cannot work with.
    pub fn validate(&self) -> TremorResult<()> {
        if !(self.min_contour_area.is_finite() && self.min_contour_area > 0.0) {
            return Err(TremorError::config(format!(
                "min_contour_area must be positive, got {}",
                self.min_contour_area
            )));
        }
        if self.smoothing_window == 0 {
            return Err(TremorError::config("smoothing_window must be at least 1"));
        }
        if let Some(sigma) = self.blur_sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(TremorError::config(format!(
                    "blur_sigma must be positive, got {sigma}"
                )));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> TremorResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> TremorResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> TremorResult<()> {
        self.analysis.validate()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tremor").join("config.json")
}
