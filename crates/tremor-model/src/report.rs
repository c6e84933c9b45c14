//! Analysis report: the scored result of one session plus its diagnostics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::trajectory::Trajectory;

/// Schema version written into every report.
pub const REPORT_VERSION: &str = "1.0";

/// Parameters an analysis ran with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Minimum enclosed area (px²) for a region to count as a hand.
    pub min_contour_area: f64,

    /// Velocity smoothing window.
    pub smoothing_window: usize,

    /// Gaussian pre-blur sigma, if any.
    #[serde(default)]
    pub blur_sigma: Option<f32>,
}

/// Result of analyzing one recorded frame sequence (`report.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version.
    pub version: String,

    /// When the analysis ran (ISO 8601).
    pub analyzed_at: String,

    /// Parameters used.
    pub settings: AnalysisSettings,

    /// Number of frames fed to the hand locator.
    pub frames_analyzed: usize,

    /// Number of frames in which a hand was found.
    pub frames_with_hand: usize,

    /// Tremor intensity: population standard deviation of smoothed velocities.
    pub intensity: f64,

    /// Detected hand positions in frame order.
    pub trajectory: Trajectory,

    /// Raw per-step velocities (pixels per frame).
    #[serde(default)]
    pub velocities: Vec<f64>,

    /// Velocities after the moving average.
    #[serde(default)]
    pub smoothed_velocities: Vec<f64>,
}

impl AnalysisReport {
    pub fn new(
        settings: AnalysisSettings,
        frames_analyzed: usize,
        trajectory: Trajectory,
        velocities: Vec<f64>,
        smoothed_velocities: Vec<f64>,
        intensity: f64,
    ) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            analyzed_at: chrono::Utc::now().to_rfc3339(),
            settings,
            frames_analyzed,
            frames_with_hand: trajectory.len(),
            intensity,
            trajectory,
            velocities,
            smoothed_velocities,
        }
    }

    /// Fraction of frames in which a hand was found, in `[0, 1]`.
    pub fn detection_rate(&self) -> f64 {
        if self.frames_analyzed == 0 {
            return 0.0;
        }
        self.frames_with_hand as f64 / self.frames_analyzed as f64
    }

    /// Whether the score reflects at least one velocity sample.
    ///
    /// A zero intensity is ambiguous: a perfectly still hand and a session
    /// with fewer than two detections both score 0. This tells them apart.
    pub fn has_measurement(&self) -> bool {
        self.trajectory.len() >= 2
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ReportError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReportError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when reading or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn settings() -> AnalysisSettings {
        AnalysisSettings {
            min_contour_area: 100.0,
            smoothing_window: 5,
            blur_sigma: None,
        }
    }

    #[test]
    fn test_detection_rate() {
        let trajectory: Trajectory = vec![Position::new(0.0, 0.0), Position::new(1.0, 0.0)].into();
        let report = AnalysisReport::new(settings(), 4, trajectory, vec![1.0], vec![1.0], 0.0);
        assert_eq!(report.frames_with_hand, 2);
        assert!((report.detection_rate() - 0.5).abs() < 1e-12);
        assert!(report.has_measurement());
    }

    #[test]
    fn test_empty_report_has_no_measurement() {
        let report = AnalysisReport::new(settings(), 0, Trajectory::new(), vec![], vec![], 0.0);
        assert_eq!(report.detection_rate(), 0.0);
        assert!(!report.has_measurement());
    }

    #[test]
    fn test_report_save_and_load() {
        let dir = std::env::temp_dir().join("tremor_test_report");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("report.json");

        let trajectory: Trajectory = vec![Position::new(0.0, 0.0), Position::new(3.0, 4.0)].into();
        let report = AnalysisReport::new(settings(), 3, trajectory, vec![5.0], vec![5.0], 0.0);
        report.save(&path).unwrap();

        let loaded = AnalysisReport::load(&path).unwrap();
        assert_eq!(loaded.version, REPORT_VERSION);
        assert_eq!(loaded.frames_analyzed, 3);
        assert_eq!(loaded.trajectory.len(), 2);
        assert_eq!(loaded.velocities, vec![5.0]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_report() {
        let err = AnalysisReport::load("/nonexistent/tremor/report.json").unwrap_err();
        assert!(matches!(err, ReportError::IoError { .. }));
    }
}
