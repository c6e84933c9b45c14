//! Tremor scoring from a hand trajectory.
//!
//! Tremor shows up as irregular speed rather than large displacement, so the
//! score is the spread of frame-to-frame speed: velocities, a centered moving
//! average, then the population standard deviation of what remains.

use tremor_model::position::Position;

/// Default smoothing window (frames).
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Intermediate series and final score of one scoring pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TremorMeasurement {
    /// Pixels moved per frame, one per consecutive pair of positions.
    pub velocities: Vec<f64>,
    /// `velocities` after the moving average. Same length.
    pub smoothed: Vec<f64>,
    /// Population standard deviation of `smoothed`.
    pub intensity: f64,
}

/// Converts a trajectory into a tremor intensity score.
#[derive(Debug, Clone)]
pub struct TremorScorer {
    smoothing_window: usize,
}

impl TremorScorer {
    /// Create a scorer. The moving-average half-width is `smoothing_window / 2`.
    pub fn new(smoothing_window: usize) -> Self {
        Self { smoothing_window }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }

    pub fn smoothing_window(&self) -> usize {
        self.smoothing_window
    }

    /// Tremor intensity of a trajectory. Fewer than two positions score 0.
    pub fn score(&self, trajectory: &[Position]) -> f64 {
        self.measure(trajectory).intensity
    }

    /// Like [`score`](Self::score) but keeps the intermediate series.
    pub fn measure(&self, trajectory: &[Position]) -> TremorMeasurement {
        if trajectory.len() < 2 {
            return TremorMeasurement::default();
        }

        let velocities = velocities(trajectory);
        let smoothed = self.smooth(&velocities);
        let intensity = population_std_dev(&smoothed);

        tracing::debug!(
            positions = trajectory.len(),
            window = self.smoothing_window,
            intensity,
            "scored trajectory"
        );

        TremorMeasurement {
            velocities,
            smoothed,
            intensity,
        }
    }

    /// Centered moving average with shrinking edges.
    ///
    /// Each output averages the samples in `[i - w, i + w]` that exist, with
    /// `w = smoothing_window / 2`. Near the ends the divisor is the number
    /// of samples actually summed; nothing is padded or reflected.
    pub fn smooth(&self, values: &[f64]) -> Vec<f64> {
        let half = self.smoothing_window / 2;
        let mut result = Vec::with_capacity(values.len());

        for i in 0..values.len() {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            let count = (end - start) as f64;
            let sum: f64 = values[start..end].iter().sum();
            result.push(sum / count);
        }

        result
    }
}

impl Default for TremorScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Euclidean distance between each consecutive pair of positions.
pub fn velocities(trajectory: &[Position]) -> Vec<f64> {
    trajectory
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .collect()
}

/// Population standard deviation (divisor `n`). Empty input gives 0.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}
