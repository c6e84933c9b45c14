//! Recording and analysis session management.

use std::sync::Arc;

use tremor_common::config::AnalysisDefaults;
use tremor_common::error::{TremorError, TremorResult};
use tremor_core::{Frame, HandLocator, LocatorConfig, TremorScorer};
use tremor_model::report::{AnalysisReport, AnalysisSettings};
use tremor_model::trajectory::Trajectory;

use crate::source::FrameSource;

/// Configuration for an analysis session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Hand locator settings.
    pub locator: LocatorConfig,

    /// Velocity smoothing window.
    pub smoothing_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&AnalysisDefaults::default())
    }
}

impl From<&AnalysisDefaults> for SessionConfig {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            locator: LocatorConfig {
                min_contour_area: defaults.min_contour_area,
                blur_sigma: defaults.blur_sigma,
            },
            smoothing_window: defaults.smoothing_window,
        }
    }
}

impl SessionConfig {
    /// The settings block written into reports.
    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            min_contour_area: self.locator.min_contour_area,
            smoothing_window: self.smoothing_window,
            blur_sigma: self.locator.blur_sigma,
        }
    }
}

/// State of an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not recording. May hold frames from a previous recording.
    Idle,
    /// Accepting frames.
    Recording,
    /// Recorded frames have been analyzed; a report is available.
    Analyzed,
}

/// One analysis session: record frames, stop, analyze.
///
/// Commands replace what would otherwise be UI callbacks:
/// `start` → `push_frame`* → `stop` → `analyze`. Starting again discards
/// the previous frames and report.
pub struct AnalysisSession {
    config: SessionConfig,
    state: SessionState,
    buffer: Vec<Frame>,
    recorded: Arc<Vec<Frame>>,
    report: Option<AnalysisReport>,
}

impl AnalysisSession {
    /// Create a new session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            buffer: Vec::new(),
            recorded: Arc::new(Vec::new()),
            report: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Frames captured by the last completed recording.
    pub fn recorded_frames(&self) -> usize {
        self.recorded.len()
    }

    /// Frames captured so far by the recording in progress.
    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    /// Report from the last analysis, if any.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Start a new recording, discarding previous frames and report.
    pub fn start(&mut self) -> TremorResult<()> {
        if self.state == SessionState::Recording {
            return Err(TremorError::session("Session already recording"));
        }

        tracing::info!("Starting recording");
        self.buffer.clear();
        self.recorded = Arc::new(Vec::new());
        self.report = None;
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Append one captured frame to the recording.
    pub fn push_frame(&mut self, frame: Frame) -> TremorResult<()> {
        if self.state != SessionState::Recording {
            return Err(TremorError::session("Session is not recording"));
        }
        self.buffer.push(frame);
        Ok(())
    }

    /// Drain a frame source into the recording.
    ///
    /// Stops after `max_frames` when given. Returns the number of frames added.
    pub fn record_from(
        &mut self,
        source: &mut dyn FrameSource,
        max_frames: Option<usize>,
    ) -> TremorResult<usize> {
        let mut added = 0;
        while max_frames.map_or(true, |max| added < max) {
            let Some(frame) = source.next_frame()? else {
                break;
            };
            self.push_frame(frame)?;
            added += 1;
        }
        tracing::debug!(added, total = self.buffer.len(), "Recorded frames from source");
        Ok(added)
    }

    /// Stop recording and keep the captured frames for analysis.
    ///
    /// Returns the number of frames recorded.
    pub fn stop(&mut self) -> TremorResult<usize> {
        if self.state != SessionState::Recording {
            return Err(TremorError::session("Session is not recording"));
        }

        self.recorded = Arc::new(std::mem::take(&mut self.buffer));
        self.state = SessionState::Idle;
        tracing::info!(frames = self.recorded.len(), "Recording stopped");
        Ok(self.recorded.len())
    }

    /// Locate the hand in every recorded frame and score the trajectory.
    pub fn analyze(&mut self) -> TremorResult<&AnalysisReport> {
        self.ensure_analyzable()?;

        let locator = HandLocator::new(self.config.locator);
        let trajectory = locator.locate_all(self.recorded.iter());
        Ok(self.finish(trajectory))
    }

    /// Same as [`analyze`](Self::analyze), with hand localization split
    /// across `workers` blocking tasks.
    ///
    /// Frames are divided into contiguous chunks and the chunk results are
    /// joined in chunk order, so the trajectory matches the sequential one.
    pub async fn analyze_concurrent(&mut self, workers: usize) -> TremorResult<&AnalysisReport> {
        self.ensure_analyzable()?;

        let frames = Arc::clone(&self.recorded);
        let chunk_len = frames.len().div_ceil(workers.max(1));
        let locator = HandLocator::new(self.config.locator);

        let mut handles = Vec::new();
        for start in (0..frames.len()).step_by(chunk_len) {
            let end = (start + chunk_len).min(frames.len());
            let frames = Arc::clone(&frames);
            let locator = locator.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                locator.locate_all(&frames[start..end])
            }));
        }
        tracing::debug!(chunks = handles.len(), chunk_len, "Locating hands concurrently");

        let mut trajectory = Trajectory::with_capacity(frames.len());
        for handle in handles {
            let part = handle
                .await
                .map_err(|e| TremorError::processing(format!("Locator task failed: {e}")))?;
            trajectory.append(part);
        }

        Ok(self.finish(trajectory))
    }

    /// Drop all frames and results and return to `Idle`.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.recorded = Arc::new(Vec::new());
        self.report = None;
        self.state = SessionState::Idle;
    }

    fn ensure_analyzable(&self) -> TremorResult<()> {
        if self.state == SessionState::Recording {
            return Err(TremorError::session("Stop recording before analyzing"));
        }
        if self.recorded.is_empty() {
            return Err(TremorError::session("No recorded frames to analyze"));
        }
        Ok(())
    }

    fn finish(&mut self, trajectory: Trajectory) -> &AnalysisReport {
        let report = score_trajectory(&self.config, self.recorded.len(), trajectory);
        self.state = SessionState::Analyzed;
        &*self.report.insert(report)
    }
}

/// Analyze a frame sequence in one call, without the session state machine.
pub fn analyze_frames(frames: &[Frame], config: &SessionConfig) -> AnalysisReport {
    let trajectory = HandLocator::new(config.locator).locate_all(frames);
    score_trajectory(config, frames.len(), trajectory)
}

fn score_trajectory(
    config: &SessionConfig,
    frames_analyzed: usize,
    trajectory: Trajectory,
) -> AnalysisReport {
    let measurement = TremorScorer::new(config.smoothing_window).measure(trajectory.as_slice());

    tracing::info!(
        frames = frames_analyzed,
        detections = trajectory.len(),
        intensity = measurement.intensity,
        "Analysis complete"
    );
    if trajectory.len() < 2 {
        tracing::warn!(
            detections = trajectory.len(),
            "Too few hand detections to measure tremor"
        );
    }

    AnalysisReport::new(
        config.settings(),
        frames_analyzed,
        trajectory,
        measurement.velocities,
        measurement.smoothed,
        measurement.intensity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecSource;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_filled_circle_mut;

    fn disc_frame(cx: i32) -> Frame {
        let mut img = RgbImage::from_pixel(120, 80, Rgb([220, 220, 220]));
        draw_filled_circle_mut(&mut img, (cx, 40), 12, Rgb([30, 30, 30]));
        Frame::from_image(img).unwrap()
    }

    fn blank_frame() -> Frame {
        Frame::from_image(RgbImage::from_pixel(120, 80, Rgb([220, 220, 220]))).unwrap()
    }

    fn shaky_frames() -> Vec<Frame> {
        [60, 64, 58, 66, 61, 55, 63, 60, 68, 57, 62, 59]
            .into_iter()
            .map(disc_frame)
            .collect()
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        assert_eq!(session.state(), SessionState::Idle);

        session.start().unwrap();
        for frame in shaky_frames() {
            session.push_frame(frame).unwrap();
        }
        assert_eq!(session.buffered_frames(), 12);
        assert_eq!(session.stop().unwrap(), 12);
        assert_eq!(session.state(), SessionState::Idle);

        let report = session.analyze().unwrap();
        assert_eq!(report.frames_analyzed, 12);
        assert_eq!(report.frames_with_hand, 12);
        assert_eq!(report.velocities.len(), 11);
        assert!(report.intensity > 0.0);
        assert_eq!(session.state(), SessionState::Analyzed);
        assert!(session.report().is_some());
    }

    #[test]
    fn test_state_violations() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        assert!(session.push_frame(blank_frame()).is_err());
        assert!(session.stop().is_err());

        let err = session.analyze().unwrap_err();
        assert!(err.to_string().contains("No recorded frames to analyze"));

        session.start().unwrap();
        assert!(session.start().is_err());
        session.push_frame(blank_frame()).unwrap();
        let err = session.analyze().unwrap_err();
        assert!(err.to_string().contains("Stop recording"));
    }

    #[test]
    fn test_empty_recording_cannot_be_analyzed() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        session.start().unwrap();
        assert_eq!(session.stop().unwrap(), 0);
        assert!(session.analyze().is_err());
    }

    #[test]
    fn test_restart_discards_previous_results() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        session.start().unwrap();
        session.push_frame(disc_frame(50)).unwrap();
        session.stop().unwrap();
        session.analyze().unwrap();

        session.start().unwrap();
        assert!(session.report().is_none());
        assert_eq!(session.recorded_frames(), 0);
        assert_eq!(session.state(), SessionState::Recording);
    }

    #[test]
    fn test_no_hand_is_zero_without_measurement() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        session.start().unwrap();
        session.push_frame(blank_frame()).unwrap();
        session.push_frame(disc_frame(40)).unwrap();
        session.push_frame(blank_frame()).unwrap();
        session.stop().unwrap();

        let report = session.analyze().unwrap();
        assert_eq!(report.intensity, 0.0);
        assert_eq!(report.frames_with_hand, 1);
        assert!(!report.has_measurement());
    }

    #[test]
    fn test_record_from_source_respects_limit() {
        let mut session = AnalysisSession::new(SessionConfig::default());
        session.start().unwrap();
        let mut source = VecSource::from(shaky_frames());
        assert_eq!(session.record_from(&mut source, Some(5)).unwrap(), 5);
        assert_eq!(session.record_from(&mut source, None).unwrap(), 7);
        assert_eq!(session.stop().unwrap(), 12);
    }

    #[test]
    fn test_analyze_frames_matches_session() {
        let config = SessionConfig {
            smoothing_window: 3,
            ..Default::default()
        };
        let frames = shaky_frames();
        let direct = analyze_frames(&frames, &config);

        let mut session = AnalysisSession::new(config);
        session.start().unwrap();
        for frame in frames {
            session.push_frame(frame).unwrap();
        }
        session.stop().unwrap();
        let report = session.analyze().unwrap();

        assert_eq!(report.trajectory, direct.trajectory);
        assert_eq!(report.intensity, direct.intensity);
        assert_eq!(report.settings.smoothing_window, 3);
    }

    #[test]
    fn test_config_from_defaults() {
        let defaults = AnalysisDefaults {
            min_contour_area: 250.0,
            smoothing_window: 7,
            blur_sigma: Some(1.5),
        };
        let config = SessionConfig::from(&defaults);
        assert_eq!(config.locator.min_contour_area, 250.0);
        assert_eq!(config.smoothing_window, 7);
        assert_eq!(config.settings().blur_sigma, Some(1.5));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let mut frames = shaky_frames();
        frames.insert(3, blank_frame());
        frames.insert(8, blank_frame());

        let mut sequential = AnalysisSession::new(SessionConfig::default());
        sequential.start().unwrap();
        for frame in frames.clone() {
            sequential.push_frame(frame).unwrap();
        }
        sequential.stop().unwrap();
        let expected = sequential.analyze().unwrap().clone();

        for workers in [1, 3, 4, 32] {
            let mut session = AnalysisSession::new(SessionConfig::default());
            session.start().unwrap();
            for frame in frames.clone() {
                session.push_frame(frame).unwrap();
            }
            session.stop().unwrap();
            let report = session.analyze_concurrent(workers).await.unwrap();
            assert_eq!(report.trajectory, expected.trajectory, "workers = {workers}");
            assert_eq!(report.intensity, expected.intensity);
            assert_eq!(report.frames_analyzed, 14);
        }
    }
}
