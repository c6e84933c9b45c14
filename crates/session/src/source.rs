//! Frame sources feeding a recording session.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tremor_common::error::{TremorError, TremorResult};
use tremor_core::Frame;

/// File extensions [`ImageSequenceSource::from_dir`] picks up.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Trait for anything that yields frames in capture order.
///
/// Camera devices, decoded video files and image sequences all sit behind
/// this seam; the session only pulls from it.
pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> TremorResult<Option<Frame>>;

    /// Number of frames handed out so far.
    fn frames_read(&self) -> u64;
}

/// Frames decoded from a list of image files, in list order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: VecDeque<PathBuf>,
    frames_read: u64,
}

impl ImageSequenceSource {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into(),
            frames_read: 0,
        }
    }

    /// All image files directly inside `dir`, sorted by file name.
    pub fn from_dir(dir: &Path) -> TremorResult<Self> {
        if !dir.is_dir() {
            return Err(TremorError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        tracing::debug!(dir = %dir.display(), count = paths.len(), "Found image sequence");
        Ok(Self::from_paths(paths))
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> TremorResult<Option<Frame>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };

        let image = image::open(&path).map_err(|e| {
            TremorError::invalid_frame(format!("failed to decode {}: {e}", path.display()))
        })?;
        let frame = Frame::from_image(image.to_rgb8())?;
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

/// Frames already held in memory.
#[derive(Debug)]
pub struct VecSource {
    frames: std::vec::IntoIter<Frame>,
    frames_read: u64,
}

impl From<Vec<Frame>> for VecSource {
    fn from(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
            frames_read: 0,
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> TremorResult<Option<Frame>> {
        let next = self.frames.next();
        if next.is_some() {
            self.frames_read += 1;
        }
        Ok(next)
    }

    fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
