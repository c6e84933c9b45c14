//! Per-frame hand localization by gray-level segmentation.
//!
//! The locator assumes a **dark hand against a lighter background**: pixels
//! at or below a fixed intensity of 127 are foreground. There is no adaptive
//! calibration, no skin model and no memory between frames. Under other
//! lighting (bright hand, dark backdrop) it will track the background instead.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::point::Point;
use tremor_model::position::Position;
use tremor_model::trajectory::Trajectory;

use crate::frame::Frame;

/// Fixed global binarization threshold on a 0-255 scale.
pub const BINARY_THRESHOLD: u8 = 127;

/// Hand locator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorConfig {
    /// Largest region must enclose strictly more than this many px².
    pub min_contour_area: f64,

    /// Gaussian blur sigma applied to the intensity image before
    /// thresholding. `None` keeps the raw fixed-threshold behaviour.
    pub blur_sigma: Option<f32>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_contour_area: 100.0,
            blur_sigma: None,
        }
    }
}

/// Stateless hand locator. Each call to [`HandLocator::locate`] depends only
/// on the frame and the fixed configuration.
#[derive(Debug, Clone)]
pub struct HandLocator {
    config: LocatorConfig,
}

impl HandLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(LocatorConfig::default())
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Estimate the hand centre in one frame.
    ///
    /// Returns `None` when there is no foreground, when the largest region is
    /// not larger than `min_contour_area`, or when its zeroth moment is zero.
    pub fn locate(&self, frame: &Frame) -> Option<Position> {
        let gray = frame.to_luma();
        let gray = match self.config.blur_sigma {
            Some(sigma) if sigma > 0.0 => imageproc::filter::gaussian_blur_f32(&gray, sigma),
            _ => gray,
        };

        let mask = binarize(&gray);
        let regions = external_regions(&mask);
        let Some(largest) = largest_region(&regions) else {
            tracing::trace!("no foreground regions");
            return None;
        };

        let area = largest.area();
        if area <= self.config.min_contour_area {
            tracing::trace!(
                area,
                min_area = self.config.min_contour_area,
                "largest region rejected as noise"
            );
            return None;
        }

        let centroid = largest.moments.centroid()?;
        if !centroid.is_finite() {
            tracing::warn!(area, "non-finite centroid discarded");
            return None;
        }
        tracing::trace!(x = centroid.x, y = centroid.y, area, "hand located");
        Some(centroid)
    }

    /// Locate the hand in every frame, in order, keeping only detections.
    pub fn locate_all<'a, I>(&self, frames: I) -> Trajectory
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        frames.into_iter().map(|frame| self.locate(frame)).collect()
    }
}

/// Inverted binary threshold: intensity <= 127 becomes 255, the rest 0.
pub fn binarize(gray: &GrayImage) -> GrayImage {
    threshold(gray, BINARY_THRESHOLD, ThresholdType::BinaryInverted)
}

/// A connected foreground region described by its outer boundary.
#[derive(Debug, Clone)]
pub struct Region {
    pub boundary: Vec<Point<i32>>,
    pub moments: Moments,
}

impl Region {
    pub fn from_boundary(boundary: Vec<Point<i32>>) -> Self {
        let moments = Moments::of_polygon(&boundary);
        Self { boundary, moments }
    }

    /// Area enclosed by the boundary polygon.
    pub fn area(&self) -> f64 {
        self.moments.area()
    }
}

/// Outermost boundaries of the foreground regions in a binary mask, in
/// raster-scan order. Holes and regions nested inside holes are skipped.
///
/// The mask is traced inside a one-pixel background border so that regions
/// touching the frame edge still start an outer boundary.
pub fn external_regions(mask: &GrayImage) -> Vec<Region> {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let boundary = c
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            Region::from_boundary(boundary)
        })
        .collect()
}

/// The region with the largest area; the first one wins on ties.
pub fn largest_region(regions: &[Region]) -> Option<&Region> {
    let mut best: Option<&Region> = None;
    for region in regions {
        match best {
            Some(current) if region.area() <= current.area() => {}
            _ => best = Some(region),
        }
    }
    best
}

/// Zeroth and first-order area moments of a closed polygon.
///
/// Computed with Green's theorem over the boundary vertices. The sign of
/// `m00` follows the winding direction; ratios are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut a = 0.0;
        let mut mx = 0.0;
        let mut my = 0.0;
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (x0, y0) = (p.x as f64, p.y as f64);
            let (x1, y1) = (q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a += cross;
            mx += (x0 + x1) * cross;
            my += (y0 + y1) * cross;
        }

        Self {
            m00: a / 2.0,
            m10: mx / 6.0,
            m01: my / 6.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// `(m10 / m00, m01 / m00)`, or `None` for a zero-mass polygon.
    pub fn centroid(&self) -> Option<Position> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Position::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}
