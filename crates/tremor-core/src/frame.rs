//! Video frame wrapper.
//!
//! Frames come from an external capture source and are only read here.
//! Validation happens once at construction so the locator never has to
//! deal with malformed pixel buffers.

use image::{GrayImage, RgbImage};
use tremor_common::error::{TremorError, TremorResult};

/// Byte order of interleaved 3-channel pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Blue, green, red. What most camera APIs hand out.
    Bgr,
}

/// An immutable 3-channel frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Wrap an RGB image. Rejects zero-sized images.
    pub fn from_image(pixels: RgbImage) -> TremorResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(TremorError::invalid_frame(format!(
                "frame has zero dimension ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Build a frame from an interleaved 3-channel buffer.
    ///
    /// `data.len()` must be exactly `width * height * 3`.
    pub fn from_raw(
        width: u32,
        height: u32,
        mut data: Vec<u8>,
        order: ChannelOrder,
    ) -> TremorResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TremorError::invalid_frame(format!(
                "expected {expected} bytes for {width}x{height}x3, got {}",
                data.len()
            )));
        }

        if order == ChannelOrder::Bgr {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }

        let pixels = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| TremorError::invalid_frame("pixel buffer does not fit dimensions"))?;
        Self::from_image(pixels)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Single-channel intensity image using BT.601 luma weights.
    ///
    /// Fixed-point with 14 fractional bits, rounded, so that results match
    /// common camera-pipeline grayscale conversions bit for bit.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b] = self.pixels.get_pixel(x, y).0;
            image::Luma([luma_bt601(r, g, b)])
        })
    }
}

impl TryFrom<RgbImage> for Frame {
    type Error = TremorError;

    fn try_from(pixels: RgbImage) -> TremorResult<Self> {
        Self::from_image(pixels)
    }
}

const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}
