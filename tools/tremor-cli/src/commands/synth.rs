//! Render a synthetic tremor sequence for end-to-end checks.

use std::path::PathBuf;

use anyhow::Context;
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

const BACKGROUND: Rgb<u8> = Rgb([215, 210, 205]);
const HAND: Rgb<u8> = Rgb([45, 35, 30]);

pub struct SynthOptions {
    pub frames: usize,
    pub amplitude: f64,
    pub frequency: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub radius: i32,
    pub drop_every: Option<usize>,
}

pub fn run(output: PathBuf, options: SynthOptions) -> anyhow::Result<()> {
    if options.fps <= 0.0 {
        anyhow::bail!("fps must be positive");
    }
    if options.width == 0 || options.height == 0 {
        anyhow::bail!("frame dimensions must be non-zero");
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    println!(
        "Rendering {} frames ({}x{}) to {}",
        options.frames,
        options.width,
        options.height,
        output.display()
    );

    let mut dropped = 0;
    for index in 0..options.frames {
        let hand_visible = options
            .drop_every
            .map_or(true, |n| n == 0 || (index + 1) % n != 0);
        if !hand_visible {
            dropped += 1;
        }

        let frame = render_frame(&options, index, hand_visible);
        let path = output.join(format!("frame_{index:05}.png"));
        frame
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    tracing::debug!(dropped, "Synthetic sequence rendered");
    println!(
        "  Amplitude: {} px at {} Hz ({} fps)",
        options.amplitude, options.frequency, options.fps
    );
    if dropped > 0 {
        println!("  Frames without hand: {dropped}");
    }
    println!("\nDone. Analyze with: tremor analyze {}", output.display());

    Ok(())
}

/// Disc centred in the frame, displaced horizontally by a sine wave.
fn render_frame(options: &SynthOptions, index: usize, hand_visible: bool) -> RgbImage {
    let mut img = ImageBuffer::from_pixel(options.width, options.height, BACKGROUND);
    if hand_visible {
        let t = index as f64 / options.fps;
        let offset = options.amplitude * (2.0 * std::f64::consts::PI * options.frequency * t).sin();
        let cx = (options.width as f64 / 2.0 + offset).round() as i32;
        let cy = (options.height / 2) as i32;
        draw_filled_circle_mut(&mut img, (cx, cy), options.radius, HAND);
    }
    img
}
