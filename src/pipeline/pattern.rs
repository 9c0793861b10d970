//! Dot pattern synthesis for the screentone overlay.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

/// Background value of the pattern canvas.
pub const PAPER: u8 = 255;

/// Fill value of the dots.
pub const INK: u8 = 0;

/// Generate a grid of filled dots on a white canvas.
///
/// Dots of diameter `dot_size` are centred on every multiple of `spacing`
/// starting from the top-left corner, so dots on the first row and column
/// are clipped by the canvas edge.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn dot_pattern(width: u32, height: u32, spacing: u32, dot_size: u32) -> GrayImage {
    let mut pattern = GrayImage::from_pixel(width, height, Luma([PAPER]));
    let step = spacing.max(1) as usize;
    let radius = (dot_size / 2) as i32;

    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            draw_filled_circle_mut(&mut pattern, (x as i32, y as i32), radius, Luma([INK]));
        }
    }

    pattern
}

/// Blend a pattern toward white by `opacity`.
///
/// An opacity of 1.0 keeps the pattern, 0.0 erases it. Blended samples are
/// truncated toward zero, matching the usual 8-bit blend.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fade(pattern: &GrayImage, opacity: f32) -> GrayImage {
    if opacity >= 1.0 {
        return pattern.clone();
    }

    let opacity = opacity.clamp(0.0, 1.0);
    let mut faded = pattern.clone();
    for pixel in faded.pixels_mut() {
        let value = f32::from(pixel[0]);
        let paper = f32::from(PAPER);
        // Safe: a convex combination of two values in [0, 255]
        pixel[0] = opacity.mul_add(value - paper, paper).clamp(0.0, 255.0) as u8;
    }
    faded
}

/// Generate the overlay for a canvas: the dot pattern faded by `opacity`.
#[must_use]
pub fn overlay(width: u32, height: u32, spacing: u32, dot_size: u32, opacity: f32) -> GrayImage {
    let pattern = dot_pattern(width, height, spacing, dot_size);
    fade(&pattern, opacity)
}
