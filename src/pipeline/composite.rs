//! Blend compositing of the quantized image and the dot overlay.

use image::{GrayImage, Luma};

use super::mask::Mask;
use super::pattern::{INK, PAPER};
use super::screentone::Mode;

/// Multiply blend, `a · b / 255` rounded to the nearest level.
#[must_use]
pub fn multiply(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let mut out = a.clone();
    for (pixel, other) in out.pixels_mut().zip(b.pixels()) {
        pixel[0] = multiply_sample(pixel[0], other[0]);
    }
    out
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn multiply_sample(a: u8, b: u8) -> u8 {
    // Safe: the product of two samples divided by 255 is at most 255
    ((u16::from(a) * u16::from(b) + 127) / 255) as u8
}

/// Take `foreground` where the mask is set and `background` elsewhere.
#[must_use]
pub fn composite(foreground: &GrayImage, background: &GrayImage, mask: &Mask) -> GrayImage {
    GrayImage::from_fn(background.width(), background.height(), |x, y| {
        let selected = mask[[y as usize, x as usize]] != 0;
        if selected {
            *foreground.get_pixel(x, y)
        } else {
            *background.get_pixel(x, y)
        }
    })
}

/// Keep only pure black as ink, everything else becomes paper.
#[must_use]
pub fn lineart(quantized: &GrayImage) -> GrayImage {
    let mut out = quantized.clone();
    for pixel in out.pixels_mut() {
        *pixel = Luma([if pixel[0] == INK { INK } else { PAPER }]);
    }
    out
}

/// Combine the quantized image with the overlay according to `mode`.
#[must_use]
pub fn compose(mode: Mode, quantized: &GrayImage, overlay: &GrayImage, mask: &Mask) -> GrayImage {
    match mode {
        Mode::Multiply => {
            let blended = multiply(quantized, overlay);
            composite(&blended, quantized, mask)
        }
        Mode::ScreentoneOnly => {
            let ink = lineart(quantized);
            let blended = multiply(&ink, overlay);
            composite(&blended, &ink, mask)
        }
    }
}
