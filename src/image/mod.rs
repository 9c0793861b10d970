//! Host tensor conversion plus file loading and saving.

mod load;
mod save;
mod tensor;

pub use load::load_image;
pub use save::save_image;
pub use tensor::{decode_grayscale, encode_grayscale};

use ndarray::Array4;

/// Image tensor in the host's BHWC format (batch, height, width, channels).
/// Values are normalized to the [0, 1] range and the batch holds one image.
pub type ImageTensor = Array4<f32>;

/// Number of channels in a luminance-only tensor.
pub const GRAY_CHANNELS: usize = 1;

/// Number of channels in RGB tensors.
pub const RGB_CHANNELS: usize = 3;

/// Number of channels in RGBA tensors.
pub const RGBA_CHANNELS: usize = 4;

/// Denormalize a value from [0, 1] to [0, 255] with clamping.
///
/// Rounds to the nearest level instead of truncating like a plain
/// `as u8` scale, so every multiple of 1/255 maps back to its own level.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Normalize an 8-bit sample to [0, 1].
#[inline]
pub(crate) fn normalize(value: u8) -> f32 {
    f32::from(value) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(0.0), 0);
        assert_eq!(denormalize(0.5), 128);
        assert_eq!(denormalize(1.0), 255);
    }

    #[test]
    fn test_denormalize_clamp() {
        assert_eq!(denormalize(-1.0), 0);
        assert_eq!(denormalize(2.0), 255);
    }

    #[test]
    fn test_normalize_inverts_denormalize() {
        for value in 0..=255u8 {
            assert_eq!(denormalize(normalize(value)), value);
        }
    }
}
