//! Conversion between the host tensor and 8-bit grayscale.

use image::{GrayImage, Luma};
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{denormalize, normalize, ImageTensor, GRAY_CHANNELS, RGBA_CHANNELS, RGB_CHANNELS};

/// Convert a host tensor to an 8-bit grayscale image.
///
/// Samples are scaled to [0, 255] first. RGB and RGBA tensors are reduced
/// with the ITU-R 601-2 luma transform (alpha is ignored); single-channel
/// tensors are taken as luminance directly.
///
/// # Errors
///
/// Returns an error if the batch size is not 1, the image is empty, or the
/// channel count is not 1, 3 or 4.
pub fn decode_grayscale(tensor: &ImageTensor) -> Result<GrayImage> {
    let (batch, height, width, channels) = tensor.dim();

    if batch != 1 {
        return Err(Error::ShapeMismatch {
            expected: "batch of 1".to_string(),
            actual: format!("batch of {batch}"),
        });
    }

    if height == 0 || width == 0 {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            reason: "image is empty".to_string(),
        });
    }

    if !matches!(channels, GRAY_CHANNELS | RGB_CHANNELS | RGBA_CHANNELS) {
        return Err(Error::ShapeMismatch {
            expected: "1, 3 or 4 channels".to_string(),
            actual: format!("{channels} channels"),
        });
    }

    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            reason: "dimensions exceed u32".to_string(),
        });
    };

    let gray = GrayImage::from_fn(w, h, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let luma = if channels == GRAY_CHANNELS {
            denormalize(tensor[[0, y, x, 0]])
        } else {
            luma601(
                denormalize(tensor[[0, y, x, 0]]),
                denormalize(tensor[[0, y, x, 1]]),
                denormalize(tensor[[0, y, x, 2]]),
            )
        };
        Luma([luma])
    });

    Ok(gray)
}

/// Convert an 8-bit grayscale image to a single-channel host tensor of
/// shape `(1, height, width, 1)`.
#[must_use]
pub fn encode_grayscale(gray: &GrayImage) -> ImageTensor {
    let (width, height) = gray.dimensions();

    Array4::from_shape_fn(
        (1, height as usize, width as usize, GRAY_CHANNELS),
        |(_, y, x, _)| {
            // Safe: x and y are bounded by the image dimensions, which are u32
            #[allow(clippy::cast_possible_truncation)]
            let pixel = gray.get_pixel(x as u32, y as u32);
            normalize(pixel[0])
        },
    )
}

/// ITU-R 601-2 luma in 16-bit fixed point: 0.299 R + 0.587 G + 0.114 B.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn luma601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = u32::from(r) * 19_595 + u32::from(g) * 38_470 + u32::from(b) * 7_471 + 0x8000;
    // Safe: the weights sum to 65536, so the shifted value is at most 255
    (weighted >> 16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma601_extremes() {
        assert_eq!(luma601(0, 0, 0), 0);
        assert_eq!(luma601(255, 255, 255), 255);
        assert_eq!(luma601(77, 77, 77), 77);
    }

    #[test]
    fn test_luma601_weights() {
        assert_eq!(luma601(255, 0, 0), 76);
        assert_eq!(luma601(0, 255, 0), 150);
        assert_eq!(luma601(0, 0, 255), 29);
    }

    #[test]
    fn test_decode_rgb() {
        let mut tensor = Array4::<f32>::zeros((1, 2, 3, 3));
        tensor[[0, 1, 2, 0]] = 1.0;
        tensor[[0, 0, 0, 1]] = 1.0;

        let gray = decode_grayscale(&tensor).unwrap();

        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.get_pixel(2, 1)[0], 76);
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn test_decode_rgba_ignores_alpha() {
        let mut tensor = Array4::<f32>::from_elem((1, 1, 1, 4), 0.5);
        tensor[[0, 0, 0, 3]] = 0.0;

        let gray = decode_grayscale(&tensor).unwrap();

        assert_eq!(gray.get_pixel(0, 0)[0], 128);
    }

    #[test]
    fn test_decode_rejects_batches() {
        let tensor = Array4::<f32>::zeros((2, 4, 4, 3));
        assert!(matches!(
            decode_grayscale(&tensor),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_empty() {
        let tensor = Array4::<f32>::zeros((1, 0, 4, 3));
        assert!(matches!(
            decode_grayscale(&tensor),
            Err(Error::UnsupportedDimensions { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_two_channels() {
        let tensor = Array4::<f32>::zeros((1, 4, 4, 2));
        assert!(decode_grayscale(&tensor).is_err());
    }

    #[test]
    fn test_encode_shape() {
        let gray = GrayImage::new(5, 3);
        let tensor = encode_grayscale(&gray);

        assert_eq!(tensor.shape(), &[1, 3, 5, 1]);
    }

    #[test]
    fn test_round_trip_single_channel() {
        let tensor = Array4::from_shape_fn((1, 8, 8, 1), |(_, y, x, _)| {
            #[allow(clippy::cast_precision_loss)]
            let level = ((y * 8 + x) * 4) as f32;
            level / 255.0
        });

        let restored = encode_grayscale(&decode_grayscale(&tensor).unwrap());

        assert_eq!(restored.shape(), tensor.shape());
        for (a, b) in tensor.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
