//! Image saving utilities.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

use crate::error::{Error, Result};

use super::{denormalize, ImageTensor, GRAY_CHANNELS};

/// Save a single-channel host tensor as an image file.
///
/// # Arguments
///
/// * `tensor` - BHWC tensor of shape `(1, height, width, 1)` with values in [0, 1]
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if the tensor has the wrong shape or the image cannot be saved.
pub fn save_image<P: AsRef<Path>>(tensor: &ImageTensor, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let img = DynamicImage::ImageLuma8(tensor_to_image(tensor)?);

    // Determine format and save
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            img.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            img.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

/// Convert a normalized single-channel BHWC tensor to a grayscale image.
fn tensor_to_image(tensor: &ImageTensor) -> Result<GrayImage> {
    let (batch, height, width, channels) = tensor.dim();

    if batch != 1 || channels != GRAY_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: "(1, height, width, 1)".to_string(),
            actual: format!("{:?}", tensor.shape()),
        });
    }

    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            reason: "dimensions exceed u32".to_string(),
        });
    };

    Ok(GrayImage::from_fn(w, h, |x, y| {
        Luma([denormalize(tensor[[0, y as usize, x as usize, 0]])])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_tensor_to_image_values() {
        let mut tensor = Array4::<f32>::zeros((1, 2, 2, 1));
        tensor[[0, 0, 1, 0]] = 1.0;
        tensor[[0, 1, 0, 0]] = 0.5;

        let img = tensor_to_image(&tensor).unwrap();

        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(1, 0)[0], 255);
        assert_eq!(img.get_pixel(0, 1)[0], 128);
    }

    #[test]
    fn test_tensor_to_image_rejects_rgb() {
        let tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        assert!(matches!(
            tensor_to_image(&tensor),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
