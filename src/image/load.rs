//! Image loading utilities.

use std::path::Path;

use image::DynamicImage;
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{normalize, ImageTensor, GRAY_CHANNELS, RGB_CHANNELS};

/// Load an image from disk and convert it to a host tensor.
///
/// Grayscale files become a single-channel tensor, everything else is
/// converted to RGB. The result has shape `(1, height, width, channels)`
/// with values in [0, 1].
///
/// # Errors
///
/// Returns an error if the image cannot be loaded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageTensor> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Loaded {}x{} {:?} image",
        img.width(),
        img.height(),
        img.color()
    );

    Ok(image_to_tensor(&img))
}

/// Convert a `DynamicImage` to a normalized BHWC tensor.
fn image_to_tensor(img: &DynamicImage) -> ImageTensor {
    let (width, height) = (img.width() as usize, img.height() as usize);

    if img.color().has_color() {
        let rgb = img.to_rgb8();
        Array4::from_shape_fn((1, height, width, RGB_CHANNELS), |(_, y, x, c)| {
            // Safe: x and y are bounded by the image dimensions, which are u32
            #[allow(clippy::cast_possible_truncation)]
            let pixel = rgb.get_pixel(x as u32, y as u32);
            normalize(pixel[c])
        })
    } else {
        let gray = img.to_luma8();
        Array4::from_shape_fn((1, height, width, GRAY_CHANNELS), |(_, y, x, _)| {
            #[allow(clippy::cast_possible_truncation)]
            let pixel = gray.get_pixel(x as u32, y as u32);
            normalize(pixel[0])
        })
    }
}
