//! Binary mask of the region that receives the screentone.

use image::GrayImage;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

/// Binary mask indexed `[[y, x]]`, 1 where the screentone applies.
pub type Mask = Array2<u8>;

/// Mark every pixel darker than `white_threshold · 255`.
#[must_use]
pub fn threshold_mask(gray: &GrayImage, white_threshold: f32) -> Mask {
    let (width, height) = gray.dimensions();
    let cutoff = white_threshold * 255.0;

    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        // Safe: x and y are bounded by the image dimensions, which are u32
        #[allow(clippy::cast_possible_truncation)]
        let value = gray.get_pixel(x as u32, y as u32)[0];
        u8::from(f32::from(value) < cutoff)
    })
}

/// Binary erosion with a `side × side` square structuring element.
///
/// The element is anchored at index `side / 2` along each axis. Pixels
/// outside the mask count as unset, so the mask also shrinks away from the
/// image border. A side of 0 or 1 leaves the mask unchanged.
#[must_use]
pub fn erode(mask: &Mask, side: usize) -> Mask {
    if side <= 1 {
        return mask.clone();
    }

    // A square element is separable: erode rows, then columns.
    let mut rows = Mask::zeros(mask.raw_dim());
    Zip::from(rows.rows_mut())
        .and(mask.rows())
        .for_each(|out, line| erode_line(line, out, side));

    let mut eroded = Mask::zeros(mask.raw_dim());
    Zip::from(eroded.columns_mut())
        .and(rows.columns())
        .for_each(|out, line| erode_line(line, out, side));

    eroded
}

/// One-dimensional erosion of a line with a window of `side` samples.
fn erode_line(line: ArrayView1<'_, u8>, mut out: ArrayViewMut1<'_, u8>, side: usize) {
    let len = line.len();
    let before = side / 2;
    let after = side - 1 - before;

    // prefix[i] counts the set samples in line[..i]
    let mut prefix = Vec::with_capacity(len + 1);
    let mut running = 0usize;
    prefix.push(running);
    for &value in line {
        running += usize::from(value != 0);
        prefix.push(running);
    }

    for (x, slot) in out.iter_mut().enumerate() {
        let inside = x >= before && x + after < len;
        *slot = u8::from(inside && prefix[x + after + 1] - prefix[x - before] == side);
    }
}

/// Threshold the quantized image and shrink the result by `shrink`.
#[must_use]
pub fn build_mask(quantized: &GrayImage, white_threshold: f32, shrink: u32) -> Mask {
    let mask = threshold_mask(quantized, white_threshold);
    if shrink == 0 {
        return mask;
    }
    erode(&mask, shrink as usize)
}

/// Fraction of set pixels in a mask.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coverage(mask: &Mask) -> f64 {
    if mask.is_empty() {
        return 0.0;
    }
    let set = mask.iter().filter(|&&v| v != 0).count();
    set as f64 / mask.len() as f64
}
