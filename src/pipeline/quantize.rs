//! Grayscale quantization against a percentile black point.

use image::GrayImage;

/// Find the order-statistic black point.
///
/// Returns the sample at rank `⌊black_threshold · count⌋` of the sorted
/// pixel values. A threshold of 1.0 yields the brightest sample.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn black_point(gray: &GrayImage, black_threshold: f32) -> u8 {
    let mut samples = gray.as_raw().clone();
    let count = samples.len();

    if count == 0 {
        return 0;
    }

    // Safe: threshold is in [0, 1] so the rank is non-negative and at most count
    let rank = ((f64::from(black_threshold) * count as f64).floor() as usize).min(count - 1);
    let (_, value, _) = samples.select_nth_unstable(rank);
    *value
}

/// Build `levels` bin edges spaced linearly from `black_point` to 255.
///
/// The first edge is pinned to the black point and the last to 255. With a
/// single level only the upper edge survives.
#[must_use]
pub fn bin_edges(black_point: u8, levels: u16) -> Vec<f64> {
    let start = f64::from(black_point);
    let n = usize::from(levels.max(1));

    let mut edges: Vec<f64> = if n == 1 {
        vec![start]
    } else {
        let span = 255.0 - start;
        let last = f64::from(levels - 1);
        (0..levels)
            .map(|i| start + span * f64::from(i) / last)
            .collect()
    };

    edges[0] = start;
    edges[n - 1] = 255.0;
    edges
}

/// Right-open digitization: the number of edges at or below `value`.
#[inline]
#[must_use]
pub fn digitize(value: u8, edges: &[f64]) -> usize {
    let value = f64::from(value);
    edges.partition_point(|&edge| edge <= value)
}

/// Map a bin index to its output grey level `index · 255 / (levels - 1)`,
/// clipped to 255. A single level maps everything to 0.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn level(index: usize, levels: u16) -> u8 {
    if levels <= 1 {
        return 0;
    }

    let step = 255.0 / f64::from(levels - 1);
    // Safe: clamped to [0, 255] before casting
    (index as f64 * step).round().min(255.0) as u8
}

/// Quantize a grayscale image into at most `levels` grey levels.
///
/// Pixels darker than the black point become 0; the remaining range up to
/// white is split into linearly spaced bins.
#[must_use]
pub fn quantize(gray: &GrayImage, black_threshold: f32, levels: u16) -> GrayImage {
    let black = black_point(gray, black_threshold);
    let edges = bin_edges(black, levels);

    tracing::debug!("Black point {black} for threshold {black_threshold}, {levels} levels");

    let mut lut = [0u8; 256];
    for (value, slot) in (0..=u8::MAX).zip(lut.iter_mut()) {
        *slot = level(digitize(value, &edges), levels);
    }

    let mut quantized = gray.clone();
    for pixel in quantized.pixels_mut() {
        pixel[0] = lut[usize::from(pixel[0])];
    }
    quantized
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = ((x + y * width) % 256) as u8;
            Luma([value])
        })
    }

    fn random_image(seed: u64) -> GrayImage {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        GrayImage::from_fn(32, 32, |_, _| Luma([rng.random::<u8>()]))
    }

    #[test]
    fn test_black_point_is_percentile() {
        let gray = gradient(16, 16);

        assert_eq!(black_point(&gray, 0.0), 0);
        assert_eq!(black_point(&gray, 0.5), 128);
        assert_eq!(black_point(&gray, 0.1), 25);
    }

    #[test]
    fn test_black_point_full_threshold() {
        let gray = gradient(16, 16);
        assert_eq!(black_point(&gray, 1.0), 255);
    }

    #[test]
    fn test_bin_edges_pinned() {
        let edges = bin_edges(51, 5);

        assert_eq!(edges.len(), 5);
        assert!((edges[0] - 51.0).abs() < f64::EPSILON);
        assert!((edges[2] - 153.0).abs() < 1e-9);
        assert!((edges[4] - 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bin_edges_single_level() {
        assert_eq!(bin_edges(40, 1), vec![255.0]);
    }

    #[test]
    fn test_digitize_right_open() {
        let edges = [10.0, 20.0, 30.0];

        assert_eq!(digitize(9, &edges), 0);
        assert_eq!(digitize(10, &edges), 1);
        assert_eq!(digitize(19, &edges), 1);
        assert_eq!(digitize(20, &edges), 2);
        assert_eq!(digitize(30, &edges), 3);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level(0, 4), 0);
        assert_eq!(level(1, 4), 85);
        assert_eq!(level(2, 4), 170);
        assert_eq!(level(3, 4), 255);
        assert_eq!(level(4, 4), 255);
        assert_eq!(level(1, 3), 128);
    }

    #[test]
    fn test_single_level_is_flat() {
        let quantized = quantize(&gradient(16, 16), 0.3, 1);
        assert!(quantized.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_levels_bounded() {
        let gray = random_image(7);

        for levels in [2u16, 3, 4, 7, 16, 256] {
            for threshold in [0.0f32, 0.1, 0.5, 0.9] {
                let quantized = quantize(&gray, threshold, levels);
                let distinct: BTreeSet<u8> = quantized.pixels().map(|p| p[0]).collect();
                let allowed: BTreeSet<u8> = (0..usize::from(levels))
                    .map(|i| level(i, levels))
                    .collect();

                assert!(distinct.len() <= usize::from(levels));
                assert!(distinct.is_subset(&allowed), "levels={levels}");
            }
        }
    }

    #[test]
    fn test_black_fraction_monotonic() {
        let gray = random_image(11);
        let total = gray.pixels().len();
        let mut previous = 0usize;

        for step in 0..=20u8 {
            let threshold = f32::from(step) / 20.0;
            let quantized = quantize(&gray, threshold, 4);
            let black = quantized.pixels().filter(|p| p[0] == 0).count();

            assert!(black >= previous, "threshold={threshold}");
            assert!(black <= total);
            previous = black;
        }
    }

    #[test]
    fn test_full_levels_near_identity() {
        let gray = gradient(16, 16);
        let quantized = quantize(&gray, 0.0, 256);

        for (original, result) in gray.pixels().zip(quantized.pixels()) {
            assert!(original[0].abs_diff(result[0]) <= 1);
        }
    }

    #[test]
    fn test_uniform_mid_grey() {
        let gray = GrayImage::from_pixel(4, 4, Luma([128]));
        let quantized = quantize(&gray, 0.0, 4);

        assert!(quantized.pixels().all(|p| p[0] == 85));
    }
}
