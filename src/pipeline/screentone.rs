//! Main screentone pipeline.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::GrayImage;

use crate::error::{Error, Result};
use crate::image::{decode_grayscale, encode_grayscale, load_image, save_image, ImageTensor};

use super::composite::compose;
use super::mask::{build_mask, coverage};
use super::pattern::overlay;
use super::quantize::quantize;

/// How the dot overlay is combined with the quantized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Multiply the dots over the quantized greys inside the mask.
    #[default]
    Multiply,
    /// Keep only pure-black line art and put the dots over it.
    ScreentoneOnly,
}

impl Mode {
    /// Labels the host shows for each mode, in declaration order.
    pub const LABELS: [&'static str; 2] = ["Multiply", "Screentone Only"];

    /// The host label for this mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Multiply => Self::LABELS[0],
            Self::ScreentoneOnly => Self::LABELS[1],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Multiply" => Ok(Self::Multiply),
            "Screentone Only" => Ok(Self::ScreentoneOnly),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Parameters of the screentone filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Distance in pixels between dot centres.
    pub dot_spacing: u32,

    /// Dot diameter in pixels.
    pub dot_size: u32,

    /// Number of grey levels after quantization (1-256).
    pub quantization: u16,

    /// Pixels at or above this fraction of white get no dots (0.0-1.0).
    pub white_threshold: f32,

    /// Fraction of pixels, darkest first, that collapse to black (0.0-1.0).
    pub black_threshold: f32,

    /// Side of the square used to erode the dot mask (0 disables).
    pub mask_shrink: u32,

    /// Opacity of the dot overlay (0.0-1.0).
    pub overlay_opacity: f32,

    /// Compositing mode.
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dot_spacing: 10,
            dot_size: 4,
            quantization: 4,
            white_threshold: 0.95,
            black_threshold: 0.1,
            mask_shrink: 5,
            overlay_opacity: 1.0,
            mode: Mode::Multiply,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.dot_spacing < 5 {
            return Err(Error::InvalidParameter {
                name: "dot_spacing".to_string(),
                reason: "must be at least 5".to_string(),
            });
        }

        if self.dot_size == 0 {
            return Err(Error::InvalidParameter {
                name: "dot_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if !(1..=256).contains(&self.quantization) {
            return Err(Error::InvalidParameter {
                name: "quantization".to_string(),
                reason: "must be between 1 and 256".to_string(),
            });
        }

        for (name, value) in [
            ("white_threshold", self.white_threshold),
            ("black_threshold", self.black_threshold),
            ("overlay_opacity", self.overlay_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }

        if self.mask_shrink > 10 {
            return Err(Error::InvalidParameter {
                name: "mask_shrink".to_string(),
                reason: "must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }
}

/// The screentone filter with a fixed configuration.
///
/// Holds no state besides its configuration; every call recomputes all
/// intermediate images.
#[derive(Debug, Clone)]
pub struct Screentone {
    config: Config,
}

impl Screentone {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing screentone pipeline with config: {config:?}");

        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Apply the filter to a host tensor.
    ///
    /// The input has shape `(1, height, width, channels)` with values in
    /// [0, 1]; the output has shape `(1, height, width, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor shape is not supported.
    pub fn apply(&self, image: &ImageTensor) -> Result<ImageTensor> {
        let gray = decode_grayscale(image)?;
        let result = self.apply_gray(&gray);
        Ok(encode_grayscale(&result))
    }

    /// Apply the filter to an 8-bit grayscale image.
    #[must_use]
    pub fn apply_gray(&self, gray: &GrayImage) -> GrayImage {
        let config = &self.config;
        let (width, height) = gray.dimensions();

        let quantized = quantize(gray, config.black_threshold, config.quantization);

        let dots = overlay(
            width,
            height,
            config.dot_spacing,
            config.dot_size,
            config.overlay_opacity,
        );

        let mask = build_mask(&quantized, config.white_threshold, config.mask_shrink);
        tracing::debug!("Mask covers {:.1}% of the image", coverage(&mask) * 100.0);

        compose(config.mode, &quantized, &dots, &mask)
    }

    /// Load an image, apply the filter and save the result.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input image
    /// * `output_path` - Path to save the processed image
    /// * `quality` - JPEG quality (1-100), ignored for other formats
    ///
    /// # Errors
    ///
    /// Returns an error if loading, processing or saving fails.
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        quality: u8,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        tracing::info!("Processing image: {}", input_path.display());
        let tensor = load_image(input_path)?;

        let output = self.apply(&tensor)?;

        tracing::info!("Saving output to: {}", output_path.display());
        save_image(&output, output_path, quality)?;

        tracing::info!("Processing complete");
        Ok(())
    }
}

/// Host entry point: apply the screentone filter to one image tensor.
///
/// Unlike [`Screentone::new`] this does not validate `config`; the host is
/// expected to have enforced the parameter ranges already.
///
/// # Errors
///
/// Returns an error if the tensor shape is not supported.
pub fn apply_screentone(image: &ImageTensor, config: &Config) -> Result<ImageTensor> {
    Screentone {
        config: config.clone(),
    }
    .apply(image)
}
