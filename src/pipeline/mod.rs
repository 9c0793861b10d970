//! Screentone filter pipeline: quantize, overlay, mask, composite.

pub mod composite;
pub mod mask;
pub mod pattern;
pub mod quantize;
mod screentone;

pub use screentone::{apply_screentone, Config, Mode, Screentone};
