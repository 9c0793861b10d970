//! # screentone
//!
//! A manga-style screentone filter for node-based image pipelines.
//!
//! The filter posterizes an image into a few grey levels, lays a regular
//! dot pattern over everything that is not near-white, and composites the
//! two with a multiply blend. It is a pure function of the image and a
//! [`Config`]; the host-facing metadata lives in [`node::NODE`].
//!
//! ## Example
//!
//! ```no_run
//! use screentone::{Config, Screentone};
//!
//! # fn main() -> screentone::Result<()> {
//! let config = Config::default();
//! let pipeline = Screentone::new(config)?;
//!
//! pipeline.process("page.png", "toned.png", 95)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod node;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{apply_screentone, Config, Mode, Screentone};
