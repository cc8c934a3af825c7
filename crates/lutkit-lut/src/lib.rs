//! # lutkit-lut
//!
//! Canonical 3D LUT model and parsers for LUT sources.
//!
//! Every supported source ends up as a [`LutModel`]: an RGBA float cube in
//! red-fastest order plus title, description, optional input range and a
//! [`ColorSpaceTag`].
//!
//! # Sources
//!
//! - `.cube` text files ([`cube`] module)
//! - Palette images, a grid of `size x size` tiles ([`palette`] module).
//!   Image decoding itself lives in `lutkit-io`; this crate decodes the
//!   pixel buffer.
//!
//! # Usage
//!
//! ```rust
//! use lutkit_lut::{cube, ColorSpaceTag};
//!
//! let text = "TITLE \"Warm\"\nLUT_3D_SIZE 2\n\
//!     0 0 0\n1 0 0\n0 1 0\n1 1 0\n0 0 1\n1 0 1\n0 1 1\n1 1 1\n";
//! let lut = cube::parse_str(text, "warm.cube").unwrap();
//! assert_eq!(lut.title(), "Warm");
//! assert_eq!(lut.size(), 2);
//! assert_eq!(lut.color_space(), ColorSpaceTag::Srgb);
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Diagnostics
//! - [`bytemuck`] - Zero-copy byte view of cube data
//!
//! # Used By
//!
//! - `lutkit-io` - File loading and caching
//! - `lutkit-cli` - Command line tool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod model;
pub mod colorspace;
pub mod cube;
pub mod format;
pub mod palette;

pub use colorspace::ColorSpaceTag;
pub use error::{LutError, LutResult};
pub use format::{LutFormat, prettify_file_name};
pub use model::{CHANNELS, CubeParams, DEFAULT_TITLE, InputRange, LutModel, MAX_DIMENSION};
pub use palette::PaletteImage;
