//! # lutkit-io
//!
//! File loading for LUT sources.
//!
//! - [`load`] - classify by extension and decode, no caching
//! - [`load_cached`] - same, routed through a [`LutCache`]
//! - [`load_all`] - decode many files in parallel
//!
//! # Architecture
//!
//! Each [`LutFormat`] has one [`LutDecoder`] ([`decoder_for`]). `.cube`
//! files are parsed by `lutkit-lut` directly; palette PNGs are decoded with
//! the [`png`] module first and then handed to
//! [`lutkit_lut::palette::decode`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lutkit_io::{load_cached, CacheConfig, LutCache};
//!
//! let cache = LutCache::new(CacheConfig::default())?;
//! let lut = load_cached("looks/teal_orange.png", &cache)?;
//! println!("{} ({}^3)", lut.title(), lut.size());
//! ```
//!
//! # Dependencies
//!
//! - [`lutkit-lut`] - LUT model and parsers
//! - [`png`] - PNG decoding and encoding
//! - [`lcms2`] - Embedded ICC profile names
//! - [`rayon`] - Parallel batch loading

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod cache;
pub mod decode;
pub mod png;

pub use cache::{CacheConfig, CacheStats, LutCache};
pub use decode::{CubeDecoder, LutDecoder, PaletteDecoder, decoder_for};
pub use error::{IoError, IoResult};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lutkit_lut::{LutFormat, LutModel};
use rayon::prelude::*;
use tracing::trace;

/// Loads a LUT file, detecting the format from its extension.
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not a supported LUT format
/// - The file cannot be read
/// - The content is not a valid LUT
pub fn load<P: AsRef<Path>>(path: P) -> IoResult<LutModel> {
    let path = path.as_ref();
    let format = LutFormat::classify(path)?;
    trace!(path = %path.display(), format = format.name(), "load");
    decoder_for(format).decode(path)
}

/// Loads a LUT file through a cache keyed by the path string.
///
/// A hit returns the cached model without touching the file.
pub fn load_cached<P: AsRef<Path>>(path: P, cache: &LutCache) -> IoResult<Arc<LutModel>> {
    let path = path.as_ref();
    let id = path.to_string_lossy();
    cache.get_or_try_insert_with(&id, || load(path))
}

/// Loads many files in parallel. Results keep the input order.
pub fn load_all<P>(paths: &[P]) -> Vec<(PathBuf, IoResult<LutModel>)>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|p| {
            let path = p.as_ref();
            (path.to_path_buf(), load(path))
        })
        .collect()
}
