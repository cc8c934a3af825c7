//! Decoder dispatch.
//!
//! Each [`LutFormat`] maps to one [`LutDecoder`]. Decoders are stateless
//! and shared as `&'static dyn LutDecoder`.

use std::path::Path;

use lutkit_lut::{LutFormat, LutModel, cube, palette};
use tracing::trace;

use crate::{IoResult, png};

/// Turns a file into a [`LutModel`].
///
/// Implement this trait to add support for a new LUT encoding.
pub trait LutDecoder: Send + Sync {
    /// Decodes the file at `path`. The path string becomes the model's id.
    fn decode(&self, path: &Path) -> IoResult<LutModel>;

    /// Format handled by this decoder.
    fn format(&self) -> LutFormat;
}

/// `.cube` text decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeDecoder;

impl LutDecoder for CubeDecoder {
    fn decode(&self, path: &Path) -> IoResult<LutModel> {
        trace!(path = %path.display(), "CubeDecoder::decode");
        Ok(cube::read(path)?)
    }

    fn format(&self) -> LutFormat {
        LutFormat::Cube
    }
}

/// Palette PNG decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteDecoder;

impl LutDecoder for PaletteDecoder {
    fn decode(&self, path: &Path) -> IoResult<LutModel> {
        trace!(path = %path.display(), "PaletteDecoder::decode");
        let image = png::read_palette(path)?;
        Ok(palette::decode(&image, &path.to_string_lossy())?)
    }

    fn format(&self) -> LutFormat {
        LutFormat::Palette
    }
}

static CUBE: CubeDecoder = CubeDecoder;
static PALETTE: PaletteDecoder = PaletteDecoder;

/// Returns the decoder registered for a format.
pub fn decoder_for(format: LutFormat) -> &'static dyn LutDecoder {
    match format {
        LutFormat::Cube => &CUBE,
        LutFormat::Palette => &PALETTE,
    }
}
