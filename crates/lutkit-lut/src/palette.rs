//! Palette image LUT decoding.
//!
//! A palette image stores a `size^3` cube as a grid of `size x size` tiles,
//! one tile per blue slice. Inside a tile red runs along x and green along
//! y. Canonical palettes are 8 tiles wide (a 64^3 cube is a 512x512 image),
//! but the column count is taken from the image width so that other exact
//! grids, e.g. 32^3 stored as 512x64, decode as well.
//!
//! Decoding works on an already decoded 8-bit [`PaletteImage`]; turning a
//! file into one is the job of the I/O layer.
//!
//! # Example
//!
//! ```rust
//! use lutkit_lut::palette::{self, PaletteImage};
//!
//! // 2^3 cube as 2 tiles of 2x2 RGB pixels.
//! let pixels = vec![0u8; 4 * 2 * 3];
//! let image = PaletteImage::rgb8(4, 2, pixels);
//! let lut = palette::decode(&image, "flat.png").unwrap();
//! assert_eq!(lut.size(), 2);
//! ```

use tracing::trace;

use crate::colorspace;
use crate::format::{file_name, prettify_file_name};
use crate::model::{CHANNELS, MAX_DIMENSION};
use crate::{ColorSpaceTag, LutError, LutModel, LutResult};

/// Tiles per row in a canonical palette image.
pub const TILE_COLUMNS: usize = 8;

/// Description given to every palette-derived LUT.
pub const PALETTE_DESCRIPTION: &str = "Generated from PNG image";

/// Decoded pixel buffer handed over by an image decoder.
#[derive(Debug, Clone)]
pub struct PaletteImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// 3 (RGB) or 4 (RGBA).
    pub bytes_per_pixel: usize,
    /// Whether the fourth byte of each pixel is alpha.
    pub has_alpha: bool,
    /// Bits per channel; only 8 is accepted.
    pub bits_per_channel: u8,
    /// Row-major pixel bytes without row padding.
    pub pixels: Vec<u8>,
    /// Embedded color profile name, if any.
    pub profile_name: Option<String>,
}

impl PaletteImage {
    /// 8-bit RGB buffer.
    pub fn rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel: 3,
            has_alpha: false,
            bits_per_channel: 8,
            pixels,
            profile_name: None,
        }
    }

    /// 8-bit RGBA buffer.
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel: 4,
            has_alpha: true,
            bits_per_channel: 8,
            pixels,
            profile_name: None,
        }
    }

    /// Attaches an embedded profile name.
    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    /// Total pixel count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Returns the cube edge for a pixel count, if the count is a perfect cube.
pub fn cube_dimension(pixel_count: usize) -> Option<usize> {
    let size = (pixel_count as f64).cbrt().round() as usize;
    (size > 0 && size.checked_mul(size)?.checked_mul(size)? == pixel_count).then_some(size)
}

/// Decodes a palette image into a LUT.
pub fn decode(image: &PaletteImage, source_id: &str) -> LutResult<LutModel> {
    trace!(
        source = source_id,
        width = image.width,
        height = image.height,
        bpp = image.bytes_per_pixel,
        "palette::decode"
    );
    check_buffer(image)?;

    let width = image.width as usize;
    let height = image.height as usize;
    let bpp = image.bytes_per_pixel;

    let size = cube_dimension(image.pixel_count()).ok_or_else(|| {
        LutError::InvalidFormat(format!(
            "{}x{} image does not hold a whole LUT cube",
            image.width, image.height
        ))
    })?;
    if size > MAX_DIMENSION {
        return Err(LutError::InvalidFormat(format!(
            "palette cube of size {size} exceeds {MAX_DIMENSION}"
        )));
    }
    let columns = tile_columns(width, height, size)?;

    let bytes = &image.pixels;
    let mut values = Vec::with_capacity(size * size * size * CHANNELS);

    for blue in 0..size {
        let tile_x = (blue % columns) * size;
        let tile_y = (blue / columns) * size;
        for green in 0..size {
            for red in 0..size {
                let x = red + tile_x;
                let y = green + tile_y;
                let index = (y * width + x) * bpp;

                let r = f32::from(bytes[index]) / 255.0;
                let g = f32::from(bytes[index + 1]) / 255.0;
                let b = f32::from(bytes[index + 2]) / 255.0;
                let a = if image.has_alpha {
                    f32::from(bytes[index + 3]) / 255.0
                } else {
                    1.0
                };

                if ![r, g, b, a].iter().all(|v| (0.0..=1.0).contains(v)) {
                    return Err(LutError::InvalidLutValue(format!(
                        "pixel values out of range at position ({red}, {green}, {blue})"
                    )));
                }
                values.extend_from_slice(&[r, g, b, a]);
            }
        }
    }

    let expected = size * size * size * CHANNELS;
    if values.len() != expected {
        return Err(LutError::InvalidDataSize {
            expected,
            actual: values.len(),
        });
    }

    let color_space = image
        .profile_name
        .as_deref()
        .map(colorspace::resolve_profile)
        .unwrap_or(ColorSpaceTag::Srgb);

    Ok(LutModel::from_rgba(source_id, values, size)?
        .with_title(prettify_file_name(file_name(source_id)))
        .with_description(PALETTE_DESCRIPTION)
        .with_color_space(color_space))
}

/// Checks channel layout and that the buffer covers every pixel.
fn check_buffer(image: &PaletteImage) -> LutResult<()> {
    if image.bits_per_channel != 8 {
        return Err(LutError::InvalidFormat(format!(
            "only 8-bit per channel images are supported, got {} bits",
            image.bits_per_channel
        )));
    }
    match (image.bytes_per_pixel, image.has_alpha) {
        (3, false) | (4, _) => {}
        (bpp, alpha) => {
            return Err(LutError::InvalidFormat(format!(
                "unsupported pixel layout: {bpp} bytes per pixel, alpha={alpha}; only RGB or RGBA are supported"
            )));
        }
    }
    if image.width == 0 || image.height == 0 {
        return Err(LutError::InvalidImage("image has no pixels".into()));
    }

    let required = image
        .pixel_count()
        .checked_mul(image.bytes_per_pixel)
        .ok_or_else(|| LutError::InvalidImage("image dimensions overflow".into()))?;
    if image.pixels.len() < required {
        return Err(LutError::InvalidImage(format!(
            "pixel buffer holds {} bytes, {}x{} needs {}",
            image.pixels.len(),
            image.width,
            image.height,
            required
        )));
    }
    Ok(())
}

/// Number of tile columns, ensuring every tile lies inside the image.
fn tile_columns(width: usize, height: usize, size: usize) -> LutResult<usize> {
    let columns = width / size;
    let rows = if columns > 0 { size.div_ceil(columns) } else { 0 };
    if columns == 0 || width % size != 0 || rows * size > height {
        return Err(LutError::InvalidFormat(format!(
            "{width}x{height} image is not a grid of {size}x{size} tiles"
        )));
    }
    Ok(columns)
}
