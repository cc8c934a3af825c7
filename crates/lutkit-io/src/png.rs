//! PNG palette image support.
//!
//! Reads 8-bit RGB/RGBA PNGs into a [`PaletteImage`] for
//! [`lutkit_lut::palette::decode`], and writes a [`LutModel`] back out as a
//! palette PNG.
//!
//! # Color profile
//!
//! The profile name handed to the palette decoder is taken from, in order:
//!
//! 1. an `sRGB` chunk, reported as `"sRGB"`
//! 2. an embedded `iCCP` profile, reported by its description (via `lcms2`)
//!
//! Images with neither carry no profile name and resolve to sRGB.
//!
//! # Example
//!
//! ```rust,ignore
//! use lutkit_io::png;
//! use lutkit_lut::palette;
//!
//! let image = png::read_palette("teal_orange.png")?;
//! let lut = palette::decode(&image, "teal_orange.png")?;
//! png::write_palette("copy.png", &lut)?;
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;

use lutkit_lut::palette::{PaletteImage, TILE_COLUMNS};
use lutkit_lut::{CHANNELS, ColorSpaceTag, LutError, LutModel};
use tracing::{debug, trace};

use crate::error::{invalid_format, invalid_image};
use crate::{IoError, IoResult};

/// Reads a palette PNG from the given path.
pub fn read_palette<P: AsRef<Path>>(path: P) -> IoResult<PaletteImage> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png::read_palette");
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => IoError::Lut(LutError::FileNotFound(path.display().to_string())),
        _ => IoError::Io(e),
    })?;
    decode_png(BufReader::new(file))
}

/// Reads a palette PNG from memory.
pub fn read_palette_from_memory(data: &[u8]) -> IoResult<PaletteImage> {
    decode_png(Cursor::new(data))
}

fn decode_png<R: BufRead + Seek>(reader: R) -> IoResult<PaletteImage> {
    let mut decoder = png::Decoder::new(reader);
    // No expansion: indexed, gray and 16-bit images stay as stored and are rejected below.
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| invalid_image(e.to_string()))?;
    let profile_name = profile_name(reader.info());

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| invalid_image("cannot determine output buffer size"))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| invalid_image(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let image = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => PaletteImage::rgb8(info.width, info.height, buf),
        (png::ColorType::Rgba, png::BitDepth::Eight) => PaletteImage::rgba8(info.width, info.height, buf),
        (color_type, bit_depth) => {
            return Err(invalid_format(format!(
                "unsupported PNG layout {color_type:?} {bit_depth:?}, only 8-bit RGB or RGBA is supported"
            )));
        }
    };

    Ok(match profile_name {
        Some(name) => image.with_profile_name(name),
        None => image,
    })
}

/// Name of the color profile declared by the PNG, if any.
fn profile_name(info: &png::Info<'_>) -> Option<String> {
    if info.srgb.is_some() {
        return Some(ColorSpaceTag::Srgb.name().to_string());
    }
    let icc = info.icc_profile.as_deref()?;
    match lcms2::Profile::new_icc(icc) {
        Ok(profile) => profile
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .filter(|d| !d.is_empty()),
        Err(e) => {
            debug!(error = %e, "unreadable embedded ICC profile ignored");
            None
        }
    }
}

/// Writes a LUT as an 8-bit RGB palette PNG.
///
/// Tiles are laid out with the largest column count up to
/// [`TILE_COLUMNS`] that divides the cube edge, so the image holds exactly
/// `size^3` pixels and decodes back to the same cube. Values are clamped to
/// `[0, 1]` and alpha is dropped.
pub fn write_palette<P: AsRef<Path>>(path: P, lut: &LutModel) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), size = lut.size(), "png::write_palette");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_palette(&mut writer, lut)?;
    writer.flush()?;
    Ok(())
}

/// Encodes a LUT as palette PNG bytes.
pub fn write_palette_to_memory(lut: &LutModel) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_palette(&mut out, lut)?;
    Ok(out)
}

/// Tile columns used when writing a cube of the given edge.
pub fn palette_columns(size: usize) -> usize {
    (1..=TILE_COLUMNS).rev().find(|c| size % c == 0).unwrap_or(1)
}

fn encode_palette<W: Write>(writer: W, lut: &LutModel) -> IoResult<()> {
    let size = lut.size();
    let columns = palette_columns(size);
    let width = columns * size;
    let height = (size / columns) * size;

    let mut pixels = vec![0u8; width * height * 3];
    for (i, entry) in lut.cube_data().chunks_exact(CHANNELS).enumerate() {
        let red = i % size;
        let green = (i / size) % size;
        let blue = i / (size * size);
        let x = red + (blue % columns) * size;
        let y = green + (blue / columns) * size;
        let offset = (y * width + x) * 3;
        for (dst, &v) in pixels[offset..offset + 3].iter_mut().zip(entry) {
            *dst = quantize(v);
        }
    }

    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    match lut.color_space() {
        ColorSpaceTag::Srgb => encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual),
        other => debug!(color_space = %other, "palette PNG written without a color profile"),
    }

    let mut png_writer = encoder.write_header().map_err(encoding_error)?;
    png_writer.write_image_data(&pixels).map_err(encoding_error)?;
    png_writer.finish().map_err(encoding_error)?;
    Ok(())
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn encoding_error(e: png::EncodingError) -> IoError {
    match e {
        png::EncodingError::IoError(e) => IoError::Io(e),
        other => IoError::Io(io::Error::other(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lutkit_lut::palette;

    fn lut_with_profile(size: usize, color_space: ColorSpaceTag) -> LutModel {
        LutModel::identity("memory://identity", size, color_space).unwrap()
    }

    #[test]
    fn column_choice() {
        assert_eq!(palette_columns(64), 8);
        assert_eq!(palette_columns(33), 3);
        assert_eq!(palette_columns(17), 1);
        assert_eq!(palette_columns(12), 6);
    }

    #[test]
    fn memory_roundtrip_keeps_cube() {
        let lut = lut_with_profile(12, ColorSpaceTag::Srgb);
        let bytes = write_palette_to_memory(&lut).unwrap();

        let image = read_palette_from_memory(&bytes).unwrap();
        assert_eq!((image.width, image.height), (72, 24));
        assert_eq!(image.bytes_per_pixel, 3);
        assert!(!image.has_alpha);
        assert_eq!(image.profile_name.as_deref(), Some("sRGB"));

        let decoded = palette::decode(&image, "identity.png").unwrap();
        assert_eq!(decoded.size(), 12);
        for (a, b) in decoded.cube_data().iter().zip(lut.cube_data()) {
            assert!((a - b).abs() <= 0.5 / 255.0 + f32::EPSILON);
        }
    }

    #[test]
    fn display_p3_has_no_srgb_chunk() {
        let lut = lut_with_profile(4, ColorSpaceTag::DisplayP3);
        let bytes = write_palette_to_memory(&lut).unwrap();
        let image = read_palette_from_memory(&bytes).unwrap();
        assert_eq!(image.profile_name, None);
    }

    #[test]
    fn sixteen_bit_rejected() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 4, 2);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Sixteen);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0u8; 4 * 2 * 6]).unwrap();
            writer.finish().unwrap();
        }
        let err = read_palette_from_memory(&bytes).unwrap_err();
        assert!(matches!(err, IoError::Lut(LutError::InvalidFormat(_))));
    }

    #[test]
    fn indexed_rejected() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 4, 2);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![0u8, 0, 0, 255, 255, 255]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0u8, 1, 0, 1, 1, 0, 1, 0]).unwrap();
            writer.finish().unwrap();
        }
        let err = read_palette_from_memory(&bytes).unwrap_err();
        assert!(matches!(err, IoError::Lut(LutError::InvalidFormat(_))));
    }

    #[test]
    fn garbage_is_invalid_image() {
        let err = read_palette_from_memory(b"definitely not a png").unwrap_err();
        assert!(matches!(err, IoError::Lut(LutError::InvalidImage(_))));
    }

    #[test]
    fn missing_file() {
        let err = read_palette("/nonexistent/dir/palette.png").unwrap_err();
        assert!(matches!(err, IoError::Lut(LutError::FileNotFound(_))));
    }

    #[test]
    fn write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.png");
        write_palette(&path, &lut_with_profile(8, ColorSpaceTag::Srgb)).unwrap();

        let image = read_palette(&path).unwrap();
        assert_eq!((image.width, image.height), (64, 8));
    }
}
