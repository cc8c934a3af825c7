//! Adobe/Resolve .cube LUT format support.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! LUT_3D_INPUT_RANGE 0.0 1.0
//! COLOR_SPACE DisplayP3
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Parsing is two passes over the lines. The header pass runs until the
//! first data line (exactly three finite floats) and collects metadata;
//! blank and `#` lines before that point make up the description. The data
//! pass keeps every conforming line from there on and silently skips the
//! rest.
//!
//! Files with more entries than `LUT_3D_SIZE^3` are truncated to the first
//! `size^3` entries. Files with fewer are rejected.
//!
//! # Example
//!
//! ```rust,ignore
//! use lutkit_lut::cube;
//!
//! let lut = cube::read("Kodachrome 25.cube")?;
//! println!("{} ({}^3)", lut.title(), lut.size());
//! ```

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::colorspace;
use crate::model::{DEFAULT_TITLE, MAX_DIMENSION};
use crate::{ColorSpaceTag, InputRange, LutError, LutModel, LutResult};

/// Reads a 3D LUT from a .cube file.
///
/// The path string becomes the model's source id.
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<LutModel> {
    let path = path.as_ref();
    trace!(path = %path.display(), "cube::read");

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LutError::FileNotFound(path.display().to_string()),
        _ => LutError::Io(e),
    })?;
    let content = String::from_utf8(bytes).map_err(|_| {
        LutError::InvalidFormat(format!("{} is not valid UTF-8", path.display()))
    })?;

    parse_str(&content, &path.to_string_lossy())
}

/// Parses .cube text into a LUT.
pub fn parse_str(content: &str, source_id: &str) -> LutResult<LutModel> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = split_lines(content).map(str::trim).collect();

    let header = parse_header(&lines)?;
    let size = match header.size {
        Some(size) if (1..=MAX_DIMENSION as i64).contains(&size) => size as usize,
        _ => return Err(LutError::MissingDimension),
    };

    let expected = size * size * size;
    let mut data: Vec<[f32; 3]> = Vec::with_capacity(expected.min(lines.len()));
    data.extend(lines[header.first_data_line..].iter().filter_map(|l| parse_rgb(l)));

    if data.len() < expected {
        return Err(LutError::InvalidDataSize {
            expected,
            actual: data.len(),
        });
    }
    if data.len() > expected {
        debug!(
            source = source_id,
            expected,
            found = data.len(),
            "truncating extra .cube entries"
        );
        data.truncate(expected);
    }

    let mut lut = LutModel::from_rgb(source_id, &data, size)?
        .with_title(header.title)
        .with_description(header.description)
        .with_color_space(header.color_space);
    if let Some(range) = header.range {
        lut = lut.with_range(range);
    }
    Ok(lut)
}

/// Splits text on `\n`, `\r\n` and bare `\r` line endings.
///
/// A single trailing terminator does not produce an empty last line.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let body = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix(['\n', '\r']))
        .unwrap_or(content);
    let body = (!content.is_empty()).then_some(body);
    body.into_iter()
        .flat_map(|b| b.split('\n'))
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Metadata collected before the first data line.
struct Header {
    title: String,
    description: String,
    size: Option<i64>,
    range: Option<InputRange>,
    color_space: ColorSpaceTag,
    first_data_line: usize,
}

fn parse_header(lines: &[&str]) -> LutResult<Header> {
    let mut header = Header {
        title: DEFAULT_TITLE.to_string(),
        description: String::new(),
        size: None,
        range: None,
        color_space: ColorSpaceTag::default(),
        first_data_line: lines.len(),
    };

    for (index, &line) in lines.iter().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            header.description.push_str(line);
            header.description.push('\n');
            continue;
        }

        let lower = line.to_lowercase();

        if lower.starts_with("title") {
            header.title = line
                .chars()
                .skip(6)
                .collect::<String>()
                .trim()
                .replace('"', "");
        } else if lower.contains("lut_3d_size") {
            header.size = line.split_whitespace().last().and_then(|t| t.parse().ok());
        } else if lower.contains("lut_3d_input_range") {
            let bounds: Vec<f32> = line
                .split_whitespace()
                .filter_map(|t| t.parse().ok())
                .collect();
            if bounds.len() >= 2 {
                header.range = Some(InputRange::new(bounds[0], bounds[1])?);
            }
        } else if lower.starts_with("color_space") {
            if let Some(name) = line.split_whitespace().nth(1) {
                header.color_space = colorspace::resolve(name);
            }
        } else if parse_rgb(line).is_some() {
            header.first_data_line = index;
            break;
        }
    }

    Ok(header)
}

/// Parses a data line: exactly three whitespace-separated finite floats.
fn parse_rgb(line: &str) -> Option<[f32; 3]> {
    let mut parts = line.split_whitespace();
    let mut rgb = [0.0f32; 3];
    for value in &mut rgb {
        *value = parts.next()?.parse().ok().filter(|v: &f32| v.is_finite())?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(rgb),
    }
}

/// Serializes a LUT as .cube text.
///
/// Alpha is dropped; the format only stores RGB.
pub fn to_string(lut: &LutModel) -> String {
    let mut out = String::with_capacity(64 + lut.entry_count() * 30);

    let _ = writeln!(out, "TITLE \"{}\"", lut.title());
    for comment in lut.description().lines().filter(|l| l.starts_with('#')) {
        let _ = writeln!(out, "{comment}");
    }
    let _ = writeln!(out, "LUT_3D_SIZE {}", lut.size());
    if let Some(range) = lut.range() {
        let _ = writeln!(out, "LUT_3D_INPUT_RANGE {:.6} {:.6}", range.lo(), range.hi());
    }
    if lut.color_space() != ColorSpaceTag::Srgb {
        let _ = writeln!(out, "COLOR_SPACE {}", lut.color_space());
    }
    out.push('\n');

    // Data is already red-fastest, matching the file order.
    for e in lut.cube_data().chunks_exact(4) {
        let _ = writeln!(out, "{:.6} {:.6} {:.6}", e[0], e[1], e[2]);
    }

    out
}

/// Writes a LUT to a .cube file.
///
/// # Example
///
/// ```rust,ignore
/// let lut = LutModel::identity("identity", 33, ColorSpaceTag::Srgb)?;
/// cube::write("identity.cube", &lut)?;
/// ```
pub fn write<P: AsRef<Path>>(path: P, lut: &LutModel) -> LutResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(to_string(lut).as_bytes())?;
    writer.flush()?;
    Ok(())
}
