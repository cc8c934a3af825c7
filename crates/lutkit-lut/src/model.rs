//! Canonical LUT model.
//!
//! [`LutModel`] is what both the `.cube` parser and the palette decoder
//! produce: a cube of RGBA float entries plus the metadata needed by a
//! color-cube filter.
//!
//! # Layout
//!
//! - `size^3` entries, four `f32` each (R, G, B, A)
//! - red varies fastest, then green, then blue
//! - alpha is `1.0` unless the source carried real alpha
//!
//! # Example
//!
//! ```rust
//! use lutkit_lut::{ColorSpaceTag, LutModel};
//!
//! let lut = LutModel::identity("memory://identity", 17, ColorSpaceTag::Srgb).unwrap();
//! assert_eq!(lut.cube_data().len(), 17 * 17 * 17 * 4);
//! assert_eq!(lut.dimension(), 17.0);
//! ```

use std::hash::{Hash, Hasher};

use crate::{ColorSpaceTag, LutError, LutResult};

/// Largest supported cube edge length.
pub const MAX_DIMENSION: usize = 256;

/// Floats per cube entry.
pub const CHANNELS: usize = 4;

/// Title used when a source carries none.
pub const DEFAULT_TITLE: &str = "Unknown";

/// Closed input interval `[lo, hi]` a text LUT is defined over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRange {
    lo: f32,
    hi: f32,
}

impl InputRange {
    /// Creates a range; both ends must be finite with `lo <= hi`.
    pub fn new(lo: f32, hi: f32) -> LutResult<Self> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(LutError::InvalidFormat(format!(
                "input range [{lo}, {hi}] is not finite"
            )));
        }
        if lo > hi {
            return Err(LutError::InvalidFormat(format!(
                "input range [{lo}, {hi}] has lo > hi"
            )));
        }
        Ok(Self { lo, hi })
    }

    /// Lower bound.
    #[inline]
    pub fn lo(&self) -> f32 {
        self.lo
    }

    /// Upper bound.
    #[inline]
    pub fn hi(&self) -> f32 {
        self.hi
    }

    /// Returns true if `value` lies inside the closed interval.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl Default for InputRange {
    fn default() -> Self {
        Self { lo: 0.0, hi: 1.0 }
    }
}

/// Parameters for an external color-cube filter.
#[derive(Debug, Clone, Copy)]
pub struct CubeParams<'a> {
    /// Cube edge length as the filter expects it.
    pub dimension: f32,
    /// Flat RGBA payload.
    pub data: &'a [f32],
    /// Color space the cube is expressed in.
    pub color_space: ColorSpaceTag,
}

/// An immutable 3D lookup table.
///
/// Equality and hashing only look at [`source_id`](Self::source_id), which
/// is also the key used by caches.
#[derive(Debug, Clone)]
pub struct LutModel {
    source_id: String,
    title: String,
    description: String,
    cube_data: Vec<f32>,
    size: usize,
    range: Option<InputRange>,
    color_space: ColorSpaceTag,
}

impl LutModel {
    /// Creates a LUT from RGBA-interleaved data.
    ///
    /// Data must hold exactly `size^3 * 4` finite values in red-fastest
    /// order.
    pub fn from_rgba(
        source_id: impl Into<String>,
        cube_data: Vec<f32>,
        size: usize,
    ) -> LutResult<Self> {
        validate_size(size)?;
        let expected = size * size * size * CHANNELS;
        if cube_data.len() != expected {
            return Err(LutError::InvalidDataSize {
                expected,
                actual: cube_data.len(),
            });
        }
        if let Some(pos) = cube_data.iter().position(|v| !v.is_finite()) {
            return Err(LutError::InvalidLutValue(format!(
                "non-finite value at index {pos}"
            )));
        }

        Ok(Self {
            source_id: source_id.into(),
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            cube_data,
            size,
            range: None,
            color_space: ColorSpaceTag::default(),
        })
    }

    /// Creates a LUT from RGB triplets, setting alpha to `1.0`.
    pub fn from_rgb(
        source_id: impl Into<String>,
        triplets: &[[f32; 3]],
        size: usize,
    ) -> LutResult<Self> {
        validate_size(size)?;
        let expected = size * size * size;
        if triplets.len() != expected {
            return Err(LutError::InvalidDataSize {
                expected,
                actual: triplets.len(),
            });
        }

        let mut rgba = Vec::with_capacity(expected * CHANNELS);
        for &[r, g, b] in triplets {
            rgba.extend_from_slice(&[r, g, b, 1.0]);
        }
        Self::from_rgba(source_id, rgba, size)
    }

    /// Creates an identity (pass-through) LUT.
    pub fn identity(
        source_id: impl Into<String>,
        size: usize,
        color_space: ColorSpaceTag,
    ) -> LutResult<Self> {
        validate_size(size)?;
        let scale = if size > 1 { (size - 1) as f32 } else { 1.0 };
        let mut data = Vec::with_capacity(size * size * size * CHANNELS);

        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.extend_from_slice(&[
                        r as f32 / scale,
                        g as f32 / scale,
                        b as f32 / scale,
                        1.0,
                    ]);
                }
            }
        }

        Ok(Self::from_rgba(source_id, data, size)?
            .with_title("Identity")
            .with_color_space(color_space))
    }

    /// Sets the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the input domain.
    pub fn with_range(mut self, range: InputRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Sets the color space tag.
    pub fn with_color_space(mut self, color_space: ColorSpaceTag) -> Self {
        self.color_space = color_space;
        self
    }

    /// Source identity (path or URL).
    #[inline]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Alias of [`source_id`](Self::source_id).
    #[inline]
    pub fn id(&self) -> &str {
        &self.source_id
    }

    /// Display title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text description (comment lines for `.cube` sources).
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Flat RGBA payload.
    #[inline]
    pub fn cube_data(&self) -> &[f32] {
        &self.cube_data
    }

    /// Payload as packed native-endian `f32` bytes.
    #[inline]
    pub fn cube_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cube_data)
    }

    /// Cube edge length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cube edge length as a float, the form color-cube filters take.
    #[inline]
    pub fn dimension(&self) -> f32 {
        self.size as f32
    }

    /// Input domain, if the source declared one.
    #[inline]
    pub fn range(&self) -> Option<InputRange> {
        self.range
    }

    /// Color space tag.
    #[inline]
    pub fn color_space(&self) -> ColorSpaceTag {
        self.color_space
    }

    /// Number of cube entries (`size^3`).
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Expected payload size in bytes.
    #[inline]
    pub fn data_size(&self) -> usize {
        self.entry_count() * CHANNELS * std::mem::size_of::<f32>()
    }

    /// Returns the RGBA entry at grid position (r, g, b).
    pub fn rgba_at(&self, r: usize, g: usize, b: usize) -> Option<[f32; 4]> {
        if r >= self.size || g >= self.size || b >= self.size {
            return None;
        }
        let idx = (b * self.size * self.size + g * self.size + r) * CHANNELS;
        let e = &self.cube_data[idx..idx + CHANNELS];
        Some([e[0], e[1], e[2], e[3]])
    }

    /// Builds color-cube filter parameters.
    ///
    /// With `expected` set, the LUT must declare that color space.
    pub fn cube_params(&self, expected: Option<ColorSpaceTag>) -> LutResult<CubeParams<'_>> {
        let actual = self.cube_bytes().len();
        if actual != self.data_size() {
            return Err(LutError::InvalidDataSize {
                expected: self.data_size(),
                actual,
            });
        }
        if let Some(expected) = expected {
            if expected != self.color_space {
                return Err(LutError::ColorSpaceMismatch {
                    expected,
                    actual: self.color_space,
                });
            }
        }

        Ok(CubeParams {
            dimension: self.dimension(),
            data: &self.cube_data,
            color_space: self.color_space,
        })
    }
}

impl PartialEq for LutModel {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
    }
}

impl Eq for LutModel {}

impl Hash for LutModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_id.hash(state);
    }
}

fn validate_size(size: usize) -> LutResult<()> {
    if size == 0 || size > MAX_DIMENSION {
        return Err(LutError::InvalidFormat(format!(
            "cube dimension {size} outside 1..={MAX_DIMENSION}"
        )));
    }
    Ok(())
}
