//! Canonical LUT color spaces and name resolution.
//!
//! A LUT only ever carries one of two tags, [`ColorSpaceTag::Srgb`] or
//! [`ColorSpaceTag::DisplayP3`]. Text identifiers (`COLOR_SPACE` lines in
//! `.cube` files) and embedded image profile names are mapped onto these
//! tags here.
//!
//! # Fallback
//!
//! Resolution never fails: anything unrecognised resolves to sRGB. Callers
//! that need to tell a real sRGB declaration from a fallback use the
//! `*_detailed` variants, which report [`Resolution::defaulted`].
//!
//! ```rust
//! use lutkit_lut::colorspace::{self, ColorSpaceTag};
//!
//! assert_eq!(colorspace::resolve("displayp3"), ColorSpaceTag::DisplayP3);
//! assert_eq!(colorspace::resolve("Rec2020"), ColorSpaceTag::Srgb);
//! assert!(colorspace::resolve_detailed("Rec2020").defaulted);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::LutError;

/// Color space a LUT expects its input and output to be encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpaceTag {
    /// IEC 61966-2-1 sRGB.
    #[default]
    Srgb,
    /// Apple Display P3.
    DisplayP3,
}

impl ColorSpaceTag {
    /// All supported tags.
    pub const ALL: [ColorSpaceTag; 2] = [ColorSpaceTag::Srgb, ColorSpaceTag::DisplayP3];

    /// Canonical identifier.
    pub fn name(&self) -> &'static str {
        match self {
            ColorSpaceTag::Srgb => "sRGB",
            ColorSpaceTag::DisplayP3 => "DisplayP3",
        }
    }
}

impl fmt::Display for ColorSpaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parse: case-insensitive match against the canonical identifiers.
impl FromStr for ColorSpaceTag {
    type Err = LutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ColorSpaceTag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LutError::ColorSpaceNotSupported(s.to_string()))
    }
}

/// Outcome of a lenient color space lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved tag.
    pub tag: ColorSpaceTag,
    /// True when the input was not recognised and sRGB was substituted.
    pub defaulted: bool,
}

impl Resolution {
    fn exact(tag: ColorSpaceTag) -> Self {
        Self { tag, defaulted: false }
    }

    fn fallback() -> Self {
        Self {
            tag: ColorSpaceTag::Srgb,
            defaulted: true,
        }
    }
}

/// Resolves a textual identifier, falling back to sRGB.
pub fn resolve(identifier: &str) -> ColorSpaceTag {
    resolve_detailed(identifier).tag
}

/// Resolves a textual identifier and reports whether the fallback was used.
pub fn resolve_detailed(identifier: &str) -> Resolution {
    match identifier.parse::<ColorSpaceTag>() {
        Ok(tag) => Resolution::exact(tag),
        Err(_) => {
            debug!(identifier, "unknown color space identifier, using sRGB");
            Resolution::fallback()
        }
    }
}

/// Resolves an embedded profile name, falling back to sRGB.
///
/// Accepts ICC descriptions such as `"sRGB IEC61966-2.1"` or `"Display P3"`
/// as well as platform constant names like `kCGColorSpaceDisplayP3`.
pub fn resolve_profile(name: &str) -> ColorSpaceTag {
    resolve_profile_detailed(name).tag
}

/// Profile-name variant of [`resolve_detailed`].
///
/// Names are compared whole after normalisation, so variants such as
/// `kCGColorSpaceDisplayP3_PQ` or `"Display P3 Linear"` fall back to sRGB.
pub fn resolve_profile_detailed(name: &str) -> Resolution {
    let key = normalize_profile_name(name);
    let key = key.strip_prefix("kcgcolorspace").unwrap_or(&key);

    match key {
        "srgb" | "srgbiec6196621" => Resolution::exact(ColorSpaceTag::Srgb),
        "displayp3" => Resolution::exact(ColorSpaceTag::DisplayP3),
        _ => {
            debug!(profile = name, "unrecognised color profile, using sRGB");
            Resolution::fallback()
        }
    }
}

/// Lowercases and drops everything that is not an ASCII letter or digit.
fn normalize_profile_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_is_case_insensitive() {
        assert_eq!("sRGB".parse::<ColorSpaceTag>().unwrap(), ColorSpaceTag::Srgb);
        assert_eq!("SRGB".parse::<ColorSpaceTag>().unwrap(), ColorSpaceTag::Srgb);
        assert_eq!(
            "displayP3".parse::<ColorSpaceTag>().unwrap(),
            ColorSpaceTag::DisplayP3
        );
        assert!(matches!(
            "AdobeRGB".parse::<ColorSpaceTag>(),
            Err(LutError::ColorSpaceNotSupported(name)) if name == "AdobeRGB"
        ));
    }

    #[test]
    fn lenient_resolution_falls_back() {
        assert_eq!(resolve("DISPLAYP3"), ColorSpaceTag::DisplayP3);
        assert_eq!(resolve(""), ColorSpaceTag::Srgb);

        let known = resolve_detailed("srgb");
        assert_eq!(known.tag, ColorSpaceTag::Srgb);
        assert!(!known.defaulted);

        let unknown = resolve_detailed("ACEScg");
        assert_eq!(unknown.tag, ColorSpaceTag::Srgb);
        assert!(unknown.defaulted);
    }

    #[test]
    fn profile_names() {
        assert_eq!(resolve_profile("sRGB IEC61966-2.1"), ColorSpaceTag::Srgb);
        assert_eq!(resolve_profile("Display P3"), ColorSpaceTag::DisplayP3);
        assert_eq!(resolve_profile("kCGColorSpaceDisplayP3"), ColorSpaceTag::DisplayP3);
        assert_eq!(resolve_profile("kCGColorSpaceSRGB"), ColorSpaceTag::Srgb);
        assert!(resolve_profile_detailed("DCI-P3").defaulted);
        assert!(!resolve_profile_detailed("display_p3").defaulted);
        assert!(resolve_profile_detailed("kCGColorSpaceDisplayP3_PQ").defaulted);
        assert!(resolve_profile_detailed("Display P3 Linear").defaulted);
        assert!(resolve_profile_detailed("sRGB Linear").defaulted);
    }

    #[test]
    fn display_matches_identifier() {
        assert_eq!(ColorSpaceTag::Srgb.to_string(), "sRGB");
        assert_eq!(ColorSpaceTag::DisplayP3.to_string(), "DisplayP3");
        assert_eq!(ColorSpaceTag::default(), ColorSpaceTag::Srgb);
    }
}
