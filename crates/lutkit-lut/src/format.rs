//! LUT source classification.
//!
//! Sources are classified by file extension only; the extension match is
//! case-insensitive.

use std::path::Path;

use crate::{LutError, LutResult};

/// Supported LUT encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutFormat {
    /// Text `.cube` file.
    Cube,
    /// Palette-style PNG image.
    Palette,
}

impl LutFormat {
    /// Detects the format from a file extension.
    ///
    /// A `?query` or `#fragment` on a URL source is ignored.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let source = path.as_ref().to_string_lossy();
        let ext = Path::new(strip_url_suffix(&source))
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("cube") => Some(LutFormat::Cube),
            Some("png") => Some(LutFormat::Palette),
            _ => None,
        }
    }

    /// Like [`from_extension`](Self::from_extension) but fails with
    /// [`LutError::FileNotSupported`] naming the file.
    pub fn classify<P: AsRef<Path>>(path: P) -> LutResult<Self> {
        let path = path.as_ref();
        Self::from_extension(path).ok_or_else(|| {
            let source = path.to_string_lossy();
            let name = match file_name(&source) {
                "" => source.as_ref(),
                name => name,
            };
            LutError::FileNotSupported(name.to_string())
        })
    }

    /// File extensions handled by this format, without dots.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LutFormat::Cube => &["cube"],
            LutFormat::Palette => &["png"],
        }
    }

    /// Human-readable format name.
    pub fn name(&self) -> &'static str {
        match self {
            LutFormat::Cube => "Cube",
            LutFormat::Palette => "Palette PNG",
        }
    }
}

/// Last path component of a path or URL string, without any URL query or
/// fragment.
pub fn file_name(source_id: &str) -> &str {
    let path = strip_url_suffix(source_id);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Cuts the `?query` and `#fragment` off URL-shaped sources. Plain paths are
/// returned unchanged since `?` and `#` are legal in file names.
fn strip_url_suffix(source: &str) -> &str {
    if !source.contains("://") {
        return source;
    }
    source.split(['?', '#']).next().unwrap_or(source)
}

/// Turns a file name into a display title.
///
/// Drops everything from the first `.`, turns `_` and `-` into spaces and
/// capitalises each word: `fuji_eterna_250d.png` becomes `Fuji Eterna 250D`.
pub fn prettify_file_name(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    stem.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first letter of a word and lowercases the remaining ones.
fn capitalize_word(word: &str) -> String {
    let mut seen_letter = false;
    word.chars()
        .flat_map(|c| {
            let upper = c.is_alphabetic() && !seen_letter;
            if c.is_alphabetic() {
                seen_letter = true;
            }
            if upper {
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                c.to_lowercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_detection() {
        assert_eq!(LutFormat::from_extension("Kodachrome 25.cube"), Some(LutFormat::Cube));
        assert_eq!(LutFormat::from_extension("look.CUBE"), Some(LutFormat::Cube));
        assert_eq!(LutFormat::from_extension("/luts/teal.png"), Some(LutFormat::Palette));
        assert_eq!(LutFormat::from_extension("teal.PNG"), Some(LutFormat::Palette));
        assert_eq!(LutFormat::from_extension("grade.3dl"), None);
        assert_eq!(LutFormat::from_extension("noext"), None);
    }

    #[test]
    fn classify_names_the_file() {
        let err = LutFormat::classify("/tmp/grade.3dl").unwrap_err();
        assert!(matches!(err, LutError::FileNotSupported(name) if name == "grade.3dl"));
    }

    #[test]
    fn prettify() {
        assert_eq!(
            prettify_file_name("fuji_eterna_250d_fuji_3510.png"),
            "Fuji Eterna 250D Fuji 3510"
        );
        assert_eq!(
            prettify_file_name("teal_orange_plus_contrast.png"),
            "Teal Orange Plus Contrast"
        );
        assert_eq!(prettify_file_name("ARRI-look.v2.png"), "Arri Look");
        assert_eq!(prettify_file_name("Kodachrome 25.cube"), "Kodachrome 25");
        assert_eq!(prettify_file_name("a__b"), "A B");
    }

    #[test]
    fn file_name_of_paths_and_urls() {
        assert_eq!(file_name("/a/b/c.png"), "c.png");
        assert_eq!(file_name("https://host/luts/x.cube"), "x.cube");
        assert_eq!(file_name(r"C:\luts\y.png"), "y.png");
        assert_eq!(file_name("plain.png"), "plain.png");
        assert_eq!(file_name("https://host/luts/x.cube?dl=1"), "x.cube");
        assert_eq!(file_name("https://host/p.png#frag"), "p.png");
        assert_eq!(file_name("/local/odd#name.png"), "odd#name.png");
    }

    #[test]
    fn url_query_ignored_for_extension() {
        assert_eq!(
            LutFormat::classify("https://host/luts/x.cube?dl=1").unwrap(),
            LutFormat::Cube
        );
        assert_eq!(
            LutFormat::from_extension("https://host/a/teal.PNG#preview"),
            Some(LutFormat::Palette)
        );
        assert_eq!(LutFormat::from_extension("/local/grade.cube?v2"), None);
        let err = LutFormat::classify("https://host/grade.3dl?dl=1").unwrap_err();
        assert!(matches!(err, LutError::FileNotSupported(name) if name == "grade.3dl"));
    }
}
