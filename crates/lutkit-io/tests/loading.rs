//! Integration tests for LUT loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use approx::assert_relative_eq;
use lutkit_io::{CacheConfig, IoError, LutCache, load, load_all, load_cached, png as lut_png};
use lutkit_lut::{ColorSpaceTag, LutError, LutModel};
use tempfile::TempDir;

const CUBE_2: &str = "\
# Created by test
TITLE \"Warm Fade\"
LUT_3D_SIZE 2
LUT_3D_INPUT_RANGE 0.0 1.0
COLOR_SPACE DisplayP3

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
";

fn write_file(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Encodes a raw 8-bit RGB buffer as PNG.
fn write_rgb_png(path: &Path, width: u32, height: u32, pixels: &[u8]) {
    let file = fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(pixels).unwrap();
    writer.finish().unwrap();
}

#[test]
fn load_cube_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "warm_fade.cube", CUBE_2);

    let lut = load(&path).unwrap();
    assert_eq!(lut.id(), path.to_string_lossy());
    assert_eq!(lut.title(), "Warm Fade");
    assert_eq!(lut.description(), "# Created by test\n\n");
    assert_eq!(lut.size(), 2);
    assert_eq!(lut.color_space(), ColorSpaceTag::DisplayP3);
    assert_eq!(&lut.cube_data()[..8], &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);

    let params = lut.cube_params(None).unwrap();
    assert_relative_eq!(params.dimension, 2.0);
    assert_eq!(params.data.len(), 32);

    assert!(matches!(
        lut.cube_params(Some(ColorSpaceTag::Srgb)),
        Err(LutError::ColorSpaceMismatch {
            expected: ColorSpaceTag::Srgb,
            actual: ColorSpaceTag::DisplayP3
        })
    ));
}

#[test]
fn load_palette_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("teal_orange_plus_contrast.png");
    let source = LutModel::identity("identity", 16, ColorSpaceTag::Srgb).unwrap();
    lut_png::write_palette(&path, &source).unwrap();

    let lut = load(&path).unwrap();
    assert_eq!(lut.title(), "Teal Orange Plus Contrast");
    assert_eq!(lut.description(), "Generated from PNG image");
    assert_eq!(lut.size(), 16);
    assert_eq!(lut.range(), None);
    assert_eq!(lut.color_space(), ColorSpaceTag::Srgb);

    let entry = lut.rgba_at(15, 0, 9).unwrap();
    assert_relative_eq!(entry[0], 1.0);
    assert_relative_eq!(entry[1], 0.0);
    assert_relative_eq!(entry[2], 0.6, epsilon = 1.0 / 255.0);
    assert_relative_eq!(entry[3], 1.0);
}

#[test]
fn wide_palette_is_32_cube() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wide.png");
    write_rgb_png(&path, 512, 64, &vec![128u8; 512 * 64 * 3]);

    let lut = load(&path).unwrap();
    assert_eq!(lut.size(), 32);
    assert_eq!(lut.cube_data().len(), 32 * 32 * 32 * 4);
}

#[test]
fn non_cube_palette_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("square.png");
    write_rgb_png(&path, 100, 100, &vec![0u8; 100 * 100 * 3]);

    let err = load(&path).unwrap_err();
    assert!(matches!(err, IoError::Lut(LutError::InvalidFormat(_))));
}

#[test]
fn unsupported_and_missing_files() {
    let err = load("/tmp/grade.3dl").unwrap_err();
    assert!(matches!(err, IoError::Lut(LutError::FileNotSupported(ref n)) if n == "grade.3dl"));

    let dir = TempDir::new().unwrap();
    for name in ["gone.cube", "gone.png"] {
        let err = load(dir.path().join(name)).unwrap_err();
        assert!(
            matches!(err, IoError::Lut(LutError::FileNotFound(_))),
            "{name}: {err}"
        );
    }
}

#[test]
fn cube_errors_surface_through_io() {
    let dir = TempDir::new().unwrap();
    let short = CUBE_2.lines().take(9).collect::<Vec<_>>().join("\n");
    let path = write_file(&dir, "short.cube", short);

    let err = load(&path).unwrap_err();
    assert!(matches!(
        err.as_lut_error(),
        Some(LutError::InvalidDataSize { expected: 8, actual: 3 })
    ));
}

#[test]
fn cached_loads_share_model() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "warm.cube", CUBE_2);
    let cache = LutCache::new(CacheConfig::default()).unwrap();

    let first = load_cached(&path, &cache).unwrap();
    // Later edits are not seen while the entry is cached.
    fs::write(&path, "garbage").unwrap();
    let second = load_cached(&path, &cache).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cached_load_errors_are_not_cached() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.cube", "TITLE \"no size\"\n0 0 0\n");
    let cache = LutCache::new(CacheConfig::default()).unwrap();

    assert!(load_cached(&path, &cache).is_err());
    assert!(cache.is_empty());
}

#[test]
fn batch_load_keeps_order() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "a.cube", CUBE_2);
    let bad = write_file(&dir, "b.cube", "LUT_3D_SIZE 2\n");
    let unsupported = write_file(&dir, "c.txt", "");
    let paths = vec![good.clone(), bad.clone(), unsupported.clone(), good.clone()];

    let results = load_all(&paths);
    assert_eq!(results.len(), 4);
    for ((path, _), expected) in results.iter().zip(&paths) {
        assert_eq!(path, expected);
    }
    assert!(results[0].1.is_ok());
    assert!(matches!(
        results[1].1,
        Err(IoError::Lut(LutError::InvalidDataSize { expected: 8, actual: 0 }))
    ));
    assert!(matches!(
        results[2].1,
        Err(IoError::Lut(LutError::FileNotSupported(_)))
    ));
    assert!(results[3].1.is_ok());
}
