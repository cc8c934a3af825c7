//! CLI command implementations

pub mod cache;
pub mod convert;
pub mod info;
pub mod validate;

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use lutkit_lut::LutModel;

/// Load LUT from path
pub fn load_lut(path: &Path) -> Result<LutModel> {
    lutkit_io::load(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Expands input arguments into file paths.
///
/// Existing paths are taken as-is; anything else is treated as a glob
/// pattern, which must match at least one file.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.exists() {
            files.push(path.to_path_buf());
            continue;
        }

        let matches: Vec<PathBuf> = glob::glob(input)
            .with_context(|| format!("Invalid pattern: {input}"))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            bail!("No files match: {input}");
        }
        files.extend(matches);
    }
    Ok(files)
}

/// Format byte size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(50 * 1024 * 1024), "50.00 MB");
    }

    #[test]
    fn expands_paths_and_globs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.cube", "b.cube", "c.png"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let direct = dir.path().join("c.png").to_string_lossy().into_owned();
        let pattern = dir.path().join("*.cube").to_string_lossy().into_owned();
        let files = expand_inputs(&[direct, pattern]).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("c.png"));

        let none = dir.path().join("*.3dl").to_string_lossy().into_owned();
        assert!(expand_inputs(&[none]).is_err());
    }
}
