//! LUT info command.
//!
//! Loads each input and prints title, cube size, color space, input range
//! and payload size, as text or JSON.

use crate::InfoArgs;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::trace;

use lutkit_lut::{LutFormat, LutModel};

/// One LUT as reported by `info`.
#[derive(Debug, Serialize)]
struct LutInfo {
    file: String,
    format: &'static str,
    title: String,
    dimension: usize,
    entries: usize,
    color_space: String,
    range: Option<[f32; 2]>,
    payload_bytes: usize,
    description_lines: usize,
    file_size: u64,
}

impl LutInfo {
    fn new(path: &Path, lut: &LutModel) -> Self {
        Self {
            file: path.display().to_string(),
            format: LutFormat::from_extension(path).map_or("unknown", |f| f.name()),
            title: lut.title().to_string(),
            dimension: lut.size(),
            entries: lut.entry_count(),
            color_space: lut.color_space().to_string(),
            range: lut.range().map(|r| [r.lo(), r.hi()]),
            payload_bytes: lut.data_size(),
            description_lines: lut.description().lines().count(),
            file_size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        }
    }
}

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    trace!(inputs = args.input.len(), json = args.json, "info::run");
    let files = super::expand_inputs(&args.input)?;

    let mut infos = Vec::with_capacity(files.len());
    for (path, result) in lutkit_io::load_all(&files) {
        let lut = result.with_context(|| format!("Failed to load: {}", path.display()))?;
        infos.push((LutInfo::new(&path, &lut), lut));
    }

    if args.json {
        let list: Vec<&LutInfo> = infos.iter().map(|(info, _)| info).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for (idx, (info, lut)) in infos.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print_text(info, lut, verbose);
    }
    Ok(())
}

/// Prints info in human-readable text format.
fn print_text(info: &LutInfo, lut: &LutModel, verbose: bool) {
    println!("{}", info.file);
    println!("  Title:       {}", info.title);
    println!("  Format:      {}", info.format);
    println!("  Dimension:   {0}x{0}x{0} ({1} entries)", info.dimension, info.entries);
    println!("  Color space: {}", info.color_space);
    match info.range {
        Some([lo, hi]) => println!("  Range:       [{lo}, {hi}]"),
        None => println!("  Range:       default"),
    }
    println!("  Payload:     {}", super::format_size(info.payload_bytes as u64));
    println!("  File size:   {}", super::format_size(info.file_size));

    if verbose && !lut.description().is_empty() {
        println!("  Description:");
        for line in lut.description().lines() {
            println!("    {line}");
        }
    } else {
        println!("  Description: {} line(s)", info.description_lines);
    }
}
