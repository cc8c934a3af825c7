//! Convert command: rewrite a LUT as `.cube` text or a palette PNG.

use crate::ConvertArgs;
use anyhow::{Context, Result};
use lutkit_lut::{LutFormat, cube};
use tracing::trace;

/// Runs the convert command. The output format follows the output extension.
pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "convert::run");
    let output_format = LutFormat::classify(&args.output)
        .with_context(|| format!("Unsupported output: {}", args.output.display()))?;

    let lut = super::load_lut(&args.input)?;

    let written = match output_format {
        LutFormat::Cube => cube::write(&args.output, &lut).map_err(anyhow::Error::from),
        LutFormat::Palette => {
            lutkit_io::png::write_palette(&args.output, &lut).map_err(anyhow::Error::from)
        }
    };
    written.with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose {
        println!(
            "Converted {} -> {} ({}^3, {})",
            args.input.display(),
            args.output.display(),
            lut.size(),
            lut.color_space()
        );
    }
    Ok(())
}
