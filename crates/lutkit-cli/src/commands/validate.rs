//! Validate command: load every input and report failures.

use crate::ValidateArgs;
use anyhow::{Result, bail};
use tracing::{debug, trace};

/// Runs the validate command. Fails if any input does not load.
pub fn run(args: ValidateArgs, verbose: bool) -> Result<()> {
    trace!(inputs = args.input.len(), "validate::run");
    let files = super::expand_inputs(&args.input)?;

    let mut failed = 0usize;
    for (path, result) in lutkit_io::load_all(&files) {
        match result {
            Ok(lut) => {
                if verbose {
                    println!("OK    {} ({}^3, {})", path.display(), lut.size(), lut.color_space());
                } else {
                    println!("OK    {}", path.display());
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = ?e, "validation failed");
                println!("FAIL  {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{} file(s), {} failed", files.len(), failed);
    if failed > 0 {
        bail!("{failed} of {} file(s) failed validation", files.len());
    }
    Ok(())
}
