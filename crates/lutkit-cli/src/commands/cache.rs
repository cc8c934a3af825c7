//! Cache command: run inputs through one bounded cache and print stats.

use crate::CacheArgs;
use anyhow::{Context, Result};
use lutkit_io::{CacheConfig, LutCache};
use tracing::{info, trace};

/// Runs the cache command.
pub fn run(args: CacheArgs, verbose: bool) -> Result<()> {
    trace!(inputs = args.input.len(), passes = args.passes, "cache::run");
    let files = super::expand_inputs(&args.input)?;

    let config = CacheConfig::default()
        .with_max_size(args.max_size)
        .with_max_count(args.max_count);
    let cache = LutCache::new(config).context("Invalid cache configuration")?;

    for pass in 0..args.passes {
        for path in &files {
            let lut = lutkit_io::load_cached(path, &cache)
                .with_context(|| format!("Failed to load: {}", path.display()))?;
            if verbose {
                println!("pass {}: {} ({}^3)", pass + 1, path.display(), lut.size());
            }
        }
        info!(pass = pass + 1, entries = cache.len(), bytes = cache.total_size(), "cache pass done");
    }

    let resident = cache.len();
    let total_size = cache.total_size();
    let stats = cache.shutdown();

    println!("Files:      {}", files.len());
    println!("Passes:     {}", args.passes);
    println!(
        "Limits:     {} / {} entries",
        super::format_size(config.max_size as u64),
        config.max_count
    );
    println!("Resident:   {} entries, {}", resident, super::format_size(total_size as u64));
    println!("Peak size:  {}", super::format_size(stats.peak_size as u64));
    println!("Hits:       {}", stats.hits);
    println!("Misses:     {}", stats.misses);
    println!("Evictions:  {}", stats.evictions);
    println!("Hit rate:   {:.1}%", stats.hit_rate());
    Ok(())
}
