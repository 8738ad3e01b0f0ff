//! End-of-run output files.
//!
//! All dumps are plain text, one uppercase 8-digit hex word per line.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::common::constants::{CACHE_LINES, REG_COUNT};
use crate::common::SimError;
use crate::core::cache::Cache;
use crate::stats::CoreStats;

fn create(path: &str) -> Result<BufWriter<File>, SimError> {
    Ok(BufWriter::new(
        File::create(path).map_err(|e| SimError::output(path, e))?,
    ))
}

fn finish(mut w: BufWriter<File>, path: &str) -> Result<(), SimError> {
    w.flush().map_err(|e| SimError::output(path, e))
}

/// Writes the memory image trimmed of trailing zero words; an all-zero
/// memory produces an empty file.
pub fn write_trimmed_mem(path: &str, words: &[u32]) -> Result<(), SimError> {
    let len = words
        .iter()
        .rposition(|&w| w != 0)
        .map_or(0, |last| last + 1);
    let mut w = create(path)?;
    for word in &words[..len] {
        writeln!(w, "{word:08X}").map_err(|e| SimError::output(path, e))?;
    }
    finish(w, path)
}

/// Writes every word of a buffer (cache data dumps).
pub fn write_full_mem(path: &str, words: &[u32]) -> Result<(), SimError> {
    let mut w = create(path)?;
    for word in words {
        writeln!(w, "{word:08X}").map_err(|e| SimError::output(path, e))?;
    }
    finish(w, path)
}

/// Writes registers R2..R15, one per line.
pub fn write_regout(path: &str, regs: &[u32; REG_COUNT]) -> Result<(), SimError> {
    let mut w = create(path)?;
    for reg in &regs[2..] {
        writeln!(w, "{reg:08X}").map_err(|e| SimError::output(path, e))?;
    }
    finish(w, path)
}

/// Writes the 64 tag-SRAM words: MESI state in bits 13:12, tag in 11:0.
pub fn write_tsram(path: &str, cache: &Cache) -> Result<(), SimError> {
    let mut w = create(path)?;
    for index in 0..CACHE_LINES {
        writeln!(w, "{:08X}", cache.tsram_word(index)).map_err(|e| SimError::output(path, e))?;
    }
    finish(w, path)
}

/// Writes the per-core statistics counters.
pub fn write_stats(path: &str, stats: &CoreStats) -> Result<(), SimError> {
    let mut w = create(path)?;
    stats.write(&mut w).map_err(|e| SimError::output(path, e))?;
    finish(w, path)
}
