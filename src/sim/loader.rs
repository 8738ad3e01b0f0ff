//! Input image loading.
//!
//! Instruction memories and the initial main-memory image arrive as plain
//! text, one hexadecimal word per line. Parsing follows C `sscanf("%x")`:
//! leading whitespace is skipped, an optional `0x`/`0X` prefix is
//! accepted, the conversion stops at the first non-hex character, and a
//! line with nothing convertible yields 0. Missing trailing words are 0.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::common::constants::{IMEM_SIZE, MAIN_MEM_WORDS};
use crate::common::SimError;
use crate::soc::memory::MainMemory;

/// Parses one line the way `sscanf("%x")` would.
pub fn parse_hex_word(line: &str) -> u32 {
    let s = line.trim_start();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let end = s
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(s.len());
    u32::from_str_radix(&s[..end], 16).unwrap_or(0)
}

fn load_words(path: &str, limit: usize) -> Result<Vec<u32>, SimError> {
    let file = File::open(path).map_err(|e| SimError::input(path, e))?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        if words.len() >= limit {
            break;
        }
        let line = line.map_err(|e| SimError::input(path, e))?;
        words.push(parse_hex_word(&line));
    }
    Ok(words)
}

/// Loads an instruction memory image (up to 1024 words, zero-padded).
pub fn load_imem(path: &str) -> Result<Vec<u32>, SimError> {
    let mut words = load_words(path, IMEM_SIZE)?;
    words.resize(IMEM_SIZE, 0);
    Ok(words)
}

/// Loads the initial main-memory image.
pub fn load_main_mem(path: &str) -> Result<MainMemory, SimError> {
    Ok(MainMemory::from_image(load_words(path, MAIN_MEM_WORDS)?))
}
