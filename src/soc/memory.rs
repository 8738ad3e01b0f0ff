//! Single-port main memory.
//!
//! A flat array of 2^20 32-bit words, reachable only through the bus: the
//! bus reads whole blocks when it sources a fill from memory, and writes
//! whole blocks back on every transaction completion and dirty eviction.
//! Word addresses wrap at the memory size.

use crate::common::constants::{ADDR_MASK, BLOCK_WORDS, MAIN_MEM_WORDS};

/// Flat word-addressed main memory.
pub struct MainMemory {
    words: Vec<u32>,
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMemory {
    /// Allocates a zeroed memory.
    pub fn new() -> Self {
        Self {
            words: vec![0; MAIN_MEM_WORDS],
        }
    }

    /// Builds a memory from an initial image, zero-padding the tail.
    pub fn from_image(mut image: Vec<u32>) -> Self {
        image.resize(MAIN_MEM_WORDS, 0);
        Self { words: image }
    }

    /// Reads the word at `addr` (wrapped to the memory size).
    pub fn read(&self, addr: u32) -> u32 {
        self.words[(addr & ADDR_MASK) as usize]
    }

    /// Writes the word at `addr` (wrapped to the memory size).
    pub fn write(&mut self, addr: u32, val: u32) {
        self.words[(addr & ADDR_MASK) as usize] = val;
    }

    /// Reads the block starting at `base` (block-aligned by the caller).
    pub fn read_block(&self, base: u32) -> [u32; BLOCK_WORDS] {
        let mut block = [0; BLOCK_WORDS];
        for (i, word) in block.iter_mut().enumerate() {
            *word = self.read(base.wrapping_add(i as u32));
        }
        block
    }

    /// Writes a whole block starting at `base`.
    pub fn write_block(&mut self, base: u32, block: &[u32; BLOCK_WORDS]) {
        for (i, word) in block.iter().enumerate() {
            self.write(base.wrapping_add(i as u32), *word);
        }
    }

    /// Full contents, for the memory-image writer.
    pub fn words(&self) -> &[u32] {
        &self.words
    }
}
