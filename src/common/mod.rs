//! Common constants and types used throughout the multicore simulator.

/// Architecture constants (core count, memory geometry, bus latency).
pub mod constants;

/// Fatal error types.
pub mod error;

pub use constants::{
    ADDR_MASK, BLOCK_WORDS, CACHE_LINES, CACHE_WORDS, IMEM_SIZE, INDEX_BITS, INDEX_MASK,
    MAIN_MEM_WORDS, MEM_LATENCY, NUM_CORES, OFFSET_BITS, OFFSET_MASK, PC_MASK, REG_COUNT, TAG_MASK,
};
pub use error::SimError;
