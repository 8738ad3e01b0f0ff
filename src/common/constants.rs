//! Architecture constants shared across the simulator.

/// Number of cores sharing the bus.
pub const NUM_CORES: usize = 4;

/// Architectural registers per core.
pub const REG_COUNT: usize = 16;

/// Instruction memory size in words; PCs wrap at this boundary.
pub const IMEM_SIZE: usize = 1024;

/// Main memory size in words; data addresses wrap at this boundary.
pub const MAIN_MEM_WORDS: usize = 1 << 20;

/// Mask for a 20-bit word address.
pub const ADDR_MASK: u32 = MAIN_MEM_WORDS as u32 - 1;

/// Mask for a 10-bit program counter.
pub const PC_MASK: u32 = IMEM_SIZE as u32 - 1;

/// Total cache data words per core.
pub const CACHE_WORDS: usize = 512;

/// Number of direct-mapped cache lines per core.
pub const CACHE_LINES: usize = 64;

/// Words per cache block (and per bus transaction).
pub const BLOCK_WORDS: usize = 8;

/// Bits of the word address selecting the word within a block.
pub const OFFSET_BITS: u32 = 3;

/// Bits of the word address selecting the cache line.
pub const INDEX_BITS: u32 = 6;

/// Mask for the block-offset field.
pub const OFFSET_MASK: u32 = (1 << OFFSET_BITS) - 1;

/// Mask for the line-index field.
pub const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Mask for the 12-bit tag field stored in the tag SRAM.
pub const TAG_MASK: u32 = (1 << (20 - OFFSET_BITS - INDEX_BITS)) - 1;

/// Cycles the bus waits before streaming a block sourced from main memory.
pub const MEM_LATENCY: u32 = 16;
