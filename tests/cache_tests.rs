//! Tests for the direct-mapped MESI cache storage.

use multicore_sim::core::cache::{cache_index, cache_tag, line_base_addr, Cache, MesiState};
use multicore_sim::soc::memory::MainMemory;

/// Installs a line directly, bypassing the bus.
fn install(cache: &mut Cache, addr: u32, state: MesiState, fill: u32) {
    let idx = cache_index(addr);
    cache.tag[idx] = cache_tag(addr) as u16;
    cache.state[idx] = state;
    for i in 0..8 {
        cache.data[idx * 8 + i] = fill + i as u32;
    }
}

/// Tests the word-address decomposition: offset 2:0, index 8:3, tag above.
#[test]
fn test_address_decomposition() {
    let addr = (0x5AB << 9) | (5 << 3) | 3;
    assert_eq!(cache_index(addr), 5);
    assert_eq!(cache_tag(addr), 0x5AB);
    assert_eq!(line_base_addr(0x5AB, 5), addr & !7);
    assert_eq!(cache_index(0), 0);
    assert_eq!(cache_tag(0), 0);
}

/// Tests that lookup misses on an empty cache and on a tag mismatch.
#[test]
fn test_lookup_miss() {
    let mut cache = Cache::default();
    assert_eq!(cache.lookup(0x100), None);

    install(&mut cache, 0x100, MesiState::Shared, 7);
    // Same index, different tag.
    let conflicting = 0x100 + (1 << 9);
    assert_eq!(cache.lookup(conflicting), None);
}

/// Tests that lookup reports the line state on a hit.
#[test]
fn test_lookup_hit_returns_state() {
    let mut cache = Cache::default();
    install(&mut cache, 0x40, MesiState::Exclusive, 10);
    assert_eq!(cache.lookup(0x40), Some(MesiState::Exclusive));
    assert_eq!(cache.lookup(0x47), Some(MesiState::Exclusive));
}

/// Tests word read/write against block offsets.
#[test]
fn test_read_write_offsets() {
    let mut cache = Cache::default();
    install(&mut cache, 0x40, MesiState::Modified, 100);
    assert_eq!(cache.read(0x40), 100);
    assert_eq!(cache.read(0x43), 103);

    cache.write(0x43, 0xCAFE);
    assert_eq!(cache.read(0x43), 0xCAFE);
    assert_eq!(cache.read(0x42), 102);
}

/// Tests that only Modified lines are written back.
#[test]
fn test_writeback_only_dirty_lines() {
    let mut mem = MainMemory::new();
    let mut cache = Cache::default();

    install(&mut cache, 0x40, MesiState::Shared, 50);
    cache.writeback_line(cache_index(0x40), &mut mem);
    assert_eq!(mem.read(0x40), 0);

    install(&mut cache, 0x40, MesiState::Modified, 50);
    cache.writeback_line(cache_index(0x40), &mut mem);
    for i in 0..8 {
        assert_eq!(mem.read(0x40 + i), 50 + i);
    }
}

/// Tests fill with eviction: the dirty resident block reaches memory
/// before the new block is installed.
#[test]
fn test_fill_evicts_dirty_line() {
    let mut mem = MainMemory::new();
    let mut cache = Cache::default();

    let old_addr = 0x40;
    install(&mut cache, old_addr, MesiState::Modified, 900);

    let new_addr = old_addr + (1 << 9); // same index, next tag
    let block = [1, 2, 3, 4, 5, 6, 7, 8];
    cache.fill_line(
        cache_index(new_addr),
        cache_tag(new_addr),
        &block,
        MesiState::Exclusive,
        &mut mem,
    );

    // Old block written back.
    for i in 0..8 {
        assert_eq!(mem.read(old_addr + i), 900 + i);
    }
    // New block resident.
    assert_eq!(cache.lookup(old_addr), None);
    assert_eq!(cache.lookup(new_addr), Some(MesiState::Exclusive));
    assert_eq!(cache.read(new_addr), 1);
    assert_eq!(cache.read(new_addr + 7), 8);
}

/// Tests the tag-SRAM word encoding: state in bits 13:12, tag in 11:0.
#[test]
fn test_tsram_encoding() {
    let mut cache = Cache::default();
    assert_eq!(cache.tsram_word(0), 0);

    install(&mut cache, 0x40, MesiState::Exclusive, 0);
    assert_eq!(cache.tsram_word(cache_index(0x40)), 0x2000);

    let tagged = (0x123 << 9) | (7 << 3);
    install(&mut cache, tagged, MesiState::Modified, 0);
    assert_eq!(cache.tsram_word(7), 0x3123);
}
