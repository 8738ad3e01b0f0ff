//! Tests for the snooping bus: arbitration, snoop transitions, timing,
//! and transaction completion.

use multicore_sim::core::cache::{cache_index, cache_tag, MesiState};
use multicore_sim::core::Core;
use multicore_sim::soc::bus::{Bus, BusCommand, BusRequest};
use multicore_sim::soc::memory::MainMemory;

fn make_cores() -> [Core; 4] {
    [
        Core::new(0, Vec::new()),
        Core::new(1, Vec::new()),
        Core::new(2, Vec::new()),
        Core::new(3, Vec::new()),
    ]
}

/// Runs one bus cycle in the scheduler's order: clear, arbitrate, drive,
/// advance.
fn bus_cycle(
    bus: &mut Bus,
    requests: &mut [BusRequest; 4],
    cores: &mut [Core; 4],
    mem: &mut MainMemory,
) {
    bus.clear_output();
    bus.arbitrate(requests, cores, mem);
    bus.drive_output();
    bus.advance(cores, mem);
}

fn read_request(origin: usize, addr: u32) -> BusRequest {
    BusRequest {
        active: true,
        cmd: BusCommand::Rd,
        addr,
        origin,
    }
}

/// Installs a line directly in a core's cache.
fn install(core: &mut Core, addr: u32, state: MesiState, fill: u32) {
    let idx = cache_index(addr);
    core.cache.tag[idx] = cache_tag(addr) as u16;
    core.cache.state[idx] = state;
    for i in 0..8 {
        core.cache.data[idx * 8 + i] = fill + i as u32;
    }
}

/// Tests that simultaneous requesters win in round-robin order 0,1,2,3.
#[test]
fn test_round_robin_grant_order() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];
    for (i, slot) in requests.iter_mut().enumerate() {
        *slot = read_request(i, (i * 8) as u32);
    }

    let mut winners = Vec::new();
    for _ in 0..200 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
        if bus.output.cmd == BusCommand::Rd {
            winners.push(bus.output.origid);
        }
    }
    assert_eq!(winners, vec![0, 1, 2, 3]);
    assert!(bus.idle());
}

/// Tests the memory-sourced fill timing: the announcement cycle, 16 silent
/// wait cycles, then 8 flush words, then idle.
#[test]
fn test_memory_fill_timing() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    for i in 0..8 {
        mem.write(i, 0xA0 + i);
    }
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];
    requests[0] = read_request(0, 3);

    cores[0].mem.valid = true;
    cores[0].mem.waiting = true;

    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert_eq!(bus.output.cmd, BusCommand::Rd);
    assert_eq!(bus.output.origid, 0);
    assert!(!bus.output.shared);

    for _ in 1..=15 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
        assert_eq!(bus.output.cmd, BusCommand::None);
    }

    for i in 0..8u32 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
        assert_eq!(bus.output.cmd, BusCommand::Flush);
        assert_eq!(bus.output.origid, 4); // memory
        assert_eq!(bus.output.addr, i);
        assert_eq!(bus.output.data, 0xA0 + i);
    }

    assert!(bus.idle());
    assert_eq!(cores[0].cache.lookup(3), Some(MesiState::Exclusive));
    assert_eq!(cores[0].cache.read(5), 0xA5);
    assert!(!cores[0].mem.waiting);
}

/// Tests a cache-to-cache transfer: a Modified peer provides the block,
/// downgrades to Shared, streams with no memory wait, and memory is
/// refreshed on completion.
#[test]
fn test_modified_peer_provides_and_downgrades() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];

    install(&mut cores[1], 0x40, MesiState::Modified, 500);
    requests[0] = read_request(0, 0x45);

    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert_eq!(bus.output.cmd, BusCommand::Rd);
    assert!(bus.output.shared);
    assert_eq!(cores[1].cache.state[cache_index(0x40)], MesiState::Shared);

    // Zero-latency source: flushing starts on the very next cycle.
    for i in 0..8u32 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
        assert_eq!(bus.output.cmd, BusCommand::Flush);
        assert_eq!(bus.output.origid, 1);
        assert_eq!(bus.output.addr, 0x40 + i);
        assert_eq!(bus.output.data, 500 + i);
    }

    assert!(bus.idle());
    assert_eq!(cores[0].cache.lookup(0x45), Some(MesiState::Shared));
    assert_eq!(cores[0].cache.read(0x45), 505);
    for i in 0..8 {
        assert_eq!(mem.read(0x40 + i), 500 + i);
    }
}

/// Tests that an Exclusive peer downgrades to Shared on BusRd but memory
/// supplies the data (with the full wait).
#[test]
fn test_exclusive_peer_downgrades_without_providing() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    mem.write(0x40, 77);
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];

    install(&mut cores[2], 0x40, MesiState::Exclusive, 300);
    requests[0] = read_request(0, 0x40);

    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert!(bus.output.shared);
    assert_eq!(cores[2].cache.state[cache_index(0x40)], MesiState::Shared);

    // Silent for the memory latency, then flush from memory.
    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert_eq!(bus.output.cmd, BusCommand::None);
    for _ in 0..40 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    }
    assert!(bus.idle());
    // Requester saw shared copies, so it lands in Shared with memory data.
    assert_eq!(cores[0].cache.lookup(0x40), Some(MesiState::Shared));
    assert_eq!(cores[0].cache.read(0x40), 77);
}

/// Tests BusRdX: every holder is invalidated and the requester lands in
/// Modified.
#[test]
fn test_rdx_invalidates_peers() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];

    install(&mut cores[1], 0x80, MesiState::Shared, 10);
    install(&mut cores[2], 0x80, MesiState::Shared, 10);
    install(&mut cores[3], 0x80, MesiState::Shared, 10);
    requests[0] = BusRequest {
        active: true,
        cmd: BusCommand::RdX,
        addr: 0x80,
        origin: 0,
    };

    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert_eq!(bus.output.cmd, BusCommand::RdX);
    assert!(bus.output.shared);
    for core in &cores[1..] {
        assert_eq!(core.cache.state[cache_index(0x80)], MesiState::Invalid);
    }

    for _ in 0..40 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    }
    assert!(bus.idle());
    assert_eq!(cores[0].cache.lookup(0x80), Some(MesiState::Modified));
}

/// Tests that a Modified holder hit by BusRdX hands over the block and
/// invalidates itself.
#[test]
fn test_rdx_from_modified_holder() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];

    install(&mut cores[3], 0x100, MesiState::Modified, 40);
    requests[1] = BusRequest {
        active: true,
        cmd: BusCommand::RdX,
        addr: 0x100,
        origin: 1,
    };

    bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    assert_eq!(cores[3].cache.state[cache_index(0x100)], MesiState::Invalid);

    for _ in 0..12 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    }
    assert!(bus.idle());
    assert_eq!(cores[1].cache.lookup(0x100), Some(MesiState::Modified));
    assert_eq!(cores[1].cache.read(0x100), 40);
    assert_eq!(mem.read(0x107), 47);
}

/// Tests that filling over a resident dirty line writes the old block
/// back first.
#[test]
fn test_completion_evicts_dirty_line() {
    let mut cores = make_cores();
    let mut mem = MainMemory::new();
    let mut bus = Bus::new();
    let mut requests = [BusRequest::default(); 4];

    let old_addr = 0x40;
    let new_addr = old_addr + (1 << 9); // same index, different tag
    install(&mut cores[0], old_addr, MesiState::Modified, 7000);
    mem.write(new_addr, 123);
    requests[0] = read_request(0, new_addr);

    for _ in 0..30 {
        bus_cycle(&mut bus, &mut requests, &mut cores, &mut mem);
    }
    assert!(bus.idle());
    for i in 0..8 {
        assert_eq!(mem.read(old_addr + i), 7000 + i);
    }
    assert_eq!(cores[0].cache.lookup(new_addr), Some(MesiState::Exclusive));
    assert_eq!(cores[0].cache.read(new_addr), 123);
}
