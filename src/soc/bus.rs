//! Shared snooping bus with round-robin arbitration.
//!
//! The bus carries at most one transaction at a time. A transaction starts
//! when the arbiter grants a core's request slot: all peer caches are
//! snooped immediately (transitioning their MESI states and possibly
//! offering a Modified block), a data provider is selected, and the
//! BusRd/BusRdX announcement is driven for that cycle. Memory-sourced
//! fills then sit through a fixed latency before streaming; cache-sourced
//! fills start streaming on the next cycle. The Flush phase announces one
//! word per cycle, and after the eighth word the transaction completes:
//! main memory absorbs the whole block (so it is refreshed even on
//! cache-to-cache transfers) and the requester's line is filled.

use crate::common::constants::{ADDR_MASK, BLOCK_WORDS, MEM_LATENCY, NUM_CORES};
use crate::core::cache::{cache_index, cache_tag, Cache, MesiState};
use crate::core::Core;
use crate::soc::memory::MainMemory;

/// Command announced on the bus, with its trace encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BusCommand {
    #[default]
    None = 0,
    /// Read request for a load miss.
    Rd = 1,
    /// Read-for-ownership request for a store into a line not in M.
    RdX = 2,
    /// One word of a streamed block.
    Flush = 3,
}

impl BusCommand {
    /// Numeric code used in the bus trace.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Transaction phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BusPhase {
    #[default]
    Idle,
    /// Counting down the main-memory latency.
    Wait,
    /// Streaming the staged block word by word.
    Flush,
}

/// Where the staged block came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Provider {
    /// A peer cache that held the block in Modified state.
    Cache(usize),
    /// Main memory.
    #[default]
    Memory,
}

impl Provider {
    /// Trace identity: core ids 0-3, memory is 4.
    pub fn id(self) -> u32 {
        match self {
            Self::Cache(i) => i as u32,
            Self::Memory => NUM_CORES as u32,
        }
    }
}

/// A core's pending request slot. Losers of arbitration stay active and
/// are reconsidered every cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusRequest {
    pub active: bool,
    pub cmd: BusCommand,
    pub addr: u32,
    pub origin: usize,
}

/// Signals driven on the bus during one cycle; `cmd == None` means the
/// bus is silent and no trace line is emitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusOutput {
    pub cmd: BusCommand,
    pub origid: u32,
    pub addr: u32,
    pub data: u32,
    pub shared: bool,
}

/// The shared bus: arbiter state plus the in-flight transaction.
pub struct Bus {
    /// Current transaction phase.
    pub phase: BusPhase,
    /// Signals driven this cycle.
    pub output: BusOutput,
    cmd: BusCommand,
    origin: usize,
    addr: u32,
    shared: bool,
    provider: Provider,
    block: [u32; BLOCK_WORDS],
    delay: u32,
    index: usize,
    rr_next: usize,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// An idle bus with the round-robin pointer at core 0.
    pub fn new() -> Self {
        Self {
            phase: BusPhase::Idle,
            output: BusOutput::default(),
            cmd: BusCommand::None,
            origin: 0,
            addr: 0,
            shared: false,
            provider: Provider::Memory,
            block: [0; BLOCK_WORDS],
            delay: 0,
            index: 0,
            rr_next: 0,
        }
    }

    /// True when no transaction is in flight.
    pub fn idle(&self) -> bool {
        self.phase == BusPhase::Idle
    }

    /// Drops the driven signals at the start of a cycle.
    pub fn clear_output(&mut self) {
        self.output = BusOutput::default();
    }

    /// Grants one pending request if the bus is idle.
    ///
    /// Slots are scanned in core-id order starting at the round-robin
    /// pointer; the winner's slot is deactivated and the pointer moves one
    /// past it. Losing slots stay active for the next cycle.
    pub fn arbitrate(
        &mut self,
        requests: &mut [BusRequest; NUM_CORES],
        cores: &mut [Core; NUM_CORES],
        mem: &MainMemory,
    ) {
        if self.phase != BusPhase::Idle {
            return;
        }
        for k in 0..NUM_CORES {
            let slot = (self.rr_next + k) % NUM_CORES;
            if requests[slot].active {
                self.rr_next = (slot + 1) % NUM_CORES;
                let req = requests[slot];
                requests[slot].active = false;
                self.start_transaction(req, cores, mem);
                return;
            }
        }
    }

    /// Snoop reaction of a single peer cache.
    ///
    /// A Modified holder becomes the provider and downgrades (S on BusRd,
    /// I on BusRdX); an Exclusive holder downgrades the same way without
    /// providing; Shared holders are invalidated by BusRdX only. Any
    /// non-Invalid holder sets the shared indicator.
    fn snoop_one(&mut self, cache: &mut Cache, cache_id: usize) {
        if cache_id == self.origin {
            return;
        }
        let idx = cache_index(self.addr);
        let tag = cache_tag(self.addr);
        if cache.state[idx] == MesiState::Invalid || u32::from(cache.tag[idx]) != tag {
            return;
        }
        self.shared = true;
        match cache.state[idx] {
            MesiState::Modified => {
                self.provider = Provider::Cache(cache_id);
                self.block = cache.line(idx);
                cache.state[idx] = if self.cmd == BusCommand::Rd {
                    MesiState::Shared
                } else {
                    MesiState::Invalid
                };
            }
            MesiState::Exclusive => {
                cache.state[idx] = if self.cmd == BusCommand::Rd {
                    MesiState::Shared
                } else {
                    MesiState::Invalid
                };
            }
            MesiState::Shared => {
                if self.cmd == BusCommand::RdX {
                    cache.state[idx] = MesiState::Invalid;
                }
            }
            MesiState::Invalid => {}
        }
    }

    /// Latches a granted request, snoops every peer, selects the data
    /// source and drives the BusRd/BusRdX announcement for this cycle.
    fn start_transaction(
        &mut self,
        req: BusRequest,
        cores: &mut [Core; NUM_CORES],
        mem: &MainMemory,
    ) {
        self.cmd = req.cmd;
        self.origin = req.origin;
        self.addr = req.addr;
        self.shared = false;
        self.provider = Provider::Memory;
        self.index = 0;

        for (i, core) in cores.iter_mut().enumerate() {
            self.snoop_one(&mut core.cache, i);
        }

        match self.provider {
            Provider::Memory => {
                self.block = mem.read_block(self.addr & !(BLOCK_WORDS as u32 - 1));
                self.delay = MEM_LATENCY;
                self.phase = BusPhase::Wait;
            }
            Provider::Cache(_) => {
                self.delay = 0;
                self.phase = BusPhase::Wait;
            }
        }

        self.clear_output();
        self.output = BusOutput {
            cmd: req.cmd,
            origid: req.origin as u32,
            addr: req.addr & ADDR_MASK,
            data: 0,
            shared: self.shared,
        };
    }

    /// Drives this cycle's output for an in-flight transaction.
    ///
    /// The Wait phase is silent until the latency expires; the transition
    /// into Flush happens in the same cycle the counter reaches zero,
    /// emitting the first word. The announcement cycle itself keeps its
    /// BusRd/BusRdX output, so a zero-latency (cache-sourced) fill starts
    /// flushing one cycle after the grant.
    pub fn drive_output(&mut self) {
        match self.phase {
            BusPhase::Flush => {
                self.output = self.flush_output();
            }
            BusPhase::Wait if self.delay == 0 && self.output.cmd == BusCommand::None => {
                self.phase = BusPhase::Flush;
                self.index = 0;
                self.output = self.flush_output();
            }
            _ => {}
        }
    }

    fn flush_output(&self) -> BusOutput {
        BusOutput {
            cmd: BusCommand::Flush,
            origid: self.provider.id(),
            addr: (self.addr & !(BLOCK_WORDS as u32 - 1)) + self.index as u32,
            data: self.block[self.index],
            shared: self.shared,
        }
    }

    /// Advances transaction timing at the end of a cycle: counts down the
    /// memory latency, or steps the flush index and completes the
    /// transaction after the final word.
    pub fn advance(&mut self, cores: &mut [Core; NUM_CORES], mem: &mut MainMemory) {
        if self.phase == BusPhase::Wait && self.delay > 0 {
            self.delay -= 1;
        } else if self.phase == BusPhase::Flush && self.output.cmd == BusCommand::Flush {
            self.index += 1;
            if self.index >= BLOCK_WORDS {
                self.complete_transaction(cores, mem);
                self.phase = BusPhase::Idle;
                self.cmd = BusCommand::None;
            }
        }
    }

    /// Completion: memory absorbs the block, the requester's line is
    /// filled (evicting and writing back a resident dirty line first) and
    /// its Memory stage is released.
    ///
    /// Fill state: BusRd lands Shared when any peer held the block and
    /// Exclusive otherwise; BusRdX always lands Modified.
    fn complete_transaction(&mut self, cores: &mut [Core; NUM_CORES], mem: &mut MainMemory) {
        let base = self.addr & !(BLOCK_WORDS as u32 - 1);
        mem.write_block(base, &self.block);

        let core = &mut cores[self.origin];
        let idx = cache_index(base);
        let tag = cache_tag(base);
        let new_state = match self.cmd {
            BusCommand::Rd if self.shared => MesiState::Shared,
            BusCommand::Rd => MesiState::Exclusive,
            _ => MesiState::Modified,
        };
        core.cache.fill_line(idx, tag, &self.block, new_state, mem);

        if core.mem.valid && core.mem.waiting {
            core.mem.waiting = false;
        }
    }
}
