//! Core implementation: register file, pipeline latches, private cache.

/// Private per-core MESI cache.
pub mod cache;

/// Pipeline latch records.
pub mod pipeline;

/// Per-stage pipeline logic.
pub mod stages;

/// Execution units.
pub mod units;

use crate::common::constants::{IMEM_SIZE, REG_COUNT};
use crate::core::cache::Cache;
use crate::core::pipeline::{DecodeStage, ExecStage, FetchStage, MemStage, NextLatches, WbStage};
use crate::isa::{Instruction, Opcode};
use crate::soc::bus::BusRequest;
use crate::stats::CoreStats;

/// One in-order pipelined core with its architectural and micro state.
///
/// At reset the Fetch latch is prefilled with the instruction at PC 0 and
/// the PC already points at word 1, so the first trace line shows a busy
/// Fetch stage.
pub struct Core {
    /// Core id, doubling as the bus request-slot and snoop identity.
    pub id: usize,
    /// Instruction memory, 1024 words, zero-padded.
    pub imem: Vec<u32>,
    /// Architectural registers. R0 is wired zero; R1 mirrors the Decode
    /// immediate and is rewritten by the Decode stage every cycle.
    pub regs: [u32; REG_COUNT],
    /// Next sequential fetch PC.
    pub pc: u32,
    /// A branch or JAL resolved this cycle; Fetch consumes the redirect.
    pub redirect_pending: bool,
    /// Redirect target, already masked to the PC range.
    pub redirect_pc: u32,
    /// Set once a HALT is fetched sequentially; Fetch goes quiet.
    pub stop_fetch: bool,
    /// A HALT has retired from Writeback.
    pub halted: bool,
    /// Halted and the pipeline has drained; `cycles` stops counting.
    pub done: bool,
    pub fetch: FetchStage,
    pub decode: DecodeStage,
    pub exec: ExecStage,
    pub mem: MemStage,
    pub wb: WbStage,
    pub cache: Cache,
    pub stats: CoreStats,
    /// Mirrors the `SIM_DEBUG_BRANCH` diagnostic switch.
    pub debug_branch: bool,
}

impl Core {
    /// Builds a core around its instruction memory and prefills Fetch.
    pub fn new(id: usize, mut imem: Vec<u32>) -> Self {
        imem.resize(IMEM_SIZE, 0);
        let first = Instruction::decode(imem[0], 0);
        Self {
            id,
            imem,
            regs: [0; REG_COUNT],
            pc: 1,
            redirect_pending: false,
            redirect_pc: 0,
            stop_fetch: first.op == Opcode::Halt,
            halted: false,
            done: false,
            fetch: FetchStage {
                valid: true,
                inst: first,
            },
            decode: DecodeStage::default(),
            exec: ExecStage::default(),
            mem: MemStage::default(),
            wb: WbStage::default(),
            cache: Cache::default(),
            stats: CoreStats::default(),
            debug_branch: false,
        }
    }

    /// True while any pipeline latch holds a valid instruction.
    pub fn pipeline_active(&self) -> bool {
        self.fetch.valid || self.decode.valid || self.exec.valid || self.mem.valid || self.wb.valid
    }

    /// Computes and commits the next-cycle pipeline state.
    ///
    /// Stages are evaluated back to front (Memory, Execute, Decode, Fetch)
    /// into shadow latches so every stage observes pre-cycle state, then
    /// the shadows are committed at once. Writeback is not evaluated here;
    /// the scheduler commits it beforehand. `request` is this core's slot
    /// in the bus arbiter.
    pub fn advance(&mut self, request: &mut BusRequest, cycle: u32) {
        if !self.done {
            self.stats.cycles += 1;
        }

        let mut next = NextLatches {
            fetch: self.fetch,
            decode: self.decode,
            exec: self.exec,
            mem: self.mem,
            wb: WbStage::default(),
        };

        let mem_advances = stages::memory_access::mem_stage(self, &mut next, request);
        let mem_free_next = !self.mem.valid || mem_advances;
        let exec_can_move = self.exec.valid && mem_free_next;
        let exec_free_next = !self.exec.valid || exec_can_move;
        if exec_can_move {
            stages::execute::execute_stage(self, &mut next);
        }

        let decode_moves = stages::decode::decode_stage(self, &mut next, exec_free_next, cycle);
        let decode_free_next = !self.decode.valid || decode_moves;
        let fetch_moves = self.fetch.valid && decode_free_next;
        if fetch_moves {
            next.decode = DecodeStage {
                valid: true,
                inst: self.fetch.inst,
            };
        }
        stages::fetch::fetch_stage(self, &mut next, decode_free_next, fetch_moves);

        self.fetch = next.fetch;
        self.decode = next.decode;
        self.exec = next.exec;
        self.mem = next.mem;
        self.wb = next.wb;

        if self.halted && !self.pipeline_active() {
            self.done = true;
        }
    }
}
