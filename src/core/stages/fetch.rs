use crate::common::constants::PC_MASK;
use crate::core::pipeline::{FetchStage, NextLatches};
use crate::core::Core;
use crate::isa::{Instruction, Opcode};

/// Fetch stage: pulls the next instruction unless fetch has stopped or
/// Decode will still be occupied next cycle.
///
/// A pending redirect (branch or JAL resolved in Decode this cycle)
/// overrides the sequential PC; the instruction already latched in Fetch
/// is the delay slot and proceeds normally. Fetching a HALT sequentially
/// stops further fetches so the delay slot in flight is preserved.
pub fn fetch_stage(core: &mut Core, next: &mut NextLatches, decode_free_next: bool, fetch_moves: bool) {
    if !core.stop_fetch && decode_free_next {
        if core.redirect_pending {
            let inst = Instruction::decode(core.imem[core.redirect_pc as usize], core.redirect_pc);
            next.fetch = FetchStage { valid: true, inst };
            core.pc = core.redirect_pc.wrapping_add(1) & PC_MASK;
            core.redirect_pending = false;
        } else {
            let inst = Instruction::decode(core.imem[core.pc as usize], core.pc);
            next.fetch = FetchStage { valid: true, inst };
            if inst.op == Opcode::Halt {
                core.stop_fetch = true;
            }
            core.pc = core.pc.wrapping_add(1) & PC_MASK;
        }
    } else if fetch_moves {
        next.fetch.valid = false;
    }
}
