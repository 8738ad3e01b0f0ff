use crate::common::constants::ADDR_MASK;
use crate::core::cache::{cache_index, MesiState};
use crate::core::pipeline::{NextLatches, WbStage};
use crate::core::Core;
use crate::soc::bus::{BusCommand, BusRequest};

/// Memory stage: cache access with miss-driven bus requests.
///
/// Non-memory instructions forward their ALU result straight to Writeback.
/// Loads and stores look up the cache every cycle the stage is occupied:
/// a usable hit completes the access (a store hitting an Exclusive line
/// upgrades it to Modified in place); anything else posts a BusRd/BusRdX
/// request and parks the stage with `waiting` raised until the bus fills
/// the line, after which the next lookup hits.
///
/// The hit/miss counters follow the tag lookup and move once per
/// instruction, guarded by the sticky `miss` flag; a store hitting a
/// Shared line therefore counts as a write hit even though it still needs
/// the bus for ownership. `mem_stall` counts the missing access cycle and
/// every waiting cycle after it.
///
/// Returns whether the instruction leaves the stage this cycle.
pub fn mem_stage(core: &mut Core, next: &mut NextLatches, request: &mut BusRequest) -> bool {
    if !core.mem.valid {
        return false;
    }
    if core.mem.waiting {
        core.stats.mem_stall += 1;
        return false;
    }

    let inst = core.mem.inst;
    if !inst.op.is_mem() {
        next.wb = WbStage {
            valid: true,
            inst,
            value: core.mem.alu_result,
        };
        next.mem.valid = false;
        return true;
    }

    let counted = core.mem.miss;
    let lookup = core.cache.lookup(core.mem.mem_addr);
    if !counted {
        match (lookup.is_some(), core.mem.is_load) {
            (true, true) => core.stats.read_hit += 1,
            (true, false) => core.stats.write_hit += 1,
            (false, true) => core.stats.read_miss += 1,
            (false, false) => core.stats.write_miss += 1,
        }
    }

    let needs_bus = match lookup {
        None => true,
        Some(MesiState::Shared) if core.mem.is_store => true,
        Some(_) => false,
    };

    if needs_bus {
        if !core.mem.request_queued {
            *request = BusRequest {
                active: true,
                cmd: if core.mem.is_load {
                    BusCommand::Rd
                } else {
                    BusCommand::RdX
                },
                addr: core.mem.mem_addr & ADDR_MASK,
                origin: core.id,
            };
            next.mem.request_queued = true;
        }
        next.mem.miss = true;
        next.mem.waiting = true;
        core.stats.mem_stall += 1;
        return false;
    }

    if core.mem.is_load {
        let value = core.cache.read(core.mem.mem_addr);
        next.mem.load_value = value;
        next.wb = WbStage {
            valid: true,
            inst,
            value,
        };
    } else {
        core.cache.write(core.mem.mem_addr, core.mem.store_data);
        let idx = cache_index(core.mem.mem_addr);
        if core.cache.state[idx] == MesiState::Exclusive {
            core.cache.state[idx] = MesiState::Modified;
        }
        next.wb = WbStage {
            valid: true,
            inst,
            value: 0,
        };
    }
    next.mem.valid = false;
    true
}
