use crate::common::constants::ADDR_MASK;
use crate::core::pipeline::{MemStage, NextLatches};
use crate::core::units::alu::Alu;
use crate::core::Core;
use crate::isa::Opcode;

/// Execute stage: only entered when the Memory stage will be free.
///
/// Memory ops compute the effective address `rs + rt` (low 20 bits) and
/// carry `rd` as store data; everything else runs through the ALU.
pub fn execute_stage(core: &mut Core, next: &mut NextLatches) {
    let inst = core.exec.inst;
    next.exec.valid = false;
    next.mem = MemStage {
        valid: true,
        inst,
        ..MemStage::default()
    };
    if inst.op.is_mem() {
        let addr = core.exec.rs_val.wrapping_add(core.exec.rt_val) as u32;
        next.mem.mem_addr = addr & ADDR_MASK;
        next.mem.store_data = core.exec.rd_val as u32;
        next.mem.is_load = inst.op == Opcode::Lw;
        next.mem.is_store = inst.op == Opcode::Sw;
    } else {
        next.mem.alu_result = Alu::execute(&inst, core.exec.rs_val, core.exec.rt_val);
    }
}
