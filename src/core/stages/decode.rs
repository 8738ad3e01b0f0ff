use crate::common::constants::PC_MASK;
use crate::core::pipeline::{ExecStage, NextLatches};
use crate::core::units::alu::Alu;
use crate::core::Core;
use crate::isa::Opcode;

/// Decode stage: hazard detection, register read, and branch resolution.
///
/// Whenever a valid instruction sits in Decode, R1 is rewritten with its
/// immediate before anything else; that is how the 12-bit immediate enters
/// the register-indexed datapath. Hazard detection then stalls on any
/// source register >= 2 with an in-flight writer in Execute, Memory or
/// Writeback (there is no forwarding), and on a busy Execute stage.
///
/// Branches and JAL resolve here, one cycle after fetch, so the following
/// instruction is already latched and executes as a delay slot. The
/// redirect target is a register value (`regs[rd]`), usually R1, i.e. the
/// immediate.
///
/// Returns whether the instruction advances to Execute this cycle.
pub fn decode_stage(core: &mut Core, next: &mut NextLatches, exec_free_next: bool, cycle: u32) -> bool {
    let has_inst = core.decode.valid;
    let mut stall = false;

    if has_inst {
        let inst = core.decode.inst;
        core.regs[1] = inst.imm as u32;

        for reg in inst.source_regs() {
            if reg <= 1 {
                continue;
            }
            if core.exec.valid && core.exec.inst.dest_reg() == Some(reg) {
                stall = true;
            }
            if core.mem.valid && core.mem.inst.dest_reg() == Some(reg) {
                stall = true;
            }
            if core.wb.valid && core.wb.inst.dest_reg() == Some(reg) {
                stall = true;
            }
        }
        if !exec_free_next {
            stall = true;
        }
        if stall {
            core.stats.decode_stall += 1;
        }
    }

    let moves = has_inst && !stall && exec_free_next;
    if moves {
        let inst = core.decode.inst;
        let rs_val = core.regs[inst.rs] as i32;
        let rt_val = core.regs[inst.rt] as i32;
        let rd_val = core.regs[inst.rd] as i32;
        next.exec = ExecStage {
            valid: true,
            inst,
            rs_val,
            rt_val,
            rd_val,
        };

        if inst.op.is_branch() {
            let taken = Alu::branch_taken(inst.op, rs_val, rt_val);
            if core.debug_branch && core.id == 3 {
                eprintln!(
                    "cycle {} core{} branch pc {:03X} rs={:08X} rt={:08X} taken={} target={:03X}",
                    cycle,
                    core.id,
                    inst.pc & PC_MASK,
                    rs_val as u32,
                    rt_val as u32,
                    u32::from(taken),
                    core.regs[inst.rd] & PC_MASK
                );
            }
            if taken {
                core.redirect_pending = true;
                core.redirect_pc = core.regs[inst.rd] & PC_MASK;
            }
        } else if inst.op == Opcode::Jal {
            core.redirect_pending = true;
            core.redirect_pc = core.regs[inst.rd] & PC_MASK;
        }

        core.regs[1] = inst.imm as u32;
        next.decode.valid = false;
    } else if !stall {
        next.decode.valid = false;
    }
    moves
}
