//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage and
//! the comparator used by Decode to resolve conditional branches. All
//! arithmetic is 32-bit two's-complement with wrapping; shift amounts are
//! masked to 5 bits.

use crate::common::constants::PC_MASK;
use crate::isa::{Instruction, Opcode};

/// Arithmetic Logic Unit for integer operations.
pub struct Alu;

impl Alu {
    /// Executes the ALU operation for `inst` on the operands read in
    /// Decode.
    ///
    /// For JAL the result is the link value `(pc + 1) mod 1024`; branches,
    /// memory ops, HALT and unknown opcodes yield 0 (none of them consume
    /// an ALU result).
    pub fn execute(inst: &Instruction, rs_val: i32, rt_val: i32) -> u32 {
        let shift = (rt_val as u32) & 0x1F;
        match inst.op {
            Opcode::Add => rs_val.wrapping_add(rt_val) as u32,
            Opcode::Sub => rs_val.wrapping_sub(rt_val) as u32,
            Opcode::And => (rs_val & rt_val) as u32,
            Opcode::Or => (rs_val | rt_val) as u32,
            Opcode::Xor => (rs_val ^ rt_val) as u32,
            Opcode::Mul => rs_val.wrapping_mul(rt_val) as u32,
            Opcode::Sll => (rs_val as u32).wrapping_shl(shift),
            Opcode::Sra => (rs_val >> shift) as u32,
            Opcode::Srl => (rs_val as u32).wrapping_shr(shift),
            Opcode::Jal => inst.pc.wrapping_add(1) & PC_MASK,
            _ => 0,
        }
    }

    /// Evaluates a conditional branch as a signed 32-bit comparison.
    pub fn branch_taken(op: Opcode, rs_val: i32, rt_val: i32) -> bool {
        match op {
            Opcode::Beq => rs_val == rt_val,
            Opcode::Bne => rs_val != rt_val,
            Opcode::Blt => rs_val < rt_val,
            Opcode::Bgt => rs_val > rt_val,
            Opcode::Ble => rs_val <= rt_val,
            Opcode::Bge => rs_val >= rt_val,
            _ => false,
        }
    }
}
