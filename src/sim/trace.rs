//! Per-cycle trace line formatting.
//!
//! The core trace records the pre-cycle pipeline snapshot: the line for
//! cycle N shows the latches as they stood before cycle N's stage logic
//! fired, and the register columns are read at the same point, before
//! that cycle's Writeback commit, so they show the previous cycle's
//! architectural state. The bus trace records the signals actually driven
//! during the cycle. Together this makes reruns byte-identical.

use std::io::{self, Write};

use crate::common::constants::{ADDR_MASK, PC_MASK};
use crate::core::Core;
use crate::soc::bus::BusOutput;

fn stage_pc(valid: bool, pc: u32) -> String {
    if valid {
        format!("{:03X}", pc & PC_MASK)
    } else {
        "---".to_string()
    }
}

/// Writes one core trace line: `cycle F D E M W R2..R15`.
///
/// Emitted only on cycles where at least one latch is valid; stage fields
/// are the 3-hex-digit PC of the latched instruction or `---`.
pub fn write_core_trace(w: &mut impl Write, cycle: u32, core: &Core) -> io::Result<()> {
    if !core.pipeline_active() {
        return Ok(());
    }
    write!(
        w,
        "{} {} {} {} {} {}",
        cycle,
        stage_pc(core.fetch.valid, core.fetch.inst.pc),
        stage_pc(core.decode.valid, core.decode.inst.pc),
        stage_pc(core.exec.valid, core.exec.inst.pc),
        stage_pc(core.mem.valid, core.mem.inst.pc),
        stage_pc(core.wb.valid, core.wb.inst.pc),
    )?;
    for reg in &core.regs[2..] {
        write!(w, " {reg:08X}")?;
    }
    writeln!(w)
}

/// Writes one bus trace line: `cycle origid cmd addr data shared` with
/// hex field widths 1/1/5/8/1. The caller skips silent cycles.
pub fn write_bus_trace(w: &mut impl Write, cycle: u32, out: &BusOutput) -> io::Result<()> {
    writeln!(
        w,
        "{} {:X} {:X} {:05X} {:08X} {:X}",
        cycle,
        out.origid,
        out.cmd.code(),
        out.addr & ADDR_MASK,
        out.data,
        u32::from(out.shared)
    )
}
