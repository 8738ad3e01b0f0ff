use crate::isa::Instruction;

/// Fetch-stage latch: the instruction pulled from instruction memory.
#[derive(Clone, Copy, Default, Debug)]
pub struct FetchStage {
    pub valid: bool,
    pub inst: Instruction,
}

/// Decode-stage latch.
#[derive(Clone, Copy, Default, Debug)]
pub struct DecodeStage {
    pub valid: bool,
    pub inst: Instruction,
}

/// Execute-stage latch: carries the three register values read in Decode.
#[derive(Clone, Copy, Default, Debug)]
pub struct ExecStage {
    pub valid: bool,
    pub inst: Instruction,
    pub rs_val: i32,
    pub rt_val: i32,
    pub rd_val: i32,
}

/// Memory-stage latch.
///
/// `miss` is sticky for the lifetime of the instruction in this latch so
/// the hit/miss counters move exactly once; `waiting` is raised while a
/// bus transaction is outstanding and cleared by the bus on completion;
/// `request_queued` records that the request was posted to the arbiter.
#[derive(Clone, Copy, Default, Debug)]
pub struct MemStage {
    pub valid: bool,
    pub inst: Instruction,
    pub alu_result: u32,
    pub mem_addr: u32,
    pub store_data: u32,
    pub is_load: bool,
    pub is_store: bool,
    pub miss: bool,
    pub waiting: bool,
    pub request_queued: bool,
    pub load_value: u32,
}

/// Writeback-stage latch: the value to commit to the register file.
#[derive(Clone, Copy, Default, Debug)]
pub struct WbStage {
    pub valid: bool,
    pub inst: Instruction,
    pub value: u32,
}

/// Shadow copies of every latch, filled during a cycle and committed at
/// its end so stage evaluation order cannot leak next-cycle state.
#[derive(Clone, Copy, Default, Debug)]
pub struct NextLatches {
    pub fetch: FetchStage,
    pub decode: DecodeStage,
    pub exec: ExecStage,
    pub mem: MemStage,
    pub wb: WbStage,
}
