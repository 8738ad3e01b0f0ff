//! Execution units shared by the pipeline stages.

/// Integer ALU and branch comparator.
pub mod alu;
