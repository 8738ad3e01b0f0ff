//! Pipeline stage implementations.
//!
//! One function per stage, invoked by `Core::advance` in Memory, Execute,
//! Decode, Fetch order so each stage sees the pre-cycle state of the
//! stages ahead of it. Writeback runs separately, before next-state
//! computation, because its register writes are architectural.

/// Decode: R1 immediate mirror, hazard stalls, branch resolution.
pub mod decode;

/// Execute: ALU and effective-address computation.
pub mod execute;

/// Fetch: sequential and redirect instruction fetch.
pub mod fetch;

/// Memory: cache access and bus request generation.
pub mod memory_access;

/// Writeback: architectural commit.
pub mod write_back;
