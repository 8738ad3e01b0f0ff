//! Simulation harness: input loading, the cycle-stepped simulator, trace
//! capture and end-of-run output files.

/// Hex-per-line input image loading.
pub mod loader;

/// End-of-run output file writers.
pub mod output;

/// Simulator state and the global cycle loop.
pub mod simulator;

/// Trace line formatting.
pub mod trace;

use crate::common::constants::NUM_CORES;
use crate::common::SimError;
use crate::config::{FileConfig, GeneralConfig};

pub use simulator::Simulator;

/// Runs a complete simulation against a filename table: loads the inputs,
/// executes until every core is done (or the cycle cap hits), and writes
/// every output file. This is the whole of what the `sim` binary does
/// after argument handling.
pub fn run_files(files: &FileConfig, general: &GeneralConfig) -> Result<(), SimError> {
    let imems: [Vec<u32>; NUM_CORES] = [
        loader::load_imem(&files.imem[0])?,
        loader::load_imem(&files.imem[1])?,
        loader::load_imem(&files.imem[2])?,
        loader::load_imem(&files.imem[3])?,
    ];
    let mem = loader::load_main_mem(&files.memin)?;

    let mut sim = Simulator::new(imems, mem, general);
    sim.attach_trace_files(&files.coretrace, &files.bustrace)?;
    sim.run()?;

    output::write_trimmed_mem(&files.memout, sim.mem.words())?;
    for (core, path) in sim.cores.iter().zip(&files.regout) {
        output::write_regout(path, &core.regs)?;
    }
    for (core, path) in sim.cores.iter().zip(&files.dsram) {
        output::write_full_mem(path, &core.cache.data)?;
    }
    for (core, path) in sim.cores.iter().zip(&files.tsram) {
        output::write_tsram(path, &core.cache)?;
    }
    for (core, path) in sim.cores.iter().zip(&files.stats) {
        output::write_stats(path, &core.stats)?;
    }
    Ok(())
}
