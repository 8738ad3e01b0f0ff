//! Top-level simulator: the four cores, the bus, main memory and the
//! global clock, owned side by side so the scheduler can hand disjoint
//! borrows to the bus when it snoops and fills peer caches.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::common::constants::NUM_CORES;
use crate::common::SimError;
use crate::config::GeneralConfig;
use crate::core::stages::write_back;
use crate::core::Core;
use crate::sim::trace;
use crate::soc::bus::{Bus, BusCommand, BusRequest};
use crate::soc::memory::MainMemory;

/// The complete machine plus scheduling state.
///
/// Each cycle runs a fixed phase order: core traces are captured from the
/// pre-cycle latches, Writeback commits, every core computes its next
/// pipeline state (posting bus requests along the way), the bus arbitrates
/// and drives its outputs, the bus trace is captured, and finally bus
/// timing advances. The run ends when every core is done and the bus is
/// idle, or when the optional cycle cap is hit.
pub struct Simulator {
    pub cores: [Core; NUM_CORES],
    pub bus: Bus,
    pub mem: MainMemory,
    pub requests: [BusRequest; NUM_CORES],
    pub cycle: u32,
    max_cycles: Option<u32>,
    core_traces: [Option<BufWriter<File>>; NUM_CORES],
    bus_trace: Option<BufWriter<File>>,
}

impl Simulator {
    /// Builds the machine from the four instruction memories and the
    /// initial memory image. No trace files are attached yet.
    pub fn new(imems: [Vec<u32>; NUM_CORES], mem: MainMemory, general: &GeneralConfig) -> Self {
        let [im0, im1, im2, im3] = imems;
        let mut cores = [
            Core::new(0, im0),
            Core::new(1, im1),
            Core::new(2, im2),
            Core::new(3, im3),
        ];
        for core in &mut cores {
            core.debug_branch = general.debug_branch;
        }
        Self {
            cores,
            bus: Bus::new(),
            mem,
            requests: [BusRequest::default(); NUM_CORES],
            cycle: 0,
            max_cycles: general.cycle_cap(),
            core_traces: [None, None, None, None],
            bus_trace: None,
        }
    }

    /// Opens the per-core and bus trace files.
    pub fn attach_trace_files(
        &mut self,
        core_paths: &[String; NUM_CORES],
        bus_path: &str,
    ) -> Result<(), SimError> {
        for (slot, path) in self.core_traces.iter_mut().zip(core_paths) {
            *slot = Some(BufWriter::new(
                File::create(path).map_err(|e| SimError::output(path, e))?,
            ));
        }
        self.bus_trace = Some(BufWriter::new(
            File::create(bus_path).map_err(|e| SimError::output(bus_path, e))?,
        ));
        Ok(())
    }

    /// Executes one global cycle. Returns `true` when the run is over.
    pub fn step(&mut self) -> Result<bool, SimError> {
        self.bus.clear_output();

        for (core, writer) in self.cores.iter().zip(self.core_traces.iter_mut()) {
            if let Some(w) = writer {
                trace::write_core_trace(w, self.cycle, core)
                    .map_err(|e| SimError::output("core trace", e))?;
            }
        }

        for core in &mut self.cores {
            write_back::wb_stage(core);
        }

        for (core, request) in self.cores.iter_mut().zip(self.requests.iter_mut()) {
            core.advance(request, self.cycle);
        }

        self.bus.arbitrate(&mut self.requests, &mut self.cores, &self.mem);
        self.bus.drive_output();

        if let Some(w) = &mut self.bus_trace {
            if self.bus.output.cmd != BusCommand::None {
                trace::write_bus_trace(w, self.cycle, &self.bus.output)
                    .map_err(|e| SimError::output("bus trace", e))?;
            }
        }

        self.bus.advance(&mut self.cores, &mut self.mem);

        if let Some(cap) = self.max_cycles {
            if self.cycle >= cap {
                return Ok(true);
            }
        }
        if self.cores.iter().all(|c| c.done) && self.bus.idle() {
            return Ok(true);
        }
        self.cycle += 1;
        Ok(false)
    }

    /// Runs to completion (or the cycle cap) and flushes the traces.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.step()? {}
        for writer in self.core_traces.iter_mut().flatten() {
            writer
                .flush()
                .map_err(|e| SimError::output("core trace", e))?;
        }
        if let Some(w) = &mut self.bus_trace {
            w.flush().map_err(|e| SimError::output("bus trace", e))?;
        }
        Ok(())
    }
}
