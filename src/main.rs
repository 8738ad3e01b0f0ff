//! Multicore simulator CLI.
//!
//! The main executable for the simulator. It accepts either no positional
//! arguments (using the stock filename table) or exactly 27 filenames in
//! the fixed order imem0-3, memin, memout, regout0-3, coretrace0-3,
//! bustrace, dsram0-3, tsram0-3, stats0-3. An optional `--config` TOML
//! file can override the defaults; `SIM_MAX_CYCLES` and `SIM_DEBUG_BRANCH`
//! in the environment override everything.

use clap::Parser;
use std::process;

use multicore_sim::config::{FileConfig, SimConfig};
use multicore_sim::sim;

/// Command-line arguments for the multicore simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate quad-core MESI simulator")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Either empty, or all 27 filenames in the fixed order.
    files: Vec<String>,
}

const USAGE: &str = "usage: sim [imem0 imem1 imem2 imem3 memin memout \
regout0 regout1 regout2 regout3 core0trace core1trace core2trace core3trace \
bustrace dsram0 dsram1 dsram2 dsram3 tsram0 tsram1 tsram2 tsram3 \
stats0 stats1 stats2 stats3]";

fn main() {
    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => match SimConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    config.apply_env();

    let files = match args.files.len() {
        0 => config.files.clone(),
        FileConfig::ARG_COUNT => FileConfig::from_args(&args.files),
        _ => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = sim::run_files(&files, &config.general) {
        eprintln!("{e}");
        process::exit(1);
    }
}
