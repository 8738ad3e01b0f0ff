//! Fatal error reporting.
//!
//! Every error the simulator can hit is fatal: the binary renders it to
//! stderr and exits non-zero. There are no runtime simulation errors;
//! reserved-register writes are suppressed, shift amounts are masked and
//! addresses wrap, so the ISA has no undefined behavior to report.

use std::io;
use thiserror::Error;

/// Errors surfaced while setting up or tearing down a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// An input file (instruction memory or memory image) could not be read.
    #[error("failed to read {path}: {source}")]
    InputFile {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output file (trace, dump or stats) could not be created or written.
    #[error("failed to write {path}: {source}")]
    OutputFile {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The TOML configuration file was unreadable or malformed.
    #[error("bad config file {path}: {message}")]
    Config {
        /// Path of the offending file.
        path: String,
        /// Parser or I/O detail.
        message: String,
    },
}

impl SimError {
    /// Wraps an I/O error from reading `path`.
    pub fn input(path: &str, source: io::Error) -> Self {
        Self::InputFile {
            path: path.to_string(),
            source,
        }
    }

    /// Wraps an I/O error from writing `path`.
    pub fn output(path: &str, source: io::Error) -> Self {
        Self::OutputFile {
            path: path.to_string(),
            source,
        }
    }
}
