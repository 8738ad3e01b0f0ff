use serde::Deserialize;
use std::env;

use crate::common::constants::NUM_CORES;
use crate::common::SimError;

/// Environment variable capping the cycle count.
pub const ENV_MAX_CYCLES: &str = "SIM_MAX_CYCLES";

/// Environment variable enabling the branch-decision diagnostic.
pub const ENV_DEBUG_BRANCH: &str = "SIM_DEBUG_BRANCH";

/// Complete run configuration: filename table plus run options.
///
/// Loadable from a TOML file; every field has the canonical default, so an
/// empty (or absent) file reproduces the stock filename table and an
/// uncapped run. Positional command-line filenames and the environment
/// variables override whatever the file says.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub general: GeneralConfig,
    pub files: FileConfig,
}

impl SimConfig {
    /// Loads a TOML config file.
    pub fn from_file(path: &str) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|e| SimError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| SimError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Applies the environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(val) = env::var(ENV_MAX_CYCLES) {
            self.general.max_cycles = parse_decimal(&val);
        }
        if env::var_os(ENV_DEBUG_BRANCH).is_some() {
            self.general.debug_branch = true;
        }
    }
}

/// Run options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Cycle cap; negative means unlimited.
    pub max_cycles: i64,
    /// Branch-decision diagnostic on stderr.
    pub debug_branch: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: -1,
            debug_branch: false,
        }
    }
}

impl GeneralConfig {
    /// Cycle cap as an optional value.
    pub fn cycle_cap(&self) -> Option<u32> {
        if self.max_cycles >= 0 {
            Some(self.max_cycles as u32)
        } else {
            None
        }
    }
}

/// The 27-entry filename table, in its five groups.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub imem: [String; NUM_CORES],
    pub memin: String,
    pub memout: String,
    pub regout: [String; NUM_CORES],
    pub coretrace: [String; NUM_CORES],
    pub bustrace: String,
    pub dsram: [String; NUM_CORES],
    pub tsram: [String; NUM_CORES],
    pub stats: [String; NUM_CORES],
}

fn per_core(prefix: &str, suffix: &str) -> [String; NUM_CORES] {
    std::array::from_fn(|i| format!("{prefix}{i}{suffix}"))
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            imem: per_core("imem", ".txt"),
            memin: "memin.txt".to_string(),
            memout: "memout.txt".to_string(),
            regout: per_core("regout", ".txt"),
            coretrace: std::array::from_fn(|i| format!("core{i}trace.txt")),
            bustrace: "bustrace.txt".to_string(),
            dsram: per_core("dsram", ".txt"),
            tsram: per_core("tsram", ".txt"),
            stats: per_core("stats", ".txt"),
        }
    }
}

impl FileConfig {
    /// Number of positional filename arguments the CLI accepts.
    pub const ARG_COUNT: usize = 27;

    /// Builds the table from the 27 positional arguments, in the fixed
    /// order imem0-3, memin, memout, regout0-3, coretrace0-3, bustrace,
    /// dsram0-3, tsram0-3, stats0-3. The caller has checked the length.
    pub fn from_args(args: &[String]) -> Self {
        let group = |base: usize| std::array::from_fn(|i| args[base + i].clone());
        Self {
            imem: group(0),
            memin: args[4].clone(),
            memout: args[5].clone(),
            regout: group(6),
            coretrace: group(10),
            bustrace: args[14].clone(),
            dsram: group(15),
            tsram: group(19),
            stats: group(23),
        }
    }
}

/// C `atoi` semantics: optional sign and leading digits, anything else 0.
pub fn parse_decimal(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |v| sign * v)
}
