//! Command-line configuration for the `kidcode` binary
//!
//! Every budget flag can also come from a `KIDCODE_*` environment variable;
//! an explicit flag wins over the environment, and anything left unset keeps
//! the [`ExecutionLimits`] default.

use crate::executor::ExecutionLimits;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// KidCode: a friendly Python playground with tutorials and challenges.
///
/// Run `kidcode` to open the playground, or `kidcode --plain FILE` to run a
/// program once and print what happened.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "kidcode", author, version, long_about = None)]
pub struct Cli {
    /// Python file to run. Reloaded from disk every time you press `r`.
    pub file: Option<PathBuf>,

    /// Tutorial or challenge id to start on (see --list).
    #[arg(short, long, env = "KIDCODE_CHALLENGE")]
    pub challenge: Option<String>,

    /// Run once and print the result instead of opening the playground.
    #[arg(short, long)]
    pub plain: bool,

    /// List every tutorial and challenge, then exit.
    #[arg(short, long)]
    pub list: bool,

    /// Seed for the `random` module, for repeatable runs.
    #[arg(long, env = "KIDCODE_SEED")]
    pub seed: Option<u64>,

    /// Maximum interpreter steps before the run is stopped.
    #[arg(long, env = "KIDCODE_MAX_STEPS")]
    pub max_steps: Option<u64>,

    /// Wall-clock budget for one run, in milliseconds.
    #[arg(long, env = "KIDCODE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum bytes of captured output per run.
    #[arg(long, env = "KIDCODE_MAX_OUTPUT_BYTES")]
    pub max_output_bytes: Option<usize>,

    /// Log engine events to stderr (same as RUST_LOG=kidcode=debug).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The execution budgets these arguments ask for
    pub fn to_limits(&self) -> ExecutionLimits {
        let mut limits = ExecutionLimits::default();
        if let Some(max_steps) = self.max_steps {
            limits = limits.with_max_steps(max_steps);
        }
        if let Some(ms) = self.timeout_ms {
            limits = limits.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(bytes) = self.max_output_bytes {
            limits = limits.with_max_output_bytes(bytes);
        }
        if let Some(seed) = self.seed {
            limits = limits.with_random_seed(seed);
        }
        limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_default_limits() {
        let cli = Cli::try_parse_from(["kidcode"]).unwrap();
        assert_eq!(cli.file, None);
        assert!(!cli.plain);
        assert_eq!(cli.to_limits(), ExecutionLimits::default());
    }

    #[test]
    fn test_budget_flags() {
        let cli = Cli::try_parse_from([
            "kidcode",
            "game.py",
            "--plain",
            "--challenge",
            "math-magic",
            "--max-steps",
            "500",
            "--timeout-ms",
            "250",
            "--max-output-bytes",
            "64",
            "--seed",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("game.py")));
        assert_eq!(cli.challenge.as_deref(), Some("math-magic"));
        assert!(cli.plain);

        let limits = cli.to_limits();
        assert_eq!(limits.max_steps, 500);
        assert_eq!(limits.time_limit, Duration::from_millis(250));
        assert_eq!(limits.max_output_bytes, 64);
        assert_eq!(limits.random_seed, Some(7));
        assert_eq!(limits.max_call_depth, ExecutionLimits::default().max_call_depth);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(Cli::try_parse_from(["kidcode", "--max-steps", "lots"]).is_err());
    }
}
