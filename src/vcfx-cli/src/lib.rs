//! Shared CLI plumbing.
//!
//! Every `src/bin/vcfx-*` tool adapter flattens [`CommonArgs`] into its own
//! `clap::Parser` struct so the external interface stays
//! identical across tools, then calls [`init`] once before doing any work.
//!
//! `-h/--help` is `clap`'s own auto-generated flag. `-v/--version` is wired
//! here explicitly (rather than left to `clap`'s default `-V`) so the short
//! form matches the shared CLI surface exactly; each top-level `Cli` struct
//! must set `#[command(version, disable_version_flag = true)]` to suppress
//! the default `-V`/`--version` pair and let this one take over.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

/// CLI surface shared across all tools.
#[derive(Args, Debug, Serialize, Clone)]
pub struct CommonArgs {
    /// Input VCF file (plain, `.gz`, `.bgz`, `.bgzf`). Reads stdin when absent.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Suppress informational stderr output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Worker thread count; `0` means auto (hardware concurrency).
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Print tool name and version, then exit 0.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: (),

    /// Repeat for more verbose logging (Info, Debug, Trace). Long-only:
    /// `-v` is reserved for `--version` on the shared CLI surface.
    #[arg(long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Initializes the process-wide logger at the verbosity implied by
    /// `--verbose`/`--quiet`.
    pub fn init_logger(&self) {
        vcfx_logger::init(self.verbose, self.quiet);
    }

    /// Serializes `full_args` (typically the tool's own `clap::Parser`
    /// struct with `CommonArgs` flattened in) to YAML and logs it at `Info`,
    /// so a run's exact arguments are always recoverable from its log.
    pub fn log_args<T: Serialize>(full_args: &T) {
        match serde_yaml::to_string(full_args) {
            Ok(serialized) => log::info!("\n---- Command line args ----\n{serialized}\n---"),
            Err(e) => log::warn!("failed to serialize command line args: {e}"),
        }
    }
}

/// Runs `body`, logging a fatal error and exiting with code 1 on failure.
/// Exit codes: `0` success, `1` any fatal condition. Never
/// `panic!`/`unwrap()` on a reachable error path; this is the one place an
/// error becomes a process exit.
pub fn run_tool<F>(body: F) -> !
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match body() {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug, Serialize)]
    #[command(version, disable_version_flag = true)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn common_args_parse_shared_flags() {
        let cli = TestCli::parse_from(["tool", "-i", "in.vcf", "-q", "-t", "4", "--verbose", "--verbose"]);
        assert_eq!(cli.common.input, Some(PathBuf::from("in.vcf")));
        assert!(cli.common.quiet);
        assert_eq!(cli.common.threads, 4);
        assert_eq!(cli.common.verbose, 2);
    }

    #[test]
    fn common_args_default_to_stdin_and_auto_threads() {
        let cli = TestCli::parse_from(["tool"]);
        assert_eq!(cli.common.input, None);
        assert_eq!(cli.common.threads, 0);
        assert!(!cli.common.quiet);
    }
}
