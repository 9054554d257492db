//! `vcfx-variant-count`: counts data lines in a VCF file.
//!
//! Tool adapter over `vcfx-parallel`/`vcfx-mmap`: header and empty lines
//! are excluded; a line with fewer than 8 fields is skipped with a warning
//! rather than counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use vcfx_cli::CommonArgs;
use vcfx_mmap::Input;
use vcfx_tokenizer::parse_variant_line;

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-variant-count", version, disable_version_flag = true, about = "Count the number of variant records in a VCF file")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let cli = Cli::parse();
    cli.common.init_logger();
    CommonArgs::log_args(&cli);
    vcfx_cli::run_tool(|| run(cli.common.input.as_deref(), cli.common.threads));
}

fn run(input_path: Option<&std::path::Path>, threads: usize) -> anyhow::Result<()> {
    let mut input = Input::open(input_path, threads)?;
    let count = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&count);

    vcfx_parallel::run_over_input(
        &mut input,
        threads,
        move |line, _header| {
            if parse_variant_line(line).is_ok() {
                counter.fetch_add(1, Ordering::Relaxed);
            } else {
                log::warn!("skipping line with fewer than 8 fields");
            }
            Ok(None)
        },
        std::io::sink(),
    )?;

    println!("Total Variants: {}", count.load(Ordering::Relaxed));
    Ok(())
}
