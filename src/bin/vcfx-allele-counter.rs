//! `vcfx-allele-counter`: compact binary per-sample ref/alt allele counts.
//!
//! Wire format: 16-byte header (`"VCAC"` + `u32` version + `u32`
//! sample_count + `u64` variant_count), then per variant five
//! NUL-terminated strings (CHROM, POS, ID, REF, ALT) followed by
//! `2*sample_count` bytes of `(ref_count_i8, alt_count_i8)` pairs. The
//! header needs the total variant count before any byte of it can be
//! written, so the transformed body is buffered in memory first.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use vcfx_cli::CommonArgs;
use vcfx_genotype::code_any_diploid;
use vcfx_mmap::Input;
use vcfx_parallel::ParallelError;
use vcfx_tokenizer::{parse_variant_line, sample_column, sample_starts, split_subfields, TokenizeError};

const VCAC_VERSION: u32 = 1;

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-allele-counter", version, disable_version_flag = true, about = "Emit a compact binary per-sample ref/alt allele count table")]
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
    let variant_count = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&variant_count);
    let mut body = Vec::new();

    let header = vcfx_parallel::run_over_input(
        &mut input,
        threads,
        move |line, header| {
            let record = match parse_variant_line(line) {
                Ok(r) => r,
                Err(TokenizeError::TooFewFields) => {
                    log::warn!("skipping line with fewer than 8 fields");
                    return Ok(None);
                }
                Err(e) => return Err(ParallelError::Fatal(e.to_string())),
            };
            let Some(format) = record.format else { return Ok(None) };
            let format_keys = split_subfields(format, b':');
            let Some(gt_idx) = format_keys.iter().position(|&k| k == b"GT") else {
                return Ok(None);
            };

            let n = header.samples.len();
            let starts = sample_starts(record.samples_region, n);
            let mut out = Vec::new();
            for field in [record.chrom, record.pos, record.id, record.reference, record.alt] {
                out.extend_from_slice(field);
                out.push(0);
            }
            for i in 0..n {
                let col = sample_column(record.samples_region, &starts, i);
                let subfields = split_subfields(col, b':');
                let gt = subfields.get(gt_idx).copied().unwrap_or(b".");
                let (ref_count, alt_count) = allele_counts(gt);
                out.push(ref_count as u8);
                out.push(alt_count as u8);
            }
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(Some(out))
        },
        &mut body,
    )?;

    let mut wire = Vec::with_capacity(16 + body.len());
    wire.extend_from_slice(b"VCAC");
    wire.extend_from_slice(&VCAC_VERSION.to_le_bytes());
    wire.extend_from_slice(&(header.samples.len() as u32).to_le_bytes());
    wire.extend_from_slice(&variant_count.load(Ordering::Relaxed).to_le_bytes());
    wire.extend_from_slice(&body);

    std::io::stdout().write_all(&wire)?;
    Ok(())
}

/// `(ref_count, alt_count)` out of the genotype's two alleles; `(-1, -1)`
/// for a missing call.
fn allele_counts(gt: &[u8]) -> (i8, i8) {
    match code_any_diploid(gt) {
        Some((a1, a2, _)) => {
            let ref_count = i8::from(a1 == 0) + i8::from(a2 == 0);
            (ref_count, 2 - ref_count)
        }
        None => (-1, -1),
    }
}
