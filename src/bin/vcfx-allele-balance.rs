//! `vcfx-allele-balance`: per-sample, per-variant allele balance.
//!
//! Allele balance measures how evenly a diploid call splits between the
//! reference and alternate allele, derived from the `GT` call itself (no
//! read-depth subfield is required): heterozygous calls are perfectly
//! balanced (`1.0`), homozygous calls (ref or alt) are maximally unbalanced
//! (`0.0`), and missing genotypes report `NA`.

use clap::Parser;
use serde::Serialize;

use vcfx_cli::CommonArgs;
use vcfx_genotype::code_any_diploid;
use vcfx_mmap::Input;
use vcfx_parallel::ParallelError;
use vcfx_tokenizer::{parse_variant_line, sample_column, sample_starts, split_subfields, TokenizeError};

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-allele-balance", version, disable_version_flag = true, about = "Compute per-sample allele balance from GT calls")]
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
    println!("CHROM\tPOS\tID\tREF\tALT\tSample\tAlleleBalance");

    vcfx_parallel::run_over_input(
        &mut input,
        threads,
        |line, header| {
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
            for (i, name) in header.samples.names().iter().enumerate() {
                let col = sample_column(record.samples_region, &starts, i);
                let subfields = split_subfields(col, b':');
                let gt = subfields.get(gt_idx).copied().unwrap_or(b".");
                let balance = allele_balance(gt);

                out.extend_from_slice(record.chrom);
                out.push(b'\t');
                out.extend_from_slice(record.pos);
                out.push(b'\t');
                out.extend_from_slice(record.id);
                out.push(b'\t');
                out.extend_from_slice(record.reference);
                out.push(b'\t');
                out.extend_from_slice(record.alt);
                out.push(b'\t');
                out.extend_from_slice(name.as_bytes());
                out.push(b'\t');
                match balance {
                    Some(v) => out.extend_from_slice(vcfx_writer::format_double(v).as_bytes()),
                    None => out.extend_from_slice(b"NA"),
                }
                out.push(b'\n');
            }
            Ok(Some(out))
        },
        std::io::stdout(),
    )?;

    Ok(())
}

/// `2 * min(ref_count, alt_count) / 2`: `1.0` for a balanced heterozygous
/// call, `0.0` for any homozygous call (ref or alt), `None` if either
/// allele is missing.
fn allele_balance(gt: &[u8]) -> Option<f64> {
    let (a1, a2, _phased) = code_any_diploid(gt)?;
    let ref_count = i64::from(a1 == 0) + i64::from(a2 == 0);
    let alt_count = 2 - ref_count;
    Some(2.0 * ref_count.min(alt_count) as f64 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn het_is_perfectly_balanced() {
        assert_eq!(allele_balance(b"0/1"), Some(1.0));
    }

    #[test]
    fn hom_alt_is_unbalanced() {
        assert_eq!(allele_balance(b"1/1"), Some(0.0));
    }

    #[test]
    fn hom_ref_is_unbalanced() {
        assert_eq!(allele_balance(b"0/0"), Some(0.0));
    }

    #[test]
    fn missing_is_none() {
        assert_eq!(allele_balance(b"./."), None);
    }
}
