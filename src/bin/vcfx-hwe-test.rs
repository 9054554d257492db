//! `vcfx-hwe-test`: per-variant Hardy-Weinberg exact test.

use clap::Parser;
use serde::Serialize;

use vcfx_algo::hwe_exact_p;
use vcfx_cli::CommonArgs;
use vcfx_genotype::code_diploid_biallelic_collapsed;
use vcfx_mmap::Input;
use vcfx_parallel::ParallelError;
use vcfx_tokenizer::{parse_variant_line, sample_column, sample_starts, split_subfields, TokenizeError};

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-hwe-test", version, disable_version_flag = true, about = "Compute exact Hardy-Weinberg equilibrium p-values per variant")]
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
    println!("CHROM\tPOS\tID\tREF\tALT\tHWE_P");

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
            let (mut hom_ref, mut het, mut hom_alt) = (0u64, 0u64, 0u64);
            for i in 0..n {
                let col = sample_column(record.samples_region, &starts, i);
                let subfields = split_subfields(col, b':');
                let gt = subfields.get(gt_idx).copied().unwrap_or(b".");
                match code_diploid_biallelic_collapsed(gt) {
                    0 => hom_ref += 1,
                    1 => het += 1,
                    2 => hom_alt += 1,
                    _ => {}
                }
            }

            let p = hwe_exact_p(hom_ref, het, hom_alt);
            let mut out = Vec::new();
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
            out.extend_from_slice(vcfx_writer::format_double(p).as_bytes());
            out.push(b'\n');
            Ok(Some(out))
        },
        std::io::stdout(),
    )?;

    Ok(())
}
