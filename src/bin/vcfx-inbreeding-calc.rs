//! `vcfx-inbreeding-calc`: per-sample inbreeding coefficient F.
//!
//! The accumulator carries state across the whole file (`obsHet`/`expHet`
//! per sample), so this tool always walks the input sequentially via
//! `Input::lines()` rather than the chunked parallel driver — one pass
//! regardless of whether the input happened to be mmap'able.

use clap::{Parser, ValueEnum};
use serde::Serialize;

use vcfx_algo::{InbreedingAccumulator, InbreedingFreqMode, InbreedingGenotypeMode, InbreedingResult};
use vcfx_cli::CommonArgs;
use vcfx_genotype::code_diploid_biallelic_collapsed;
use vcfx_mmap::Input;
use vcfx_tokenizer::{parse_variant_line, sample_column, sample_starts, split_subfields, HeaderDeclarations, SampleIndex};

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-inbreeding-calc", version, disable_version_flag = true, about = "Compute per-sample inbreeding coefficient F from biallelic sites")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Leave-one-out (default) or a single site-wide allele frequency.
    #[arg(long, value_enum, default_value_t = FreqMode::LeaveOneOut)]
    freq_mode: FreqMode,

    /// Reserved: this tool already restricts itself to single-ALT sites, so
    /// `1/1` always decodes as the valid homAlt code `2` regardless of this
    /// flag. Kept for forward compatibility should a future mode process
    /// beyond-biallelic sites, where `genotype_mode` would then decide
    /// whether an out-of-range homozygous call (e.g. `2/2`) collapses or is
    /// treated as invalid.
    #[arg(long, value_enum, default_value_t = GenotypeMode::ReferenceFree)]
    genotype_mode: GenotypeMode,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, PartialEq, Eq)]
enum FreqMode {
    LeaveOneOut,
    Global,
}

impl From<FreqMode> for InbreedingFreqMode {
    fn from(m: FreqMode) -> Self {
        match m {
            FreqMode::LeaveOneOut => InbreedingFreqMode::LeaveOneOut,
            FreqMode::Global => InbreedingFreqMode::Global,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, PartialEq, Eq)]
enum GenotypeMode {
    ReferenceFree,
    CollapseMultiallelicHomozygous,
}

impl From<GenotypeMode> for InbreedingGenotypeMode {
    fn from(m: GenotypeMode) -> Self {
        match m {
            GenotypeMode::ReferenceFree => InbreedingGenotypeMode::ReferenceFree,
            GenotypeMode::CollapseMultiallelicHomozygous => InbreedingGenotypeMode::CollapseMultiallelicHomozygous,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    cli.common.init_logger();
    CommonArgs::log_args(&cli);
    let freq_mode = InbreedingFreqMode::from(cli.freq_mode);
    let genotype_mode = InbreedingGenotypeMode::from(cli.genotype_mode);
    vcfx_cli::run_tool(|| run(cli.common.input.as_deref(), cli.common.threads, freq_mode, genotype_mode));
}

fn run(
    input_path: Option<&std::path::Path>,
    threads: usize,
    freq_mode: InbreedingFreqMode,
    genotype_mode: InbreedingGenotypeMode,
) -> anyhow::Result<()> {
    let mut input = Input::open(input_path, threads)?;
    let mut lines = input.lines();

    let mut declarations = HeaderDeclarations::new();
    let samples = loop {
        match lines.next_line()? {
            None => anyhow::bail!("input has no #CHROM header line"),
            Some(line) => {
                if line.starts_with(b"#CHROM") {
                    break SampleIndex::from_chrom_line(line)?;
                }
                if line.starts_with(b"##") {
                    declarations.observe(line);
                } else if !line.starts_with(b"#") {
                    anyhow::bail!("input has no #CHROM header line");
                }
            }
        }
    };

    let n = samples.len();
    let mut accumulator = InbreedingAccumulator::new(n, freq_mode, genotype_mode);

    loop {
        match lines.next_line()? {
            None => break,
            Some(line) => {
                if line.is_empty() {
                    continue;
                }
                let record = match parse_variant_line(line) {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("skipping malformed line: {e}");
                        continue;
                    }
                };
                if record.alt_count() != 1 {
                    continue;
                }
                let Some(format) = record.format else { continue };
                let format_keys = split_subfields(format, b':');
                let Some(gt_idx) = format_keys.iter().position(|&k| k == b"GT") else { continue };

                let starts = sample_starts(record.samples_region, n);
                let mut codes = vec![-1i8; n];
                for i in 0..n {
                    let col = sample_column(record.samples_region, &starts, i);
                    let subfields = split_subfields(col, b':');
                    let gt = subfields.get(gt_idx).copied().unwrap_or(b".");
                    // The `alt_count() != 1` guard above already restricts every
                    // site reaching this point to a single ALT, so an
                    // equal-nonzero call here is always the valid homAlt
                    // genotype (`1/1`), never the beyond-biallelic noise
                    // (`2/2` at a site with only one declared ALT) that
                    // `genotype_mode` distinguishes; both modes must collapse
                    // it to `2`, not drop it as missing.
                    codes[i] = code_diploid_biallelic_collapsed(gt);
                }
                accumulator.add_site(&codes);
            }
        }
    }

    println!("Sample\tF");
    for (name, result) in samples.names().iter().zip(accumulator.finish()) {
        match result {
            InbreedingResult::F(v) => println!("{name}\t{}", vcfx_writer::format_double(v)),
            InbreedingResult::NotAvailable => println!("{name}\tNA"),
        }
    }

    Ok(())
}
