//! `vcfx-ld-calc`: pairwise r² linkage disequilibrium, streaming sliding
//! window or full matrix.
//!
//! Both modes need more than one line of lookback (streaming keeps a
//! window, matrix needs every variant before it can compute anything), so
//! this tool walks `Input::lines()` sequentially rather than through the
//! chunked parallel driver.

use clap::{Parser, ValueEnum};
use serde::Serialize;

use vcfx_algo::{full_matrix, LdVariant, StreamingLd, VariantKey, DEFAULT_WINDOW};
use vcfx_cli::CommonArgs;
use vcfx_genotype::code_diploid_biallelic_collapsed;
use vcfx_mmap::Input;
use vcfx_tokenizer::{parse_variant_line, sample_column, sample_starts, split_subfields, HeaderDeclarations, SampleIndex};

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-ld-calc", version, disable_version_flag = true, about = "Compute pairwise r^2 linkage disequilibrium")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long, value_enum, default_value_t = Mode::Streaming)]
    mode: Mode,

    /// Streaming mode sliding window size (most recent N variants).
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Minimum r^2 to emit a streaming pair.
    #[arg(long, default_value_t = 0.0)]
    threshold: f64,

    /// Skip streaming pairs whose physical distance (bp) exceeds this.
    #[arg(long)]
    max_distance: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, PartialEq, Eq)]
enum Mode {
    Streaming,
    Matrix,
}

fn main() {
    let cli = Cli::parse();
    cli.common.init_logger();
    CommonArgs::log_args(&cli);
    if !(0.0..=1.0).contains(&cli.threshold) {
        eprintln!("error: --threshold must be within [0,1]");
        std::process::exit(1);
    }
    let mode = cli.mode;
    let window = cli.window;
    let threshold = cli.threshold;
    let max_distance = cli.max_distance;
    vcfx_cli::run_tool(move || run(cli.common.input.as_deref(), cli.common.threads, mode, window, threshold, max_distance));
}

fn run(
    input_path: Option<&std::path::Path>,
    threads: usize,
    mode: Mode,
    window: usize,
    threshold: f64,
    max_distance: Option<u64>,
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

    match mode {
        Mode::Streaming => run_streaming(&mut lines, n, window, threshold, max_distance),
        Mode::Matrix => run_matrix(&mut lines, n),
    }
}

fn read_variant(line: &[u8], n: usize) -> Option<LdVariant> {
    let record = match parse_variant_line(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("skipping malformed line: {e}");
            return None;
        }
    };
    let format = record.format?;
    let format_keys = split_subfields(format, b':');
    let gt_idx = format_keys.iter().position(|&k| k == b"GT")?;

    let chrom = String::from_utf8_lossy(record.chrom).into_owned();
    let id = String::from_utf8_lossy(record.id).into_owned();
    let pos: u64 = std::str::from_utf8(record.pos).ok()?.parse().ok()?;

    let starts = sample_starts(record.samples_region, n);
    let mut codes = Vec::with_capacity(n);
    for i in 0..n {
        let col = sample_column(record.samples_region, &starts, i);
        let subfields = split_subfields(col, b':');
        let gt = subfields.get(gt_idx).copied().unwrap_or(b".");
        codes.push(code_diploid_biallelic_collapsed(gt));
    }
    Some(LdVariant { key: VariantKey { chrom, pos, id }, codes })
}

fn run_streaming(
    lines: &mut vcfx_mmap::LineSource<'_>,
    n: usize,
    window: usize,
    threshold: f64,
    max_distance: Option<u64>,
) -> anyhow::Result<()> {
    println!("#VAR1_CHROM\tVAR1_POS\tVAR1_ID\tVAR2_CHROM\tVAR2_POS\tVAR2_ID\tR2");
    let mut ld = StreamingLd::new(window, threshold, max_distance);
    loop {
        match lines.next_line()? {
            None => break,
            Some(line) => {
                if line.is_empty() {
                    continue;
                }
                let Some(variant) = read_variant(line, n) else { continue };
                for pair in ld.push(variant) {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        pair.var1.chrom,
                        pair.var1.pos,
                        pair.var1.id,
                        pair.var2.chrom,
                        pair.var2.pos,
                        pair.var2.id,
                        vcfx_writer::format_double(pair.r2)
                    );
                }
            }
        }
    }
    Ok(())
}

fn run_matrix(lines: &mut vcfx_mmap::LineSource<'_>, n: usize) -> anyhow::Result<()> {
    let mut variants = Vec::new();
    loop {
        match lines.next_line()? {
            None => break,
            Some(line) => {
                if line.is_empty() {
                    continue;
                }
                if let Some(variant) = read_variant(line, n) {
                    variants.push(variant);
                }
            }
        }
    }

    let matrix = full_matrix(&variants);
    println!("#LD_MATRIX_START");
    for row in &matrix {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
        println!("{}", cells.join("\t"));
    }
    println!("#LD_MATRIX_END");
    Ok(())
}
