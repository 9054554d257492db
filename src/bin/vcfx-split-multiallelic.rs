//! `vcfx-split-multiallelic`: splits multi-allelic records into one
//! biallelic record per ALT allele.
//!
//! Unlike the other tool adapters this one re-emits the original header
//! verbatim before its transformed body, so it talks to `vcfx-parallel`'s
//! lower-level `parse_header`/`ParallelDriver` directly rather than
//! `run_over_input`, which has no header-echo support.

use std::io::Write;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use vcfx_algo::split_multiallelic;
use vcfx_cli::CommonArgs;
use vcfx_mmap::Input;
use vcfx_parallel::{parse_header, ParallelDriver, ParallelError};
use vcfx_recode::RecodeMode;
use vcfx_tokenizer::parse_variant_line;
use vcfx_writer::ChunkWriter;

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-split-multiallelic", version, disable_version_flag = true, about = "Split multi-allelic VCF records into one biallelic record per ALT")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Fail on a Number=A/R/G subfield whose value count doesn't match its
    /// declared length, instead of recoding it to `.`.
    #[arg(long, value_enum, default_value_t = Mode::Tolerant)]
    mode: Mode,
}

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, PartialEq, Eq)]
enum Mode {
    Tolerant,
    Strict,
}

impl From<Mode> for RecodeMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Tolerant => RecodeMode::Tolerant,
            Mode::Strict => RecodeMode::Strict,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    cli.common.init_logger();
    CommonArgs::log_args(&cli);
    let mode = RecodeMode::from(cli.mode);
    vcfx_cli::run_tool(|| run(cli.common.input.as_deref(), cli.common.threads, mode));
}

fn run(input_path: Option<&std::path::Path>, threads: usize, mode: RecodeMode) -> anyhow::Result<()> {
    let mut input = Input::open(input_path, threads)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(bytes) = input.as_mapped_bytes() {
        let header = parse_header(bytes)?;
        out.write_all(&bytes[..header.data_start])?;
        let sample_count = header.samples.len();
        let driver = ParallelDriver::new(threads);
        let outputs = driver.run(bytes, &header, |line| transform_line(line, &header.declarations, sample_count, mode))?;
        for chunk in outputs {
            out.write_all(&chunk)?;
        }
    } else {
        let mut lines = input.lines();
        let mut declarations = vcfx_tokenizer::HeaderDeclarations::new();
        let samples = loop {
            match lines.next_line()? {
                None => return Err(ParallelError::MissingChromHeader.into()),
                Some(line) => {
                    out.write_all(line)?;
                    out.write_all(b"\n")?;
                    if line.starts_with(b"#CHROM") {
                        break vcfx_tokenizer::SampleIndex::from_chrom_line(line)?;
                    }
                    if line.starts_with(b"##") {
                        declarations.observe(line);
                    } else if !line.starts_with(b"#") {
                        return Err(ParallelError::MissingChromHeader.into());
                    }
                }
            }
        };
        let sample_count = samples.len();
        let mut writer = ChunkWriter::new(&mut out);
        loop {
            match lines.next_line()? {
                None => break,
                Some(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(bytes) = transform_line(line, &declarations, sample_count, mode)? {
                        writer.write(&bytes)?;
                    }
                }
            }
        }
        writer.flush()?;
    }

    Ok(())
}

fn transform_line(
    line: &[u8],
    declarations: &vcfx_tokenizer::HeaderDeclarations,
    sample_count: usize,
    mode: RecodeMode,
) -> Result<Option<Vec<u8>>, ParallelError> {
    let record = match parse_variant_line(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("skipping malformed line: {e}");
            return Ok(None);
        }
    };
    let lines = split_multiallelic(&record, declarations, sample_count, mode).map_err(|e| ParallelError::Fatal(e.to_string()))?;
    let mut out = Vec::new();
    for l in lines {
        out.extend_from_slice(&l);
        out.push(b'\n');
    }
    Ok(Some(out))
}
