//! `vcfx-indel-normalize`: reference-free indel normalization.
//!
//! Like `vcfx-split-multiallelic`, this re-emits the original header
//! verbatim and so drives `vcfx-parallel`'s `parse_header`/`ParallelDriver`
//! directly instead of `run_over_input`.

use std::io::Write;

use clap::Parser;
use serde::Serialize;

use vcfx_algo::trim_indel;
use vcfx_cli::CommonArgs;
use vcfx_mmap::Input;
use vcfx_parallel::{parse_header, ParallelDriver, ParallelError};
use vcfx_tokenizer::{parse_variant_line, VariantRecord};
use vcfx_writer::ChunkWriter;

#[derive(Parser, Debug, Serialize)]
#[command(name = "vcfx-indel-normalize", version, disable_version_flag = true, about = "Reference-free trimming of REF/ALT indel representations")]
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
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(bytes) = input.as_mapped_bytes() {
        let header = parse_header(bytes)?;
        out.write_all(&bytes[..header.data_start])?;
        let driver = ParallelDriver::new(threads);
        let outputs = driver.run(bytes, &header, transform_line)?;
        for chunk in outputs {
            out.write_all(&chunk)?;
        }
    } else {
        let mut lines = input.lines();
        loop {
            match lines.next_line()? {
                None => return Err(ParallelError::MissingChromHeader.into()),
                Some(line) => {
                    out.write_all(line)?;
                    out.write_all(b"\n")?;
                    if line.starts_with(b"#CHROM") {
                        break;
                    }
                    if !line.starts_with(b"#") {
                        return Err(ParallelError::MissingChromHeader.into());
                    }
                }
            }
        }
        let mut writer = ChunkWriter::new(&mut out);
        loop {
            match lines.next_line()? {
                None => break,
                Some(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(bytes) = transform_line(line)? {
                        writer.write(&bytes)?;
                    }
                }
            }
        }
        writer.flush()?;
    }

    Ok(())
}

fn transform_line(line: &[u8]) -> Result<Option<Vec<u8>>, ParallelError> {
    let record = match parse_variant_line(line) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("skipping malformed line: {e}");
            return Ok(None);
        }
    };
    let Ok(pos) = std::str::from_utf8(record.pos).unwrap_or("").parse::<u64>() else {
        log::warn!("skipping line with unparseable POS");
        return Ok(None);
    };

    let mut out = Vec::new();
    for alt in record.alt_alleles() {
        let result = trim_indel(pos, record.reference, alt);
        out.extend_from_slice(&render(&record, &result));
        out.push(b'\n');
    }
    if record.alt_count() == 0 {
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    Ok(Some(out))
}

fn render(record: &VariantRecord, result: &vcfx_algo::TrimResult) -> Vec<u8> {
    let mut line = Vec::new();
    line.extend_from_slice(record.chrom);
    line.push(b'\t');
    line.extend_from_slice(result.pos.to_string().as_bytes());
    line.push(b'\t');
    line.extend_from_slice(record.id);
    line.push(b'\t');
    line.extend_from_slice(&result.reference);
    line.push(b'\t');
    line.extend_from_slice(&result.alt);
    line.push(b'\t');
    line.extend_from_slice(record.qual);
    line.push(b'\t');
    line.extend_from_slice(record.filter);
    line.push(b'\t');
    line.extend_from_slice(record.info);
    if let Some(format) = record.format {
        line.push(b'\t');
        line.extend_from_slice(format);
        if !record.samples_region.is_empty() {
            line.push(b'\t');
            line.extend_from_slice(record.samples_region);
        }
    }
    line
}
