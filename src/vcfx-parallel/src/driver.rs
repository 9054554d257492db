use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use vcfx_mmap::ByteCursor;
use vcfx_writer::ChunkWriter;

use crate::error::ParallelError;
use crate::header::ParsedHeader;

const MB: usize = 1024 * 1024;
const CHUNK_UNIT: usize = 10 * MB;
const SMALL_INPUT: usize = 10 * MB;
const MID_INPUT: usize = 100 * MB;
const MID_INPUT_MAX_K: usize = 4;

/// `K = min(user_K, hw_concurrency, D/10MB_rounded)`,
/// with `D < 10MB => K = 1` and `D < 100MB => K <= 4`.
pub fn choose_k(data_len: usize, user_k: usize, hw_concurrency: usize) -> usize {
    if data_len < SMALL_INPUT {
        return 1;
    }
    let by_size = (data_len / CHUNK_UNIT).max(1);
    let mut k = by_size.min(hw_concurrency.max(1));
    if user_k > 0 {
        k = k.min(user_k);
    }
    if data_len < MID_INPUT {
        k = k.min(MID_INPUT_MAX_K);
    }
    k.max(1)
}

/// `K+1` chunk boundaries over `data[data_start..]`,
/// each boundary falling immediately after a line terminator so every
/// chunk is a union of whole lines.
pub fn chunk_boundaries(data: &[u8], data_start: usize, k: usize) -> Vec<usize> {
    let file_end = data.len();
    let d = file_end.saturating_sub(data_start);
    let mut boundaries = Vec::with_capacity(k + 1);
    boundaries.push(data_start);
    for i in 1..k {
        let target = (data_start + (i * d) / k).min(file_end);
        let nl = ByteCursor::find_newline(data, target);
        let after = if nl < file_end { nl + 1 } else { file_end };
        let prev = *boundaries.last().unwrap();
        boundaries.push(after.max(prev));
    }
    boundaries.push(file_end);
    boundaries
}

/// Fans a variant-line transform out across `K` byte-range chunks of a
/// mapped VCF, each chunk processed by an independent thread-local
/// `ChunkWriter`, and hands the caller the finished buffers back in
/// ascending chunk order so concatenating them reproduces input line order
/// exactly.
pub struct ParallelDriver {
    requested_threads: usize,
}

impl ParallelDriver {
    /// `requested_threads = 0` means auto (use hardware concurrency).
    pub fn new(requested_threads: usize) -> Self {
        Self { requested_threads }
    }

    /// Runs `process_line` over every line in `data[header.data_start..]`.
    ///
    /// `process_line` returns:
    /// - `Ok(Some(bytes))` to append `bytes` to the chunk's output buffer,
    /// - `Ok(None)` to skip the line (a recoverable-per-line case the
    ///   caller has already logged a warning for),
    /// - `Err` to signal a fatal condition; the shared abort flag is set
    ///   and remaining chunks stop processing new lines.
    pub fn run<F>(&self, data: &[u8], header: &ParsedHeader, process_line: F) -> Result<Vec<Vec<u8>>, ParallelError>
    where
        F: Fn(&[u8]) -> Result<Option<Vec<u8>>, ParallelError> + Sync,
    {
        let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let data_len = data.len().saturating_sub(header.data_start);
        let k = choose_k(data_len, self.requested_threads, hw);
        let boundaries = chunk_boundaries(data, header.data_start, k);
        let ranges: Vec<(usize, usize)> = boundaries.windows(2).map(|w| (w[0], w[1])).collect();

        let abort = Arc::new(AtomicBool::new(false));
        let pool = ThreadPoolBuilder::new().num_threads(k.max(1)).build().map_err(ParallelError::ThreadPool)?;

        let results: Vec<Result<Vec<u8>, ParallelError>> = pool.install(|| {
            ranges
                .par_iter()
                .map(|&(start, end)| process_chunk(data, start, end, &abort, &process_line))
                .collect()
        });

        let mut outputs = Vec::with_capacity(results.len());
        for result in results {
            outputs.push(result?);
        }
        Ok(outputs)
    }
}

fn process_chunk<F>(data: &[u8], start: usize, end: usize, abort: &AtomicBool, process_line: &F) -> Result<Vec<u8>, ParallelError>
where
    F: Fn(&[u8]) -> Result<Option<Vec<u8>>, ParallelError> + Sync,
{
    let mut writer = ChunkWriter::new(Vec::new());
    let mut pos = start;
    while pos < end {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        let nl = ByteCursor::find_newline(data, pos);
        let line_end = nl.min(end);
        let mut trimmed_end = line_end;
        if trimmed_end > pos && data[trimmed_end - 1] == b'\r' {
            trimmed_end -= 1;
        }
        let line = &data[pos..trimmed_end];
        pos = if nl < end { nl + 1 } else { end };

        if line.is_empty() {
            continue;
        }
        match process_line(line) {
            Ok(Some(bytes)) => writer.write(&bytes)?,
            Ok(None) => {}
            Err(e) => {
                abort.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }
    }
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_k_forces_single_chunk_below_10mb() {
        assert_eq!(choose_k(5 * MB, 8, 8), 1);
    }

    #[test]
    fn choose_k_caps_at_four_below_100mb() {
        assert_eq!(choose_k(50 * MB, 16, 16), 4);
    }

    #[test]
    fn choose_k_respects_user_request() {
        assert_eq!(choose_k(500 * MB, 2, 16), 2);
    }

    #[test]
    fn choose_k_respects_hardware_concurrency() {
        assert_eq!(choose_k(500 * MB, 0, 3), 3);
    }

    #[test]
    fn chunk_boundaries_land_on_line_starts() {
        let data = b"aaaa\nbbbb\ncccc\ndddd\n";
        let boundaries = chunk_boundaries(data, 0, 4);
        assert_eq!(boundaries[0], 0);
        assert_eq!(*boundaries.last().unwrap(), data.len());
        for i in 1..boundaries.len() - 1 {
            let b = boundaries[i];
            assert!(b == 0 || b == data.len() || data[b - 1] == b'\n');
        }
    }

    #[test]
    fn run_preserves_line_order_across_chunks() {
        let data: Vec<u8> = (0..40).map(|i| format!("line{i}\n")).collect::<Vec<_>>().join("").into_bytes();
        let header = ParsedHeader {
            declarations: vcfx_tokenizer::HeaderDeclarations::new(),
            samples: vcfx_tokenizer::SampleIndex::from_chrom_line(b"#CHROM\tPOS").unwrap(),
            data_start: 0,
        };
        let driver = ParallelDriver::new(4);
        let outputs = driver
            .run(&data, &header, |line| {
                let mut out = line.to_vec();
                out.push(b'\n');
                Ok(Some(out))
            })
            .unwrap();
        let joined: Vec<u8> = outputs.into_iter().flatten().collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn run_propagates_fatal_error() {
        let data = b"good\nbad\ngood\n".to_vec();
        let header = ParsedHeader {
            declarations: vcfx_tokenizer::HeaderDeclarations::new(),
            samples: vcfx_tokenizer::SampleIndex::from_chrom_line(b"#CHROM\tPOS").unwrap(),
            data_start: 0,
        };
        let driver = ParallelDriver::new(1);
        let result = driver.run(&data, &header, |line| {
            if line == b"bad" {
                Err(ParallelError::Fatal("bad line".into()))
            } else {
                Ok(Some(line.to_vec()))
            }
        });
        assert!(result.is_err());
    }
}
