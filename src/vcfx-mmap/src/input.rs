use std::io::{BufReader, Read, Stdin};
use std::path::Path;

use crate::error::MmapError;
use crate::lines::Lines;
use crate::mapped::MappedFile;
use crate::stream::{is_gzip_compressed, stream_gzip, StreamLines};

/// Selects among the three input strategies: a memory-mapped file (the
/// fast, parallelizable path), a streamed gzip/BGZF decompression (bounded
/// memory, sequential), or standard input (sequential, used when no path
/// is given or mmap isn't available).
pub enum Input {
    Mapped(MappedFile),
    Compressed(BufReader<Box<dyn Read + Send>>),
    Stdin(BufReader<Stdin>),
}

impl Input {
    /// Open `path`, or fall back to stdin when `path` is `None`.
    pub fn open(path: Option<&Path>, decompression_threads: usize) -> Result<Self, MmapError> {
        match path {
            None => Ok(Input::Stdin(BufReader::new(std::io::stdin()))),
            Some(path) => {
                if is_gzip_compressed(path)? {
                    Ok(Input::Compressed(stream_gzip(path, decompression_threads)?))
                } else {
                    Ok(Input::Mapped(MappedFile::open(path)?))
                }
            }
        }
    }

    /// `true` when the input supports random byte-range access (and thus
    /// multi-threaded chunking); `false` for the sequential gzip/stdin paths.
    pub fn supports_parallel_chunking(&self) -> bool {
        matches!(self, Input::Mapped(_))
    }

    /// Byte-slice view, only available for the mmap path.
    pub fn as_mapped_bytes(&self) -> Option<&[u8]> {
        match self {
            Input::Mapped(m) => Some(m.as_bytes()),
            _ => None,
        }
    }

    /// Uniform borrowed-line-at-a-time view, regardless of which strategy
    /// was selected. The mmap arm borrows zero-copy slices of the mapping;
    /// the streamed arms copy one line at a time into an internal buffer —
    /// each borrowed slice is only valid for one variant processing step.
    pub fn lines(&mut self) -> LineSource<'_> {
        match self {
            Input::Mapped(m) => LineSource::Mapped(Lines::new(m.as_bytes())),
            Input::Compressed(r) => LineSource::Compressed(StreamLines::new(r)),
            Input::Stdin(r) => LineSource::Stdin(StreamLines::new(r)),
        }
    }
}

pub enum LineSource<'a> {
    Mapped(Lines<'a>),
    Compressed(StreamLines<'a, BufReader<Box<dyn Read + Send>>>),
    Stdin(StreamLines<'a, BufReader<Stdin>>),
}

impl<'a> LineSource<'a> {
    /// Fetch the next line, uniformly across all three strategies. Returns
    /// `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>, MmapError> {
        match self {
            LineSource::Mapped(lines) => Ok(lines.next()),
            LineSource::Compressed(stream) => stream.next_line(),
            LineSource::Stdin(stream) => stream.next_line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mapped_input_supports_chunking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"chr1\t1\t.\tA\tG\n").unwrap();
        let input = Input::open(Some(file.path()), 0).unwrap();
        assert!(input.supports_parallel_chunking());
    }

    #[test]
    fn gzip_input_is_sequential_only() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut enc = GzEncoder::new(&mut file, Compression::default());
            enc.write_all(b"##fileformat=VCFv4.2\n#CHROM\tPOS\n").unwrap();
            enc.finish().unwrap();
        }
        let input = Input::open(Some(file.path()), 1).unwrap();
        assert!(!input.supports_parallel_chunking());
    }

    #[test]
    fn lines_iterate_uniformly_across_strategies() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\nbb\nccc\n").unwrap();
        let mut input = Input::open(Some(file.path()), 0).unwrap();
        let mut out = Vec::new();
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().unwrap() {
            out.push(line.to_vec());
        }
        assert_eq!(out, vec![b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
    }
}
