use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use gzp::deflate::Bgzf;
use gzp::par::decompress::ParDecompressBuilder;

use crate::error::MmapError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Peek the first two bytes of `path` to decide whether it is gzip/BGZF
/// compressed (detected by the magic bytes `1f 8b`).
pub fn is_gzip_compressed(path: &Path) -> Result<bool, MmapError> {
    let mut file = File::open(path).map_err(MmapError::Open)?;
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == GZIP_MAGIC),
        // Files shorter than 2 bytes (including empty files) are not gzip.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(MmapError::Open(e)),
    }
}

/// Decompress a gzip or (multi-member) BGZF stream with bounded memory —
/// BGZF block boundaries are not exposed, and multi-member concatenation
/// (ordinary gzip semantics) is handled transparently by the decompressor.
///
/// `threads` controls the decompressor's internal worker count; `0` lets
/// `gzp` pick based on available parallelism.
pub fn stream_gzip(path: &Path, threads: usize) -> Result<BufReader<Box<dyn Read + Send>>, MmapError> {
    let file = File::open(path).map_err(MmapError::Open)?;
    let decompressor = ParDecompressBuilder::<Bgzf>::new()
        .maybe_num_threads(threads)
        .maybe_par_from_reader(file);
    Ok(BufReader::with_capacity(64 * 1024, Box::new(decompressor)))
}

/// A line source that behaves identically whether it's reading gzip/BGZF or
/// the standard-input fallback path. The stdin path is used when the input
/// is a pipe and mmap isn't available, and is always strictly sequential.
pub struct StreamLines<'a, R: BufRead> {
    reader: &'a mut R,
    buf: Vec<u8>,
}

impl<'a, R: BufRead> StreamLines<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self { reader, buf: Vec::new() }
    }

    /// Read the next line, trimming the `\n`/`\r\n` terminator. Returns
    /// `Ok(None)` at EOF. Errors are surfaced here, after the final read,
    /// its failure policy.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>, MmapError> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).map_err(MmapError::Decompress)?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(&self.buf[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_gzip_magic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x1f, 0x8b, 0x08, 0x00]).unwrap();
        assert!(is_gzip_compressed(file.path()).unwrap());
    }

    #[test]
    fn detects_plain_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        assert!(!is_gzip_compressed(file.path()).unwrap());
    }

    #[test]
    fn short_file_is_not_gzip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a").unwrap();
        assert!(!is_gzip_compressed(file.path()).unwrap());
    }

    #[test]
    fn stream_lines_strips_terminators() {
        let data: &[u8] = b"a\r\nbb\nccc";
        let mut reader = BufReader::new(data);
        let mut lines = StreamLines::new(&mut reader);
        assert_eq!(lines.next_line().unwrap(), Some(b"a".as_slice()));
        assert_eq!(lines.next_line().unwrap(), Some(b"bb".as_slice()));
        assert_eq!(lines.next_line().unwrap(), Some(b"ccc".as_slice()));
        assert_eq!(lines.next_line().unwrap(), None);
    }
}
