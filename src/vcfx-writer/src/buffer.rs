use std::io::Write;

use crate::error::WriterError;

/// Thread-local buffered writer, 4 MB default capacity (tools may ask for
/// up to 16 MB), flushing at 3 MB occupancy, bypassing the buffer with a
/// direct write for payloads larger than half its capacity.
pub const DEFAULT_CAPACITY: usize = 4 * 1024 * 1024;
const FLUSH_THRESHOLD: usize = 3 * 1024 * 1024;

/// Fast `integer.6digits` formatting for finite
/// non-negative values (zero prints as `0.000000`), falling back to a
/// general `{:.6}` formatter for negative and non-finite values. Exposed
/// standalone so tool adapters can format a single double consistently
/// with [`ChunkWriter::write_double`] without needing a live buffer.
pub fn format_double(x: f64) -> String {
    if x.is_finite() && x >= 0.0 {
        let scaled = (x * 1_000_000.0).round() as u64;
        let integer = scaled / 1_000_000;
        let frac = scaled % 1_000_000;
        format!("{integer}.{frac:06}")
    } else {
        format!("{x:.6}")
    }
}

pub struct ChunkWriter<W: Write> {
    sink: W,
    buf: Vec<u8>,
    capacity: usize,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_capacity(sink, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(sink: W, capacity: usize) -> Self {
        Self { sink, buf: Vec::with_capacity(capacity), capacity }
    }

    /// `buffer.write(bytes)`: append to the buffer, bypassing it with one
    /// direct `write()` when `bytes` alone exceeds half the capacity.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        if bytes.len() > self.capacity / 2 {
            self.flush()?;
            return self.sink.write_all(bytes).map_err(WriterError::Write);
        }
        self.buf.extend_from_slice(bytes);
        self.maybe_flush()
    }

    /// `buffer.write_double(x)`: fast `integer.6digits` path for finite
    /// non-negative values (zero prints as `0.000000`); a general formatter
    /// covers negative and non-finite inputs.
    pub fn write_double(&mut self, x: f64) -> Result<(), WriterError> {
        let _ = write!(&mut self.buf, "{}", format_double(x));
        self.maybe_flush()
    }

    /// `buffer.maybe_flush()`: flush once occupancy passes 3 MB.
    pub fn maybe_flush(&mut self) -> Result<(), WriterError> {
        if self.buf.len() > FLUSH_THRESHOLD {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// `buffer.flush()`: one `write_all` syscall, then flush the sink.
    pub fn flush(&mut self) -> Result<(), WriterError> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf).map_err(WriterError::Write)?;
            self.buf.clear();
        }
        self.sink.flush().map_err(WriterError::Flush)
    }

    pub fn into_inner(mut self) -> W {
        let _ = self.flush();
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_buffers_small_payloads() {
        let mut w = ChunkWriter::new(Vec::new());
        w.write(b"chr1\t100\n").unwrap();
        assert_eq!(w.into_inner(), b"chr1\t100\n");
    }

    #[test]
    fn write_bypasses_buffer_for_large_payloads() {
        let mut w = ChunkWriter::with_capacity(Vec::new(), 16);
        let huge = vec![b'x'; 100];
        w.write(&huge).unwrap();
        assert_eq!(w.into_inner(), huge);
    }

    #[test]
    fn maybe_flush_triggers_past_threshold() {
        let mut w = ChunkWriter::with_capacity(Vec::new(), DEFAULT_CAPACITY);
        let chunk = vec![b'a'; 3 * 1024 * 1024 + 1];
        w.write(&chunk).unwrap();
        // flushed already by maybe_flush, so the live buffer is empty.
        w.write(b"tail").unwrap();
        let out = w.into_inner();
        assert_eq!(out.len(), chunk.len() + 4);
        assert!(out.ends_with(b"tail"));
    }

    #[test]
    fn write_double_fast_path_formats_six_decimals() {
        let mut w = ChunkWriter::new(Vec::new());
        w.write_double(0.0).unwrap();
        w.write_double(1.5).unwrap();
        let out = w.into_inner();
        assert_eq!(out, b"0.0000001.500000");
    }

    #[test]
    fn write_double_general_path_handles_negative_and_nonfinite() {
        let mut w = ChunkWriter::new(Vec::new());
        w.write_double(-1.5).unwrap();
        w.write_double(f64::NAN).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.starts_with("-1.500000"));
        assert!(out.ends_with("NaN"));
    }
}
