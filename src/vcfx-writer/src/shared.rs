use std::io::Write;

use parking_lot::Mutex;

use crate::error::WriterError;

/// When multiple threads share an output fd, a mutex serializes the write.
/// Used by tools that funnel several worker threads' finished buffers into
/// one sink (e.g. progress reporting on a shared stderr handle).
pub struct SharedSink<W: Write> {
    inner: Mutex<W>,
}

impl<W: Write> SharedSink<W> {
    pub fn new(sink: W) -> Self {
        Self { inner: Mutex::new(sink) }
    }

    pub fn write_all(&self, bytes: &[u8]) -> Result<(), WriterError> {
        self.inner.lock().write_all(bytes).map_err(WriterError::Write)
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn serializes_writes_from_multiple_threads() {
        let sink = SharedSink::new(Vec::new());
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| sink.write_all(b"line\n").unwrap());
            }
        });
        let out = sink.into_inner();
        assert_eq!(out.len(), 8 * 5);
    }
}
