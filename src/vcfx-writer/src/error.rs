use thiserror::Error;

/// The writer never fails silently: `write()`/`flush()` errors on the
/// underlying sink are always surfaced, never swallowed.
#[derive(Error, Debug)]
pub enum WriterError {
    #[error("failed to write output")]
    Write(#[source] std::io::Error),

    #[error("failed to flush output")]
    Flush(#[source] std::io::Error),
}
