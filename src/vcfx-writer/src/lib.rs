//! Output writer.
//!
//! Thread-local buffered output with a fast-path double formatter and an
//! optional shared-fd mutex for tools where several workers write to the
//! same file descriptor.

mod buffer;
mod error;
mod shared;

pub use buffer::{format_double, ChunkWriter};
pub use error::WriterError;
pub use shared::SharedSink;
