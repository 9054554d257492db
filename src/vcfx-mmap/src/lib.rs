//! I/O substrate.
//!
//! Provides a read-only memory-mapped view of a file, SIMD-backed byte
//! scanning (`find_tab`/`find_newline`), transparent gzip/BGZF streaming,
//! and the standard-input sequential fallback.

mod cursor;
mod error;
mod input;
mod lines;
mod mapped;
mod stream;

pub use cursor::ByteCursor;
pub use error::MmapError;
pub use input::{Input, LineSource};
pub use lines::Lines;
pub use mapped::MappedFile;
pub use stream::{is_gzip_compressed, stream_gzip, StreamLines};
