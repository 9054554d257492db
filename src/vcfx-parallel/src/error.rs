use thiserror::Error;
use vcfx_mmap::MmapError;
use vcfx_tokenizer::TokenizeError;
use vcfx_writer::WriterError;

#[derive(Error, Debug)]
pub enum ParallelError {
    #[error("input has no #CHROM header line")]
    MissingChromHeader,

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Io(#[from] MmapError),

    #[error("failed to build worker thread pool")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),

    /// Carries a tool-specific fatal condition (malformed header, invalid
    /// region syntax, ...) up through the shared driver without requiring
    /// every tool to define its own variant here.
    #[error("{0}")]
    Fatal(String),
}
