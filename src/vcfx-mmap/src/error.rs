use thiserror::Error;

#[derive(Error, Debug)]
pub enum MmapError {
    #[error("No such file: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Permission denied while opening {0}")]
    PermissionDenied(std::path::PathBuf),

    #[error("Failed to open file")]
    Open(#[source] std::io::Error),

    #[error("Failed to memory-map file")]
    Map(#[source] std::io::Error),

    #[error("Failed to advise memory mapping")]
    Advise(#[source] std::io::Error),

    #[error("Failed to decompress gzip/BGZF stream")]
    Decompress(#[source] std::io::Error),
}
