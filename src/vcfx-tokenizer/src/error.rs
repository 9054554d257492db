use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Line has fewer than 8 tab-separated fields")]
    TooFewFields,

    #[error("VCF field contains invalid UTF-8 data")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    #[error("Missing #CHROM header line before data")]
    MissingChromHeader,

    #[error("Duplicate sample name in #CHROM line: {0}")]
    DuplicateSample(String),

    #[error("Unknown sample name requested: {0}")]
    UnknownSample(String),
}
