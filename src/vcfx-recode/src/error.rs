use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecodeError {
    #[error("subfield value vector length does not match its declared Number layout")]
    LengthMismatch,
}
