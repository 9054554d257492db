use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AlgoError {
    #[error("LD threshold {0} is outside [0,1]")]
    InvalidThreshold(f64),

    #[error("invalid region syntax: {0}")]
    InvalidRegion(String),

    #[error("inbreeding calculation requires a biallelic site")]
    NotBiallelic,
}
