//! Population-genetics algorithm cores: Hardy-Weinberg exact test,
//! inbreeding coefficient F, pairwise r^2 linkage disequilibrium,
//! multi-allelic splitting, and indel normalization.

mod error;
mod hwe;
mod inbreeding;
mod indel;
mod ld;
mod splitter;

pub use error::AlgoError;
pub use hwe::hwe_exact_p;
pub use inbreeding::{InbreedingAccumulator, InbreedingFreqMode, InbreedingGenotypeMode, InbreedingResult};
pub use indel::{trim_indel, TrimResult};
pub use ld::{full_matrix, pairwise_r2, LdPairResult, LdVariant, StreamingLd, VariantKey, DEFAULT_WINDOW};
pub use splitter::split_multiallelic;
