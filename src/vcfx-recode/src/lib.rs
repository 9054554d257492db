//! Subfield recoder.
//!
//! Projects `INFO`/`FORMAT` value vectors onto a single chosen ALT allele
//! when splitting a multi-allelic variant into biallelic records, and
//! relabels `GT` accordingly.

mod error;
mod recode;

pub use error::RecodeError;
pub use recode::{recode_gt, recode_info, RecodeMode};
