//! Field tokenizer.
//!
//! Splits a raw VCF line into its fixed columns and sample region without
//! copying, and tracks the header-declared cardinality (`Number=`) and
//! sample ordering needed by the recoder and algorithm cores downstream.

mod error;
mod header;
mod record;
mod sample_index;

pub use error::TokenizeError;
pub use header::{parse_header_decl, FieldDecl, HeaderDeclarations, Number, Scope};
pub use record::{parse_variant_line, sample_column, sample_starts, split_subfields, VariantRecord};
pub use sample_index::SampleIndex;
