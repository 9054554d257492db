//! Genotype codec.
//!
//! Decodes the `GT` subfield of a VCF sample column into the small
//! integer encodings the population-genetics cores (`vcfx-algo`) consume.
//! Allele separators (`/` unphased, `|` phased) are unified at the split
//! site rather than via a string replace, mirroring the byte-classification
//! style used for genotype parsing elsewhere in this corpus.

/// Outcome of [`code_diploid_biallelic`]. `Missing` covers the literal
/// missing genotype, non-biallelic calls, and equal-nonzero homozygous-alt
/// calls — all three collapse to the same `-1` wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeCode {
    HomRef,
    Het,
    Missing,
}

impl GenotypeCode {
    pub fn as_i8(self) -> i8 {
        match self {
            GenotypeCode::HomRef => 0,
            GenotypeCode::Het => 1,
            GenotypeCode::Missing => -1,
        }
    }
}

fn parse_allele_token(tok: &[u8]) -> Option<u32> {
    if tok.is_empty() || tok == b"." {
        return None;
    }
    let mut value: u32 = 0;
    for &b in tok {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(value)
}

/// Splits a `GT` field into its two allele tokens and the phasing flag.
/// Returns `None` for haploid calls (no separator) or anything with more
/// than one separator (not diploid).
fn split_diploid(gt_slice: &[u8]) -> Option<(&[u8], &[u8], bool)> {
    let sep_pos = gt_slice.iter().position(|&b| b == b'/' || b == b'|')?;
    let phased = gt_slice[sep_pos] == b'|';
    let first = &gt_slice[..sep_pos];
    let rest = &gt_slice[sep_pos + 1..];
    if rest.iter().any(|&b| b == b'/' || b == b'|') {
        return None;
    }
    Some((first, rest, phased))
}

fn classify_diploid_biallelic(gt_slice: &[u8]) -> GenotypeCode {
    let Some((a, b, _)) = split_diploid(gt_slice) else {
        return GenotypeCode::Missing;
    };
    let (a, b) = match (parse_allele_token(a), parse_allele_token(b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return GenotypeCode::Missing,
    };
    match (a, b) {
        (0, 0) => GenotypeCode::HomRef,
        (0, x) if x > 0 => GenotypeCode::Het,
        (x, 0) if x > 0 => GenotypeCode::Het,
        _ => GenotypeCode::Missing, // equal-nonzero or distinct-nonzero: not biallelic
    }
}

/// `code_diploid_biallelic(gt_slice) -> i8`.
pub fn code_diploid_biallelic(gt_slice: &[u8]) -> i8 {
    classify_diploid_biallelic(gt_slice).as_i8()
}

/// Inbreeding-tool variant: an equal-nonzero homozygous-alt call collapses
/// to `2` (an explicit allele-count code) instead of folding into the
/// generic `-1` missing/non-biallelic bucket. Opt-in only — see
/// `InbreedingGenotypeMode` in `vcfx-algo` and the Open Question
/// resolution in `DESIGN.md`.
pub fn code_diploid_biallelic_collapsed(gt_slice: &[u8]) -> i8 {
    let Some((a, b, _)) = split_diploid(gt_slice) else {
        return -1;
    };
    let (a, b) = match (parse_allele_token(a), parse_allele_token(b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return -1,
    };
    match (a, b) {
        (0, 0) => 0,
        (0, x) if x > 0 => 1,
        (x, 0) if x > 0 => 1,
        (x, y) if x == y && x > 0 => 2,
        _ => -1,
    }
}

/// `code_any_diploid(gt_slice) -> (a1, a2, phased) | missing`.
/// Haploid calls (no separator) are reported verbatim: the single allele
/// fills both slots and `phased` is `false`.
pub fn code_any_diploid(gt_slice: &[u8]) -> Option<(i64, i64, bool)> {
    match split_diploid(gt_slice) {
        Some((a, b, phased)) => {
            let a1 = parse_allele_token(a)?;
            let a2 = parse_allele_token(b)?;
            Some((i64::from(a1), i64::from(a2), phased))
        }
        None => {
            let a1 = parse_allele_token(gt_slice)?;
            Some((i64::from(a1), i64::from(a1), false))
        }
    }
}

/// `allele_sum(gt_slice) -> i32 | missing`.
pub fn allele_sum(gt_slice: &[u8]) -> Option<i64> {
    code_any_diploid(gt_slice).map(|(a1, a2, _)| a1 + a2)
}

/// `is_missing(gt_slice) -> bool`: any allele token is `.`.
pub fn is_missing(gt_slice: &[u8]) -> bool {
    gt_slice.split(|&b| b == b'/' || b == b'|').any(|tok| tok.is_empty() || tok == b".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hom_ref_is_zero() {
        assert_eq!(code_diploid_biallelic(b"0/0"), 0);
        assert_eq!(code_diploid_biallelic(b"0|0"), 0);
    }

    #[test]
    fn het_is_one_regardless_of_order() {
        assert_eq!(code_diploid_biallelic(b"0/1"), 1);
        assert_eq!(code_diploid_biallelic(b"1/0"), 1);
        assert_eq!(code_diploid_biallelic(b"0|1"), 1);
    }

    #[test]
    fn homozygous_alt_and_distinct_both_fold_to_missing() {
        assert_eq!(code_diploid_biallelic(b"1/1"), -1);
        assert_eq!(code_diploid_biallelic(b"1/2"), -1);
    }

    #[test]
    fn missing_forms() {
        assert_eq!(code_diploid_biallelic(b"./."), -1);
        assert_eq!(code_diploid_biallelic(b".|."), -1);
        assert_eq!(code_diploid_biallelic(b"."), -1);
    }

    #[test]
    fn haploid_is_missing_for_biallelic_codec() {
        assert_eq!(code_diploid_biallelic(b"1"), -1);
    }

    #[test]
    fn collapsed_codec_maps_homozygous_alt_to_two() {
        assert_eq!(code_diploid_biallelic_collapsed(b"1/1"), 2);
        assert_eq!(code_diploid_biallelic_collapsed(b"2/2"), 2);
        assert_eq!(code_diploid_biallelic_collapsed(b"0/0"), 0);
        assert_eq!(code_diploid_biallelic_collapsed(b"0/1"), 1);
        assert_eq!(code_diploid_biallelic_collapsed(b"1/2"), -1);
    }

    #[test]
    fn any_diploid_preserves_multiallelic_and_phase() {
        assert_eq!(code_any_diploid(b"2/3"), Some((2, 3, false)));
        assert_eq!(code_any_diploid(b"3|1"), Some((3, 1, true)));
    }

    #[test]
    fn any_diploid_reports_haploid_verbatim() {
        assert_eq!(code_any_diploid(b"1"), Some((1, 1, false)));
    }

    #[test]
    fn any_diploid_missing_on_dot() {
        assert_eq!(code_any_diploid(b"./."), None);
        assert_eq!(code_any_diploid(b"."), None);
    }

    #[test]
    fn allele_sum_preserves_multiallelic_values() {
        assert_eq!(allele_sum(b"2/3"), Some(5));
        assert_eq!(allele_sum(b"0/1"), Some(1));
        assert_eq!(allele_sum(b"./."), None);
    }

    #[test]
    fn is_missing_detects_any_dot_allele() {
        assert!(is_missing(b"./1"));
        assert!(is_missing(b"1/."));
        assert!(is_missing(b"."));
        assert!(!is_missing(b"0/1"));
    }

    #[test]
    fn non_numeric_allele_is_always_missing() {
        assert_eq!(code_diploid_biallelic(b"a/1"), -1);
        assert_eq!(code_any_diploid(b"a/1"), None);
    }
}
