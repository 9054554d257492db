use vcfx_tokenizer::Number;

use crate::error::RecodeError;

/// Controls how a value vector that doesn't match its declared `Number`
/// length is handled: `Tolerant` emits `.` for any mismatched subfield;
/// `Strict` fails the whole recode with `RecodeError::LengthMismatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecodeMode {
    #[default]
    Tolerant,
    Strict,
}

/// Recode a comma-separated `INFO`/`FORMAT` subfield value vector `values`
/// for ALT allele `alt_index` (1-based) out of `num_alts` total ALTs,
/// according to the declared `Number` layout.
pub fn recode_info(
    values: &[&[u8]],
    number: Number,
    alt_index: u32,
    num_alts: u32,
    mode: RecodeMode,
) -> Result<Vec<Vec<u8>>, RecodeError> {
    let n = num_alts as usize;
    let a = alt_index as usize;

    match number {
        Number::A => {
            if values.len() != n {
                return mismatch(mode, 1);
            }
            Ok(vec![values[a - 1].to_vec()])
        }
        Number::R => {
            if values.len() != n + 1 {
                return mismatch(mode, 2);
            }
            Ok(vec![values[0].to_vec(), values[a].to_vec()])
        }
        Number::G => {
            let expected = (n + 1) * (n + 2) / 2;
            if values.len() != expected {
                return mismatch(mode, 3);
            }
            // idx(i,j) = ((2N+1-i)*i)/2 + (j-i).
            let idx = |i: usize, j: usize| ((2 * n + 1 - i) * i) / 2 + (j - i);
            Ok(vec![values[idx(0, 0)].to_vec(), values[idx(0, a)].to_vec(), values[idx(a, a)].to_vec()])
        }
        Number::One | Number::Dot | Number::Fixed(_) => Ok(values.iter().map(|v| v.to_vec()).collect()),
    }
}

fn mismatch(mode: RecodeMode, out_len: usize) -> Result<Vec<Vec<u8>>, RecodeError> {
    match mode {
        RecodeMode::Tolerant => Ok(vec![b".".to_vec(); out_len]),
        RecodeMode::Strict => Err(RecodeError::LengthMismatch),
    }
}

fn parse_allele(tok: &[u8]) -> Option<u32> {
    if tok.is_empty() {
        return None;
    }
    let mut value = 0u32;
    for &b in tok {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(value)
}

fn relabel_allele(tok: &[u8], alt_index: u32) -> &'static [u8] {
    match parse_allele(tok) {
        Some(0) => b"0",
        Some(n) if n == alt_index => b"1",
        _ => b".",
    }
}

/// `GT` recoding is relabeling, not value projection. Allele `0` stays
/// `0`, allele `alt_index` becomes `1`, every other
/// allele (including `.`) becomes `.`. The phasing separator is preserved
/// as `/` after splitting.
pub fn recode_gt(gt_slice: &[u8], alt_index: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(gt_slice.len());
    for (i, tok) in gt_slice.split(|&b| b == b'/' || b == b'|').enumerate() {
        if i > 0 {
            out.push(b'/');
        }
        out.extend_from_slice(relabel_allele(tok, alt_index));
    }
    out
}
