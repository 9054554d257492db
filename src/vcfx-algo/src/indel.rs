#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimResult {
    pub pos: u64,
    pub reference: Vec<u8>,
    pub alt: Vec<u8>,
    pub changed: bool,
}

/// Reference-free indel normalization for one (REF, ALT) pair. True
/// left-shifting across reference repeats would need a reference genome
/// and is out of scope here; this only trims the common prefix/suffix
/// while keeping at least one anchor base on each side.
pub fn trim_indel(pos: u64, reference: &[u8], alt: &[u8]) -> TrimResult {
    let prefix = common_prefix_len(reference, alt);
    let trim_prefix = prefix.saturating_sub(1);
    let ref_after_prefix = &reference[trim_prefix..];
    let alt_after_prefix = &alt[trim_prefix..];

    let suffix = common_suffix_len(ref_after_prefix, alt_after_prefix);
    let trim_suffix = suffix.saturating_sub(1);

    let ref_end = ref_after_prefix.len() - trim_suffix;
    let alt_end = alt_after_prefix.len() - trim_suffix;
    let trimmed_ref = &ref_after_prefix[..ref_end];
    let trimmed_alt = &alt_after_prefix[..alt_end];

    if trimmed_ref == trimmed_alt || trimmed_ref.is_empty() || trimmed_alt.is_empty() {
        return TrimResult { pos, reference: reference.to_vec(), alt: alt.to_vec(), changed: false };
    }

    TrimResult { pos: pos + trim_prefix as u64, reference: trimmed_ref.to_vec(), alt: trimmed_alt.to_vec(), changed: true }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}
