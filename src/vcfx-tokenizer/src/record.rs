use vcfx_mmap::ByteCursor;

use crate::error::TokenizeError;

/// Zero-copy view of the nine fixed VCF columns plus the raw sample region.
/// Transient: valid only for the line it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct VariantRecord<'a> {
    pub chrom: &'a [u8],
    pub pos: &'a [u8],
    pub id: &'a [u8],
    pub reference: &'a [u8],
    pub alt: &'a [u8],
    pub qual: &'a [u8],
    pub filter: &'a [u8],
    pub info: &'a [u8],
    /// `None` when the line has exactly 8 fields (no FORMAT column).
    pub format: Option<&'a [u8]>,
    /// Raw, unsplit region holding all sample columns (empty when there are
    /// none). Use [`sample_starts`] to split it into per-sample slices.
    pub samples_region: &'a [u8],
}

impl<'a> VariantRecord<'a> {
    /// Number of ALT alleles (comma-separated; `1` for a single ALT, unless
    /// the placeholder `.` denotes "no ALT called").
    pub fn alt_count(&self) -> usize {
        if self.alt == b"." {
            0
        } else {
            self.alt.split(|&b| b == b',').count()
        }
    }

    pub fn alt_alleles(&self) -> impl Iterator<Item = &'a [u8]> {
        let empty = self.alt == b".";
        self.alt.split(|&b| b == b',').filter(move |_| !empty)
    }

    pub fn format_keys(&self) -> Vec<&'a [u8]> {
        match self.format {
            Some(f) => split_subfields(f, b':'),
            None => Vec::new(),
        }
    }
}

/// `parse_variant_line(line) -> record | fails{TooFewFields}`.
///
/// Requires at least 8 tab-separated fields. A line with exactly 8 fields
/// has no FORMAT column and no samples; 9 fields means FORMAT is present
/// with zero samples.
pub fn parse_variant_line(line: &'_ [u8]) -> Result<VariantRecord<'_>, TokenizeError> {
    // Split off the first 8 fixed columns (CHROM..INFO) one tab scan at a
    // time; the 9th column onward (FORMAT + samples) is handled separately
    // below since the sample region itself is split lazily by the caller.
    // `trailing_tab` tracks whether the 8th field was itself terminated by a
    // tab (a FORMAT column follows) versus the line ending right there.
    let mut cursor = 0usize;
    let mut trailing_tab = false;
    let mut cols: Vec<&[u8]> = Vec::with_capacity(8);
    while cols.len() < 8 {
        let tab = ByteCursor::find_tab(line, cursor);
        cols.push(&line[cursor..tab]);
        trailing_tab = tab < line.len();
        cursor = if trailing_tab { tab + 1 } else { tab };
        if !trailing_tab {
            break;
        }
    }

    if cols.len() < 8 {
        return Err(TokenizeError::TooFewFields);
    }

    let chrom = cols[0];
    let posf = cols[1];
    let id = cols[2];
    let reference = cols[3];
    let alt = cols[4];
    let qual = cols[5];
    let filter = cols[6];
    let info = cols[7];

    if !trailing_tab {
        return Ok(VariantRecord {
            chrom,
            pos: posf,
            id,
            reference,
            alt,
            qual,
            filter,
            info,
            format: None,
            samples_region: &[],
        });
    }

    // A 9th field follows: cols[8] is the start of the FORMAT field; the
    // samples region is whatever follows its terminating tab (or nothing).
    let format_start = cursor;
    let format_end = ByteCursor::find_tab(line, format_start);
    let format = &line[format_start..format_end];
    let samples_region: &[u8] = if format_end >= line.len() {
        &[]
    } else {
        &line[format_end + 1..]
    };

    Ok(VariantRecord {
        chrom,
        pos: posf,
        id,
        reference,
        alt,
        qual,
        filter,
        info,
        format: Some(format),
        samples_region,
    })
}

/// `sample_starts(sample_region, num_samples) -> ptr[]`.
/// Returns `num_samples + 1` offsets into `sample_region` (the start of
/// each sample column, plus an end sentinel), via `num_samples - 1` tab
/// scans — O(L) in the region's size.
pub fn sample_starts(sample_region: &[u8], num_samples: usize) -> Vec<usize> {
    let mut starts = Vec::with_capacity(num_samples + 1);
    if num_samples == 0 {
        starts.push(0);
        return starts;
    }
    let mut pos = 0usize;
    starts.push(pos);
    for _ in 1..num_samples {
        let tab = ByteCursor::find_tab(sample_region, pos);
        pos = if tab < sample_region.len() { tab + 1 } else { sample_region.len() };
        starts.push(pos);
    }
    starts.push(sample_region.len());
    starts
}

/// Split a sample column (or FORMAT field) into its `:`-delimited
/// subfields. Padding shorter vectors out to the FORMAT arity with `.` is
/// the caller's responsibility, not this split.
pub fn split_subfields(field: &[u8], sep: u8) -> Vec<&[u8]> {
    field.split(|&b| b == sep).collect()
}

/// Fetch sample column `idx` out of `sample_region`, given precomputed
/// `sample_starts` boundaries.
pub fn sample_column<'a>(sample_region: &'a [u8], starts: &[usize], idx: usize) -> &'a [u8] {
    let start = starts[idx];
    // `starts[idx + 1]` is the sentinel (sample_region.len()) only for the
    // last sample; for every other sample it's the next field's start, so
    // subtracting 1 strips the tab delimiter between them.
    let is_last = idx + 2 >= starts.len();
    let end = if is_last { sample_region.len() } else { starts[idx + 1].saturating_sub(1) };
    let end = end.min(sample_region.len()).max(start);
    &sample_region[start..end]
}
