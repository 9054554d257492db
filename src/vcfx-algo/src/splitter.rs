use vcfx_recode::{recode_gt, recode_info, RecodeError, RecodeMode};
use vcfx_tokenizer::{sample_column, sample_starts, split_subfields, HeaderDeclarations, Scope, VariantRecord};

/// Splits a multi-allelic line into one line per ALT allele. A biallelic
/// (or ALT-less) line is re-emitted unchanged.
pub fn split_multiallelic(
    record: &VariantRecord,
    declarations: &HeaderDeclarations,
    sample_count: usize,
    mode: RecodeMode,
) -> Result<Vec<Vec<u8>>, RecodeError> {
    let num_alts = record.alt_count() as u32;
    if num_alts < 2 {
        return Ok(vec![reconstruct_unchanged(record)]);
    }

    let alts: Vec<&[u8]> = record.alt_alleles().collect();
    let format_keys = record.format_keys();
    let starts = sample_starts(record.samples_region, sample_count);

    let mut lines = Vec::with_capacity(alts.len());
    for (i, alt) in alts.iter().enumerate() {
        let alt_index = (i + 1) as u32;
        let mut line = Vec::new();
        push_field(&mut line, record.chrom);
        push_field(&mut line, record.pos);
        push_field(&mut line, record.id);
        push_field(&mut line, record.reference);
        push_field(&mut line, alt);
        push_field(&mut line, record.qual);
        push_field(&mut line, record.filter);
        line.extend_from_slice(&recode_info_field(record.info, declarations, alt_index, num_alts, mode)?);

        if let Some(format) = record.format {
            line.push(b'\t');
            line.extend_from_slice(format);
            for s in 0..sample_count {
                line.push(b'\t');
                let col = sample_column(record.samples_region, &starts, s);
                line.extend_from_slice(&recode_sample(col, &format_keys, declarations, alt_index, num_alts, mode)?);
            }
        }
        lines.push(line);
    }
    Ok(lines)
}

fn push_field(line: &mut Vec<u8>, field: &[u8]) {
    if !line.is_empty() {
        line.push(b'\t');
    }
    line.extend_from_slice(field);
}

fn reconstruct_unchanged(record: &VariantRecord) -> Vec<u8> {
    let mut line = Vec::new();
    push_field(&mut line, record.chrom);
    push_field(&mut line, record.pos);
    push_field(&mut line, record.id);
    push_field(&mut line, record.reference);
    push_field(&mut line, record.alt);
    push_field(&mut line, record.qual);
    push_field(&mut line, record.filter);
    push_field(&mut line, record.info);
    if let Some(format) = record.format {
        line.push(b'\t');
        line.extend_from_slice(format);
        if !record.samples_region.is_empty() {
            line.push(b'\t');
            line.extend_from_slice(record.samples_region);
        }
    }
    line
}

fn recode_info_field(
    info: &[u8],
    declarations: &HeaderDeclarations,
    alt_index: u32,
    num_alts: u32,
    mode: RecodeMode,
) -> Result<Vec<u8>, RecodeError> {
    let mut out = Vec::new();
    out.push(b'\t');
    if info == b"." {
        out.extend_from_slice(info);
        return Ok(out);
    }
    let entries = split_subfields(info, b';');
    let mut out_entries: Vec<Vec<u8>> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.iter().position(|&b| b == b'=') {
            Some(eq) => {
                let key = &entry[..eq];
                let value = &entry[eq + 1..];
                let decl = std::str::from_utf8(key).ok().and_then(|k| declarations.get(k));
                match decl {
                    Some(decl) if decl.scope == Scope::Info => {
                        let values: Vec<&[u8]> = split_subfields(value, b',');
                        let recoded = recode_info(&values, decl.number, alt_index, num_alts, mode)?;
                        let mut joined = key.to_vec();
                        joined.push(b'=');
                        joined.extend(join_with(&recoded, b','));
                        out_entries.push(joined);
                    }
                    _ => out_entries.push(entry.to_vec()),
                }
            }
            None => out_entries.push(entry.to_vec()),
        }
    }
    out.extend(join_with(&out_entries, b';'));
    Ok(out)
}

fn recode_sample(
    col: &[u8],
    format_keys: &[&[u8]],
    declarations: &HeaderDeclarations,
    alt_index: u32,
    num_alts: u32,
    mode: RecodeMode,
) -> Result<Vec<u8>, RecodeError> {
    if col == b"." {
        return Ok(col.to_vec());
    }
    let subfields = split_subfields(col, b':');
    let mut out_parts: Vec<Vec<u8>> = Vec::with_capacity(format_keys.len());
    for (i, key) in format_keys.iter().enumerate() {
        let value = subfields.get(i).copied().unwrap_or(b".");
        if *key == b"GT" {
            out_parts.push(recode_gt(value, alt_index));
            continue;
        }
        let decl = std::str::from_utf8(key).ok().and_then(|k| declarations.get(k));
        match decl {
            Some(decl) if decl.scope == Scope::Format => {
                let values: Vec<&[u8]> = split_subfields(value, b',');
                let recoded = recode_info(&values, decl.number, alt_index, num_alts, mode)?;
                out_parts.push(join_with(&recoded, b','));
            }
            _ => out_parts.push(value.to_vec()),
        }
    }
    if out_parts.iter().all(|p| is_all_missing(p)) {
        Ok(b".".to_vec())
    } else {
        Ok(join_with(&out_parts, b':'))
    }
}

/// A sample column where every recoded value is `.` collapses to a single
/// `.` — every scalar across every subfield, not just every subfield
/// string, must be a literal dot.
fn is_all_missing(value: &[u8]) -> bool {
    !value.is_empty() && value.split(|&b| b == b',' || b == b'/' || b == b'|').all(|tok| tok == b".")
}

fn join_with(parts: &[Vec<u8>], sep: u8) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.extend_from_slice(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use vcfx_tokenizer::parse_variant_line;

    use super::*;

    fn declared_ad() -> HeaderDeclarations {
        let mut decl = HeaderDeclarations::new();
        decl.observe(b"##FORMAT=<ID=AD,Number=R,Type=Integer>");
        decl
    }

    #[test]
    fn biallelic_line_passes_through_unchanged() {
        let line = b"chr1\t100\trs1\tA\tG\t.\tPASS\t.\tGT\t0/1";
        let record = parse_variant_line(line).unwrap();
        let decl = HeaderDeclarations::new();
        let out = split_multiallelic(&record, &decl, 1, RecodeMode::Tolerant).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], line.to_vec());
    }

    #[test]
    fn splits_multiallelic_line_recoding_ad_and_gt() {
        let line = b"chr1\t1000\t.\tA\tC,T\t.\tPASS\t.\tGT:AD\t0/2:10,0,30";
        let record = parse_variant_line(line).unwrap();
        let decl = declared_ad();
        let out = split_multiallelic(&record, &decl, 1, RecodeMode::Tolerant).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], b"chr1\t1000\t.\tA\tC\t.\tPASS\t.\tGT:AD\t0/.:10,0".to_vec());
        assert_eq!(out[1], b"chr1\t1000\t.\tA\tT\t.\tPASS\t.\tGT:AD\t0/1:10,30".to_vec());
    }

    #[test]
    fn all_dot_sample_collapses_to_single_dot() {
        let line = b"chr1\t1000\t.\tA\tC,T\t.\tPASS\t.\tGT\t1/3";
        let record = parse_variant_line(line).unwrap();
        let decl = HeaderDeclarations::new();
        let out = split_multiallelic(&record, &decl, 1, RecodeMode::Tolerant).unwrap();
        // allele index 1 (C): "1" -> "1", "3" -> "." => "1/." (not all dots)
        assert_eq!(out[0], b"chr1\t1000\t.\tA\tC\t.\tPASS\t.\tGT\t1/.".to_vec());
        // allele index 2 (T): "1" -> ".", "3" -> "." => "./." collapses to "."
        assert_eq!(out[1], b"chr1\t1000\t.\tA\tT\t.\tPASS\t.\tGT\t.".to_vec());
    }
}
