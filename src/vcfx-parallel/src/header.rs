use vcfx_mmap::ByteCursor;
use vcfx_tokenizer::{HeaderDeclarations, SampleIndex};

use crate::error::ParallelError;

/// The result of skipping the header region of a mapped VCF — the
/// accumulated `INFO`/`FORMAT` declarations, the sample names from
/// `#CHROM`, and the byte offset where variant data begins.
pub struct ParsedHeader {
    pub declarations: HeaderDeclarations,
    pub samples: SampleIndex,
    pub data_start: usize,
}

/// Skip every line beginning with `#` until `#CHROM` inclusive, recording
/// `##INFO=<...>`/`##FORMAT=<...>` declarations along the way. Fatal
/// (`MissingChromHeader`) if a non-`#` line appears first, or the input
/// ends without ever seeing `#CHROM`.
pub fn parse_header(data: &[u8]) -> Result<ParsedHeader, ParallelError> {
    let mut declarations = HeaderDeclarations::new();
    let mut pos = 0;
    while pos < data.len() {
        let nl = ByteCursor::find_newline(data, pos);
        let mut end = nl;
        if end > pos && data[end - 1] == b'\r' {
            end -= 1;
        }
        let line = &data[pos..end];
        let next = if nl < data.len() { nl + 1 } else { nl };

        if line.starts_with(b"#CHROM") {
            let samples = SampleIndex::from_chrom_line(line)?;
            return Ok(ParsedHeader { declarations, samples, data_start: next });
        }
        if line.starts_with(b"##") {
            declarations.observe(line);
        } else if !line.starts_with(b"#") {
            return Err(ParallelError::MissingChromHeader);
        }
        pos = next;
    }
    Err(ParallelError::MissingChromHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declarations_and_samples() {
        let data = b"##fileformat=VCFv4.2\n##INFO=<ID=AD,Number=R,Type=Integer>\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA001\nchr1\t1\t.\tA\tG\t.\t.\t.\tGT\t0/1\n";
        let parsed = parse_header(data).unwrap();
        assert_eq!(parsed.samples.names(), &["NA001".to_string()]);
        assert!(parsed.declarations.get("AD").is_some());
        assert_eq!(&data[parsed.data_start..], b"chr1\t1\t.\tA\tG\t.\t.\t.\tGT\t0/1\n".as_slice());
    }

    #[test]
    fn fails_without_chrom_line() {
        let data = b"##fileformat=VCFv4.2\nchr1\t1\t.\tA\tG\n";
        assert!(matches!(parse_header(data), Err(ParallelError::MissingChromHeader)));
    }

    #[test]
    fn fails_on_empty_input() {
        assert!(matches!(parse_header(b""), Err(ParallelError::MissingChromHeader)));
    }
}
