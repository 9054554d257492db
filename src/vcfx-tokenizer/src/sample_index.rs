use ahash::AHashMap;

use crate::error::TokenizeError;

/// `SampleIndex`, built from the `#CHROM` line. Columns 0-8 are the fixed
/// VCF columns (FORMAT included); columns 9 onward name the samples in
/// order.
#[derive(Debug, Default)]
pub struct SampleIndex {
    names: Vec<String>,
    by_name: AHashMap<String, usize>,
}

impl SampleIndex {
    /// Fails with `DuplicateSample` when a sample name repeats.
    pub fn from_chrom_line(line: &[u8]) -> Result<Self, TokenizeError> {
        let mut names = Vec::new();
        let mut by_name = AHashMap::default();
        for raw in line.split(|&b| b == b'\t').skip(9) {
            let name = std::str::from_utf8(raw).map_err(TokenizeError::InvalidUtf8)?.to_string();
            if by_name.contains_key(&name) {
                return Err(TokenizeError::DuplicateSample(name));
            }
            by_name.insert(name.clone(), names.len());
            names.push(name);
        }
        Ok(Self { names, by_name })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolves a requested sample name, failing with `UnknownSample` if
    /// it wasn't declared on the `#CHROM` line.
    pub fn require(&self, name: &str) -> Result<usize, TokenizeError> {
        self.index_of(name).ok_or_else(|| TokenizeError::UnknownSample(name.to_string()))
    }
}
