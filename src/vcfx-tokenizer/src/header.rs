use ahash::AHashMap;

/// The declared cardinality of an `INFO`/`FORMAT` subfield, as written in
/// its `Number=` header attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    /// One value per ALT allele.
    A,
    /// One value per allele, including REF.
    R,
    /// One value per possible genotype (diploid: `(N+1)(N+2)/2`).
    G,
    One,
    Dot,
    Fixed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Info,
    Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub scope: Scope,
    pub id: String,
    pub number: Number,
}

/// `parse_header_decl(meta_line) -> (scope, id, number) | None`.
///
/// Extraction is by substring, not a full attribute parser: the `ID=` and
/// `Number=` values each end at the first `,` or `>`. Unrecognized line
/// prefixes (anything but `##INFO=<`/`##FORMAT=<`) return `None`.
pub fn parse_header_decl(meta_line: &[u8]) -> Option<(Scope, String, Number)> {
    let scope = if meta_line.starts_with(b"##INFO=<") {
        Scope::Info
    } else if meta_line.starts_with(b"##FORMAT=<") {
        Scope::Format
    } else {
        return None;
    };

    let id = extract_attr(meta_line, b"ID=")?;
    let number_raw = extract_attr(meta_line, b"Number=")?;
    let number = parse_number(&number_raw)?;
    Some((scope, id, number))
}

fn extract_attr(meta_line: &[u8], key: &[u8]) -> Option<String> {
    let pos = find_subslice(meta_line, key)?;
    let start = pos + key.len();
    let mut end = start;
    while end < meta_line.len() && meta_line[end] != b',' && meta_line[end] != b'>' {
        end += 1;
    }
    std::str::from_utf8(&meta_line[start..end]).ok().map(str::to_string)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_number(s: &str) -> Option<Number> {
    match s {
        "A" => Some(Number::A),
        "R" => Some(Number::R),
        "G" => Some(Number::G),
        "1" => Some(Number::One),
        "." => Some(Number::Dot),
        other => other.parse::<u32>().ok().map(Number::Fixed),
    }
}

/// `HeaderDeclarations`, keyed by subfield ID, built with
/// `ahash` for lookup speed on hot per-variant recode paths.
#[derive(Debug, Default)]
pub struct HeaderDeclarations {
    decls: AHashMap<String, FieldDecl>,
}

impl HeaderDeclarations {
    pub fn new() -> Self {
        Self { decls: AHashMap::default() }
    }

    /// Parses one `##...` meta line and records it if it's an
    /// `INFO`/`FORMAT` declaration. Returns whether it was recognized.
    pub fn observe(&mut self, meta_line: &[u8]) -> bool {
        match parse_header_decl(meta_line) {
            Some((scope, id, number)) => {
                self.decls.insert(id.clone(), FieldDecl { scope, id, number });
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldDecl> {
        self.decls.get(id)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_info_declaration() {
        let line = b"##INFO=<ID=AC,Number=A,Type=Integer,Description=\"Allele count\">";
        let (scope, id, number) = parse_header_decl(line).unwrap();
        assert_eq!(scope, Scope::Info);
        assert_eq!(id, "AC");
        assert_eq!(number, Number::A);
    }

    #[test]
    fn parses_format_declaration_with_fixed_number() {
        let line = b"##FORMAT=<ID=AD,Number=2,Type=Integer,Description=\"Allele depth\">";
        let (scope, id, number) = parse_header_decl(line).unwrap();
        assert_eq!(scope, Scope::Format);
        assert_eq!(id, "AD");
        assert_eq!(number, Number::Fixed(2));
    }

    #[test]
    fn parses_genotype_and_dot_numbers() {
        let g = b"##FORMAT=<ID=PL,Number=G,Type=Integer,Description=\"x\">";
        assert_eq!(parse_header_decl(g).unwrap().2, Number::G);
        let dot = b"##INFO=<ID=END,Number=.,Type=Integer,Description=\"x\">";
        assert_eq!(parse_header_decl(dot).unwrap().2, Number::Dot);
    }

    #[test]
    fn unrecognized_prefix_returns_none() {
        assert!(parse_header_decl(b"##fileformat=VCFv4.2").is_none());
        assert!(parse_header_decl(b"#CHROM\tPOS").is_none());
    }

    #[test]
    fn header_declarations_tracks_observed_lines() {
        let mut decls = HeaderDeclarations::new();
        assert!(decls.observe(b"##INFO=<ID=AC,Number=A,Type=Integer,Description=\"x\">"));
        assert!(!decls.observe(b"##fileformat=VCFv4.2"));
        assert_eq!(decls.get("AC").unwrap().number, Number::A);
        assert_eq!(decls.len(), 1);
    }
}
