use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::{Advice, Mmap, MmapOptions};

use crate::error::MmapError;

/// A read-only, contiguous view of a file's contents. Empty files succeed
/// with a zero-length mapping rather than erroring.
pub struct MappedFile {
    // `None` for zero-length files: `memmap2::Mmap::map` rejects empty
    // files, so the empty case is represented without ever calling it.
    mmap: Option<Mmap>,
}

impl MappedFile {
    /// Memory-map `path` for sequential, read-only access.
    pub fn open(path: &Path) -> Result<Self, MmapError> {
        let file = File::open(path).map_err(|e| classify_open_error(path, e))?;
        let len = file.metadata().map_err(MmapError::Open)?.len();
        if len == 0 {
            debug!("{} is empty, skipping mmap", path.display());
            return Ok(Self { mmap: None });
        }

        // SAFETY: the file is not expected to be truncated or modified for
        // the duration of the mapping, which lives only for this one tool
        // invocation.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(MmapError::Map)?;

        if let Err(e) = mmap.advise(Advice::Sequential) {
            debug!("madvise(SEQUENTIAL) failed: {e}");
        }
        if let Err(e) = mmap.advise(Advice::WillNeed) {
            debug!("madvise(WILLNEED) failed: {e}");
        }

        Ok(Self { mmap: Some(mmap) })
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(m) => &m[..],
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn classify_open_error(path: &Path, e: std::io::Error) -> MmapError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::NotFound => MmapError::NotFound(path),
        std::io::ErrorKind::PermissionDenied => MmapError::PermissionDenied(path),
        _ => MmapError::Open(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_succeeds_with_zero_length() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mapped = MappedFile::open(file.path()).unwrap();
        assert!(mapped.is_empty());
        assert_eq!(mapped.as_bytes(), b"");
    }

    #[test]
    fn nonempty_file_maps_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"chr1\t100\t.\tA\tG\n").unwrap();
        let mapped = MappedFile::open(file.path()).unwrap();
        assert_eq!(mapped.as_bytes(), b"chr1\t100\t.\tA\tG\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = MappedFile::open(Path::new("/nonexistent/vcfx-test-file")).unwrap_err();
        assert!(matches!(err, MmapError::NotFound(_)));
    }
}
