//! Input validation: make sure the source is an existing regular file.
//!
//! This runs before PDFium is even bound, so a typo in the path costs one
//! `stat` instead of a library load. The PDF contents are not inspected
//! here; a file that is not a PDF fails later as a rasterisation error.

use crate::error::Pdf2PptxError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source path that was a regular file when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    path: PathBuf,
    size_bytes: u64,
}

impl ValidatedInput {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Check that `path` names an existing regular file (symlinks are followed).
///
/// # Errors
/// - [`Pdf2PptxError::NotFound`] when nothing exists at `path`
/// - [`Pdf2PptxError::InvalidInput`] when it exists but is not a file
/// - [`Pdf2PptxError::Unexpected`] when the metadata lookup fails otherwise
pub fn validate_input(path: &Path) -> Result<ValidatedInput, Pdf2PptxError> {
    debug!("Validating input file: {}", path.display());

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Pdf2PptxError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Pdf2PptxError::unexpected(e)),
    };

    if !metadata.is_file() {
        return Err(Pdf2PptxError::InvalidInput {
            path: path.to_path_buf(),
        });
    }

    debug!(
        "Input file size: {:.2} MB",
        metadata.len() as f64 / (1024.0 * 1024.0)
    );

    Ok(ValidatedInput {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input(&dir.path().join("nope.pdf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn directory_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_input(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn regular_file_passes_with_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.7 not rendered here").unwrap();

        let input = validate_input(&path).unwrap();
        assert_eq!(input.path(), path.as_path());
        assert_eq!(input.size_bytes(), 26);
    }

    #[test]
    fn contents_are_not_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(validate_input(&path).is_ok());
    }
}
