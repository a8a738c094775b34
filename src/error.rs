//! Error type for the pdf2pptx library.
//!
//! Every stage fails fast and returns one [`Pdf2PptxError`]; nothing is
//! retried and no partial deck is ever written. The CLI is the single place
//! that turns these into user-facing messages, so the variants carry enough
//! context (paths, underlying causes) to print something actionable.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed underlying cause, kept for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Nothing exists at the source path.
    #[error("PDF file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The source path exists but is not a regular file (e.g. a directory).
    #[error("Input path is not a file: '{path}'")]
    InvalidInput { path: PathBuf },

    // ── Rasterisation ─────────────────────────────────────────────────────
    /// The PDF could not be rendered: corrupt, encrypted, unsupported,
    /// PDFium missing, or out of memory.
    #[error("Failed to rasterise PDF '{path}': {source}")]
    RasterizationFailed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    // ── Output ────────────────────────────────────────────────────────────
    /// The finished deck could not be written to the destination.
    #[error("Failed to save presentation to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Request builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Anything the kinds above do not anticipate.
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] BoxError),
}

/// Copyable tag for [`Pdf2PptxError`], handy for matching at the boundary
/// and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    RasterizationFailed,
    SaveFailed,
    InvalidConfig,
    Unexpected,
}

impl Pdf2PptxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2PptxError::NotFound { .. } => ErrorKind::NotFound,
            Pdf2PptxError::InvalidInput { .. } => ErrorKind::InvalidInput,
            Pdf2PptxError::RasterizationFailed { .. } => ErrorKind::RasterizationFailed,
            Pdf2PptxError::SaveFailed { .. } => ErrorKind::SaveFailed,
            Pdf2PptxError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Pdf2PptxError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Wrap any rasterisation-side failure for `path`.
    pub fn rasterization(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Pdf2PptxError::RasterizationFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn unexpected(source: impl Into<BoxError>) -> Self {
        Pdf2PptxError::Unexpected(source.into())
    }
}
