//! Conversion request: what to read, where to write, and at which resolution.
//!
//! A [`ConversionRequest`] is built once per invocation and never mutated
//! afterwards; every pipeline stage only borrows it.

use crate::error::Pdf2PptxError;
use std::path::{Path, PathBuf};

/// Rasterisation resolution used when the caller does not pick one.
pub const DEFAULT_DPI: u32 = 200;

/// One PDF → PPTX conversion.
///
/// # Example
/// ```rust
/// use pdf2pptx::ConversionRequest;
///
/// let request = ConversionRequest::builder("slides.pdf", "slides.pptx")
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(request.dpi(), 150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source: PathBuf,
    destination: PathBuf,
    dpi: u32,
}

impl ConversionRequest {
    /// Request with the default resolution of [`DEFAULT_DPI`].
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn builder(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            request: Self::new(source, destination),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Dots per inch used to rasterise every page. Always ≥ 1.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug)]
pub struct ConversionRequestBuilder {
    request: ConversionRequest,
}

impl ConversionRequestBuilder {
    /// Higher values only raise pixel density; slide count and geometry
    /// are unaffected. No upper bound is enforced here.
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.request.dpi = dpi;
        self
    }

    pub fn build(self) -> Result<ConversionRequest, Pdf2PptxError> {
        if self.request.dpi == 0 {
            return Err(Pdf2PptxError::InvalidConfig(
                "DPI must be a positive integer, got 0".into(),
            ));
        }
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_to_200_dpi() {
        let r = ConversionRequest::new("in.pdf", "out.pptx");
        assert_eq!(r.dpi(), DEFAULT_DPI);
        assert_eq!(r.source(), Path::new("in.pdf"));
        assert_eq!(r.destination(), Path::new("out.pptx"));
    }

    #[test]
    fn builder_accepts_large_dpi() {
        let r = ConversionRequest::builder("in.pdf", "out.pptx")
            .dpi(1200)
            .build()
            .unwrap();
        assert_eq!(r.dpi(), 1200);
    }

    #[test]
    fn builder_rejects_zero_dpi() {
        let err = ConversionRequest::builder("in.pdf", "out.pptx")
            .dpi(0)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn builder_without_overrides_equals_new() {
        let built = ConversionRequest::builder("in.pdf", "out.pptx")
            .build()
            .unwrap();
        assert_eq!(built, ConversionRequest::new("in.pdf", "out.pptx"));
    }
}
