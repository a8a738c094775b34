//! PDF rasterisation: one `DynamicImage` per page via PDFium.
//!
//! The stage is expressed as the [`PageRasterizer`] trait so the rest of the
//! pipeline never depends on PDFium directly; tests substitute a rasteriser
//! that fabricates images.
//!
//! Every failure of the underlying engine (unparseable file, password,
//! missing libpdfium, allocation failure) collapses into
//! [`Pdf2PptxError::RasterizationFailed`]. A panic inside a rasteriser is
//! caught by [`rasterize_pages`] and reported as
//! [`Pdf2PptxError::Unexpected`].

use crate::error::Pdf2PptxError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// One rendered page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// 1-indexed page number in the source document.
    pub number: usize,
    pub image: DynamicImage,
}

/// Turns a PDF file into its pages as raster images.
///
/// Implementations must return exactly one [`RasterPage`] per document
/// page, numbered `1..=N` in document order, and report any failure as
/// [`Pdf2PptxError::RasterizationFailed`].
pub trait PageRasterizer {
    fn rasterize(&self, source: &Path, dpi: u32) -> Result<Vec<RasterPage>, Pdf2PptxError>;
}

/// Run `rasterizer`, converting a panic into [`Pdf2PptxError::Unexpected`].
pub fn rasterize_pages(
    rasterizer: &dyn PageRasterizer,
    source: &Path,
    dpi: u32,
) -> Result<Vec<RasterPage>, Pdf2PptxError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rasterizer.rasterize(source, dpi)));
    outcome.unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(Pdf2PptxError::unexpected(format!("rasteriser panicked: {msg}")))
    })
}

/// PDFium-backed rasteriser.
///
/// Binds the library on every call: explicit path if one was given,
/// otherwise the lookup order of [`pdfium_fetch::bind`].
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the PDFium shared library at `path`.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, pdfium_fetch::FetchError> {
        match &self.library {
            Some(path) => pdfium_fetch::bind_from_path(path),
            None => pdfium_fetch::bind(),
        }
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, source: &Path, dpi: u32) -> Result<Vec<RasterPage>, Pdf2PptxError> {
        let pdfium = self
            .bind()
            .map_err(|e| Pdf2PptxError::rasterization(source, e))?;

        let document = pdfium.load_pdf_from_file(source, None).map_err(|e| {
            Pdf2PptxError::rasterization(source, format!("cannot open PDF: {e}"))
        })?;

        let pages = document.pages();
        let total = pages.len() as usize;
        info!("PDF loaded: {} pages", total);

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
        let mut rendered = Vec::with_capacity(total);

        for (index, page) in pages.iter().enumerate() {
            let number = index + 1;
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2PptxError::rasterization(source, format!("page {number}: {e}"))
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {}/{} → {}x{} px",
                number,
                total,
                image.width(),
                image.height()
            );
            rendered.push(RasterPage { number, image });
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct Panicking;

    impl PageRasterizer for Panicking {
        fn rasterize(&self, _: &Path, _: u32) -> Result<Vec<RasterPage>, Pdf2PptxError> {
            panic!("engine blew up");
        }
    }

    struct Blank(usize);

    impl PageRasterizer for Blank {
        fn rasterize(&self, _: &Path, dpi: u32) -> Result<Vec<RasterPage>, Pdf2PptxError> {
            Ok((1..=self.0)
                .map(|number| RasterPage {
                    number,
                    image: DynamicImage::new_rgb8(dpi, dpi),
                })
                .collect())
        }
    }

    #[test]
    fn panic_becomes_unexpected() {
        let err = rasterize_pages(&Panicking, Path::new("x.pdf"), 200).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("engine blew up"));
    }

    #[test]
    fn pages_pass_through_unchanged() {
        let pages = rasterize_pages(&Blank(3), Path::new("x.pdf"), 10).unwrap();
        let numbers: Vec<_> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(pages[0].image.width(), 10);
    }

    #[test]
    fn bad_library_path_is_rasterization_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let rasterizer = PdfiumRasterizer::with_library(dir.path().join("libpdfium-missing.so"));
        let err = rasterizer.rasterize(&pdf, 72).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RasterizationFailed);
    }
}
