//! Conversion entry points.
//!
//! The pipeline is three stages composed linearly:
//!
//! ```text
//! validate_input(source) ──▶ rasterize(source, dpi) ──▶ assemble(pages, destination)
//! ```
//!
//! Each stage fails fast; the first error is returned as-is and nothing is
//! written to the destination. [`convert_with`] takes the rasteriser and the
//! progress observer explicitly so either can be replaced by a test double.

use crate::config::ConversionRequest;
use crate::error::Pdf2PptxError;
use crate::output::ConversionReport;
use crate::pipeline::{assemble, render, validate};
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF into a widescreen PPTX deck, one full-bleed slide per page.
///
/// Uses PDFium (located by [`pdfium_fetch::bind`]) and reports no progress.
///
/// # Errors
/// See [`convert_with`].
pub fn convert(request: &ConversionRequest) -> Result<ConversionReport, Pdf2PptxError> {
    convert_with(
        request,
        &render::PdfiumRasterizer::new(),
        &NoopProgressCallback,
    )
}

/// Convert with an explicit rasteriser and progress observer.
///
/// # Errors
/// - [`Pdf2PptxError::NotFound`] / [`Pdf2PptxError::InvalidInput`] from
///   input validation, before the rasteriser is touched
/// - [`Pdf2PptxError::RasterizationFailed`] from the rasteriser
/// - [`Pdf2PptxError::SaveFailed`] when the deck cannot be written
/// - [`Pdf2PptxError::Unexpected`] for anything else, including a panic
///   inside the rasteriser
pub fn convert_with(
    request: &ConversionRequest,
    rasterizer: &dyn render::PageRasterizer,
    progress: &dyn ConversionProgressCallback,
) -> Result<ConversionReport, Pdf2PptxError> {
    let total_start = Instant::now();
    let source = request.source();
    let destination = request.destination();
    info!(
        "Converting {} → {} at {} dpi",
        source.display(),
        destination.display(),
        request.dpi()
    );

    // ── Step 1: Validate input ───────────────────────────────────────────
    let input = validate::validate_input(source)?;

    // ── Step 2: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let pages = render::rasterize_pages(rasterizer, input.path(), request.dpi())?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    let page_count = pages.len();
    info!("Rendered {} pages in {}ms", page_count, render_duration_ms);

    progress.on_conversion_start(page_count);

    // ── Step 3: Assemble and save ────────────────────────────────────────
    let assemble_start = Instant::now();
    let title = source.file_stem().map(|s| s.to_string_lossy());
    let deck = assemble::assemble(pages, destination, title.as_deref(), progress)?;
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;
    debug!("Assembled deck in {}ms", assemble_duration_ms);

    let total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} slides written to {} in {}ms",
        deck.slide_count,
        destination.display(),
        total_duration_ms
    );
    progress.on_conversion_complete(deck.slide_count);

    Ok(ConversionReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        dpi: request.dpi(),
        page_count,
        slide_count: deck.slide_count,
        slide_width_emu: deck.slide_width_emu,
        slide_height_emu: deck.slide_height_emu,
        input_bytes: input.size_bytes(),
        output_bytes: deck.output_bytes,
        render_duration_ms,
        assemble_duration_ms,
        total_duration_ms,
    })
}
