//! # pdf2pptx
//!
//! Convert PDF documents into PowerPoint decks, one slide per page.
//!
//! Each page is rasterised with PDFium and placed as a single picture that
//! fills a 10 in × 5.625 in (16:9) slide. The source page's aspect ratio is
//! not preserved; the image is stretched to the full canvas. Nothing else
//! goes on the slide: no text, no placeholders.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate  the source exists and is a regular file
//!  ├─ 2. Render    rasterise every page via pdfium at the requested DPI
//!  ├─ 3. Encode    page bitmap → PNG bytes, in memory
//!  └─ 4. Assemble  one full-bleed slide per page, saved atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert, ConversionRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = ConversionRequest::builder("slides.pdf", "slides.pptx")
//!         .dpi(150)
//!         .build()?;
//!     let report = convert(&request)?;
//!     eprintln!("{} slides, {:.1} MB", report.slide_count, report.output_megabytes());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! The PDFium shared library is not linked at build time. [`convert`] binds
//! it at run time through [`pdfium_fetch::bind`]: `PDFIUM_LIB_PATH` first,
//! then the download cache, then the system library. Call
//! [`pdfium_fetch::ensure_library`] once beforehand to download it on demand.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionRequest, ConversionRequestBuilder, DEFAULT_DPI};
pub use convert::{convert, convert_with};
pub use error::{ErrorKind, Pdf2PptxError};
pub use output::ConversionReport;
pub use pipeline::assemble::{assemble, AssembledDeck};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer, RasterPage};
pub use pipeline::validate::{validate_input, ValidatedInput};
pub use pptx::{SlideDeck, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
pub use progress::{ConversionProgressCallback, NoopProgressCallback};
