//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements exactly one transformation step, so every
//! stage can be tested on its own and the rasteriser can be swapped for a
//! test double.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ render ──▶ encode ──▶ assemble
//!  (stat)     (pdfium)    (PNG)     (deck + save)
//! ```
//!
//! 1. [`validate`]: reject missing paths and non-files before any work
//! 2. [`render`]: rasterise every page, in order, at the requested DPI
//! 3. [`encode`]: PNG-encode one page in memory for embedding
//! 4. [`assemble`]: one full-bleed picture slide per page, then an atomic save

pub mod assemble;
pub mod encode;
pub mod render;
pub mod validate;
