//! Slide assembly: rasterised pages → widescreen deck on disk.
//!
//! Pages are consumed in order; each one is PNG-encoded in memory, placed
//! full-bleed on a fresh blank slide and then dropped, so at most one raw
//! bitmap is alive beyond the rasteriser's output at any time. The deck is
//! written only after every page has been embedded.

use crate::error::Pdf2PptxError;
use crate::pipeline::encode::encode_png;
use crate::pipeline::render::RasterPage;
use crate::pptx::SlideDeck;
use crate::progress::ConversionProgressCallback;
use std::path::Path;
use tracing::{debug, info};

/// What [`assemble`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembledDeck {
    pub slide_count: usize,
    pub output_bytes: u64,
    pub slide_width_emu: i64,
    pub slide_height_emu: i64,
}

/// Build a 10 in × 5.625 in deck with one full-bleed slide per page and
/// save it to `destination`.
///
/// `title` goes into the package's core properties when given.
///
/// # Errors
/// - [`Pdf2PptxError::Unexpected`] if a page cannot be PNG-encoded
/// - [`Pdf2PptxError::SaveFailed`] if the destination cannot be written;
///   nothing is left at `destination` in that case
pub fn assemble(
    pages: Vec<RasterPage>,
    destination: &Path,
    title: Option<&str>,
    progress: &dyn ConversionProgressCallback,
) -> Result<AssembledDeck, Pdf2PptxError> {
    let total = pages.len();
    let mut deck = SlideDeck::widescreen();
    if let Some(title) = title {
        deck.set_title(title);
    }
    let canvas = deck.canvas();

    for page in pages {
        let png = encode_png(&page.image).map_err(Pdf2PptxError::unexpected)?;
        let image_bytes = png.len();
        drop(page.image);

        deck.add_blank_slide().place_image(png, canvas);
        debug!("Added slide {}/{} ({} bytes)", page.number, total, image_bytes);
        progress.on_slide_added(page.number, total, image_bytes);
    }

    let output_bytes = deck
        .save(destination)
        .map_err(|source| Pdf2PptxError::SaveFailed {
            path: destination.to_path_buf(),
            source,
        })?;
    info!(
        "Saved {} slides to {} ({} bytes)",
        deck.slide_count(),
        destination.display(),
        output_bytes
    );
    progress.on_saved(destination, output_bytes);

    Ok(AssembledDeck {
        slide_count: deck.slide_count(),
        output_bytes,
        slide_width_emu: deck.width(),
        slide_height_emu: deck.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::progress::NoopProgressCallback;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::cell::RefCell;

    fn page(number: usize, w: u32, h: u32) -> RasterPage {
        RasterPage {
            number,
            image: DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([0, 0, number as u8]))),
        }
    }

    #[derive(Default)]
    struct Events(RefCell<Vec<(usize, usize)>>);

    impl ConversionProgressCallback for Events {
        fn on_slide_added(&self, page_num: usize, total_pages: usize, _image_bytes: usize) {
            self.0.borrow_mut().push((page_num, total_pages));
        }
    }

    #[test]
    fn one_slide_per_page_at_widescreen_size() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("deck.pptx");
        let events = Events::default();

        let deck = assemble(
            vec![page(1, 40, 30), page(2, 30, 40), page(3, 8, 8)],
            &out,
            Some("deck"),
            &events,
        )
        .unwrap();

        assert_eq!(deck.slide_count, 3);
        assert_eq!((deck.slide_width_emu, deck.slide_height_emu), (9_144_000, 5_143_500));
        assert_eq!(deck.output_bytes, std::fs::metadata(&out).unwrap().len());
        assert_eq!(*events.0.borrow(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn empty_page_list_still_writes_a_deck() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.pptx");
        let deck = assemble(Vec::new(), &out, None, &NoopProgressCallback).unwrap();
        assert_eq!(deck.slide_count, 0);
        assert!(out.is_file());
    }

    #[test]
    fn missing_parent_directory_is_save_failed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no-such-dir").join("deck.pptx");
        let err = assemble(vec![page(1, 4, 4)], &out, None, &NoopProgressCallback).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SaveFailed);
        assert!(!out.exists());
    }
}
