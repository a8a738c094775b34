//! Progress-callback trait for per-slide conversion events.
//!
//! Pass a `&dyn ConversionProgressCallback` to
//! [`crate::convert::convert_with`] to observe the pipeline without relying
//! on global logging state. The CLI drives its progress bar from it; tests
//! use it to record the order slides were added in.
//!
//! # Example
//!
//! ```rust
//! use pdf2pptx::ConversionProgressCallback;
//! use std::cell::Cell;
//!
//! struct Counter(Cell<usize>);
//!
//! impl ConversionProgressCallback for Counter {
//!     fn on_slide_added(&self, _page_num: usize, _total_pages: usize, _image_bytes: usize) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//! ```

use std::path::Path;

/// Called by the pipeline as it assembles the deck.
///
/// Conversion is single-threaded, so callbacks arrive strictly in page
/// order from the calling thread. Every method defaults to a no-op.
pub trait ConversionProgressCallback {
    /// Called once, after rasterisation, before the first slide is added.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after page `page_num` (1-indexed) has been embedded as a slide.
    ///
    /// `image_bytes` is the size of the encoded PNG stored for that slide.
    fn on_slide_added(&self, page_num: usize, total_pages: usize, image_bytes: usize) {
        let _ = (page_num, total_pages, image_bytes);
    }

    /// Called once the deck has been written to `path`.
    fn on_saved(&self, path: &Path, bytes: u64) {
        let _ = (path, bytes);
    }

    /// Called last, only on success.
    fn on_conversion_complete(&self, slide_count: usize) {
        let _ = slide_count;
    }
}

/// Ignores every event. The default for [`crate::convert::convert`].
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_conversion_start(&self, total_pages: usize) {
            self.events.borrow_mut().push(format!("start {total_pages}"));
        }

        fn on_slide_added(&self, page_num: usize, total_pages: usize, _image_bytes: usize) {
            self.events
                .borrow_mut()
                .push(format!("slide {page_num}/{total_pages}"));
        }

        fn on_conversion_complete(&self, slide_count: usize) {
            self.events.borrow_mut().push(format!("done {slide_count}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(2);
        cb.on_slide_added(1, 2, 10);
        cb.on_saved(Path::new("out.pptx"), 100);
        cb.on_conversion_complete(2);
    }

    #[test]
    fn overridden_methods_receive_events_and_rest_default() {
        let rec = Recorder::default();
        rec.on_conversion_start(2);
        rec.on_slide_added(1, 2, 10);
        rec.on_slide_added(2, 2, 10);
        rec.on_saved(Path::new("out.pptx"), 100);
        rec.on_conversion_complete(2);

        assert_eq!(
            *rec.events.borrow(),
            vec!["start 2", "slide 1/2", "slide 2/2", "done 2"]
        );
    }
}
