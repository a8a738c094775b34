//! In-memory presentation container.
//!
//! A [`SlideDeck`] is an ordered list of [`Slide`]s sharing one canvas size.
//! Each slide holds at most one [`Picture`]. Nothing touches the disk until
//! [`SlideDeck::save`] (see [`package`]), which serialises the whole deck as
//! an OOXML PresentationML package in one go.
//!
//! All geometry is in EMUs (English Metric Units, 914 400 per inch), the
//! unit PresentationML uses throughout.

pub mod package;
pub mod template;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// 16:9 widescreen canvas: 10 in wide.
pub const SLIDE_WIDTH_EMU: i64 = 10 * EMU_PER_INCH;

/// 16:9 widescreen canvas: 5.625 in tall.
pub const SLIDE_HEIGHT_EMU: i64 = 5 * EMU_PER_INCH + 5 * EMU_PER_INCH / 8;

/// First slide id allowed by PresentationML.
const FIRST_SLIDE_ID: u32 = 256;

/// Convert inches to EMUs, rounding to the nearest unit.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// A raster image placed on a slide, stretched to `bounds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// PNG-encoded image data.
    pub png: Vec<u8>,
    pub bounds: Rect,
}

/// One slide: no placeholders, no text, at most one picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    id: u32,
    number: usize,
    picture: Option<Picture>,
}

impl Slide {
    /// Unique slide id inside the deck (≥ 256).
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 1-indexed position in the deck.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Place a PNG image at `bounds`, replacing any earlier picture.
    ///
    /// The image is stretched to the rectangle; its own aspect ratio is ignored.
    pub fn place_image(&mut self, png: Vec<u8>, bounds: Rect) {
        self.picture = Some(Picture { png, bounds });
    }

    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }
}

/// An ordered sequence of slides with a fixed canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    width: i64,
    height: i64,
    title: Option<String>,
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Empty deck with a `width` × `height` EMU canvas.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            title: None,
            slides: Vec::new(),
        }
    }

    /// Empty 10 in × 5.625 in (16:9) deck.
    pub fn widescreen() -> Self {
        Self::new(SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU)
    }

    /// Title recorded in the package's core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Append a blank slide and return it for editing.
    pub fn add_blank_slide(&mut self) -> &mut Slide {
        let index = self.slides.len();
        self.slides.push(Slide {
            id: FIRST_SLIDE_ID + index as u32,
            number: index + 1,
            picture: None,
        });
        &mut self.slides[index]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    /// The full canvas as a rectangle anchored at the origin.
    pub fn canvas(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widescreen_canvas_is_ten_by_five_point_six_two_five_inches() {
        let deck = SlideDeck::widescreen();
        assert_eq!(deck.width(), inches(10.0));
        assert_eq!(deck.height(), inches(5.625));
        assert_eq!(deck.width(), 9_144_000);
        assert_eq!(deck.height(), 5_143_500);
        assert_eq!(deck.canvas(), Rect::new(0, 0, 9_144_000, 5_143_500));
    }

    #[test]
    fn slides_get_sequential_ids_and_numbers() {
        let mut deck = SlideDeck::widescreen();
        deck.add_blank_slide();
        deck.add_blank_slide();
        let third = deck.add_blank_slide();
        assert_eq!(third.id(), 258);
        assert_eq!(third.number(), 3);
        assert_eq!(deck.slide_count(), 3);
        assert!(deck.slides().iter().all(|s| s.picture().is_none()));
    }

    #[test]
    fn place_image_replaces_previous_picture() {
        let mut deck = SlideDeck::widescreen();
        let canvas = deck.canvas();
        let slide = deck.add_blank_slide();
        slide.place_image(vec![1], Rect::new(1, 2, 3, 4));
        slide.place_image(vec![2], canvas);

        let pic = deck.slides()[0].picture().unwrap();
        assert_eq!(pic.png, vec![2]);
        assert_eq!(pic.bounds, canvas);
    }
}
