//! Image encoding: `DynamicImage` → PNG bytes for embedding in a slide.
//!
//! PNG keeps rendered text crisp; the deck stores the bytes untouched, so
//! whatever is encoded here is exactly what the viewer shows.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let png = encode_png(&img).expect("encode should succeed");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).expect("valid PNG").to_rgba8();
        assert_eq!(decoded.dimensions(), (10, 10));
        assert_eq!(decoded.get_pixel(3, 7), &Rgba([255, 0, 0, 255]));
    }
}
