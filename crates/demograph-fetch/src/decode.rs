//! In-memory image decoding.

use image::DynamicImage;

use crate::error::FetcherResult;

/// Decode raw body bytes into pixel data for the analyzer.
///
/// No resizing or color-space normalization happens here; whatever the
/// analyzer accepts is passed through unchanged. Malformed bytes are an
/// error the caller treats exactly like a fetch failure.
pub fn decode_image(payload: &[u8]) -> FetcherResult<DynamicImage> {
    Ok(image::load_from_memory(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_valid_png() {
        let mut buffer = Vec::new();
        image::RgbImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&buffer).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"not an image").is_err());
    }
}
