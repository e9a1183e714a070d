use image::RgbImage;

/// Attempt to locate and decode one QR code in a still frame.
///
/// Returns the embedded text, or None when no code is found. A grid that
/// is detected but fails to decode is logged and discarded; the capture
/// loop simply tries again on the next frame.
pub fn decode_frame(frame: &RgbImage) -> Option<String> {
    let grayscale = image::imageops::grayscale(frame);

    let mut prepared = rqrr::PreparedImage::prepare(grayscale);
    let grids = prepared.detect_grids();

    let grid = grids.first()?;
    match grid.decode() {
        Ok((_meta, content)) if !content.is_empty() => Some(content),
        Ok(_) => None,
        Err(e) => {
            eprintln!("⚠️  Discarding undecodable grid: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Luma};
    use qrencode::QrCode;

    fn rendered_frame(content: &str) -> RgbImage {
        let code = QrCode::new(content.as_bytes()).unwrap();
        let raster = code
            .render::<Luma<u8>>()
            .min_dimensions(240, 240)
            .build();
        DynamicImage::ImageLuma8(raster).to_rgb8()
    }

    #[test]
    fn test_decodes_a_rendered_code() {
        let frame = rendered_frame("https://example.com");
        assert_eq!(decode_frame(&frame), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_blank_frame_yields_nothing() {
        let frame = RgbImage::from_pixel(320, 240, image::Rgb([255, 255, 255]));
        assert_eq!(decode_frame(&frame), None);
    }
}
