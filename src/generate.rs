use std::io::Cursor;
use std::path::PathBuf;

use iced::widget::image::Handle;
use image::{DynamicImage, ImageFormat, Luma};
use qrencode::{EcLevel, QrCode};
use rfd::FileDialog;

use crate::error::AppError;

/// Default file name offered by the save dialog
pub const DOWNLOAD_FILE_NAME: &str = "qr-code.png";

/// Minimum edge length of the rendered raster, in pixels
const RENDER_SIZE: u32 = 360;

/// A rasterized QR encoding of user-supplied text.
/// Replaced wholesale on every generation request.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// The encoded text, after trimming
    pub text: String,
    /// Preview raster for the UI
    pub handle: Handle,
    /// PNG bytes for the download
    pub png: Vec<u8>,
}

/// Encode `text` into a QR module matrix and rasterize it.
///
/// Capacity (version) selection is automatic; error correction is the low
/// level, matching what a URL payload needs. Empty or whitespace-only
/// input is rejected before the encoder is invoked.
pub fn render_qr(text: &str) -> Result<GeneratedImage, AppError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::Encode(e.to_string()))?;

    let raster = code
        .render::<Luma<u8>>()
        .min_dimensions(RENDER_SIZE, RENDER_SIZE)
        .build();
    let image = DynamicImage::ImageLuma8(raster);

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::Encode(e.to_string()))?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(GeneratedImage {
        text: content.to_string(),
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
        png,
    })
}

/// Encoder sanity check for the startup capability probe
pub fn self_check() -> bool {
    match QrCode::new(b"qr-sentry") {
        Ok(_) => true,
        Err(e) => {
            eprintln!("⚠️  QR encoder self-check failed: {e}");
            false
        }
    }
}

/// Ask the user for a destination and write the PNG bytes.
///
/// Returns Ok(None) when the dialog is cancelled.
pub fn save_png(image: &GeneratedImage) -> Result<Option<PathBuf>, AppError> {
    let Some(target) = FileDialog::new()
        .set_title("Save QR Code")
        .set_file_name(DOWNLOAD_FILE_NAME)
        .save_file()
    else {
        return Ok(None);
    };

    std::fs::write(&target, &image.png).map_err(|e| AppError::Save(e.to_string()))?;
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    #[test]
    fn test_empty_input_never_reaches_the_encoder() {
        assert!(matches!(render_qr(""), Err(AppError::EmptyInput)));
        assert!(matches!(render_qr("   \n\t"), Err(AppError::EmptyInput)));
    }

    #[test]
    fn test_renders_a_png() {
        let image = render_qr("https://example.com").unwrap();

        assert_eq!(image.text, "https://example.com");
        assert!(image.png.len() > PNG_MAGIC.len());
        assert_eq!(&image.png[..4], &PNG_MAGIC);
    }

    #[test]
    fn test_input_is_trimmed_before_encoding() {
        let image = render_qr("  https://example.com  ").unwrap();
        assert_eq!(image.text, "https://example.com");
    }
}
