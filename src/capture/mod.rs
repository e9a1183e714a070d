/// Camera capture and QR decoding
///
/// This module contains the frame-source side of the scan loop:
/// - Opening and reading the live camera stream (camera.rs)
/// - Locating and decoding a QR code in a still frame (decoder.rs)

pub mod camera;
pub mod decoder;
