use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tokio::task;

use crate::error::AppError;
use crate::state::data::Capability;

/// A live camera stream, exposing the most recent frame on demand
///
/// Exclusively owned by the current scan session; dropping the feed stops
/// the stream and releases the device.
pub struct CameraFeed {
    camera: Camera,
    name: String,
}

impl CameraFeed {
    /// Open the capture device at `index` and start streaming.
    pub fn open(index: u32) -> Result<Self, AppError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| AppError::CameraUnavailable(e.to_string()))?;

        camera
            .open_stream()
            .map_err(|e| AppError::CameraUnavailable(e.to_string()))?;

        let name = camera.info().human_name();
        println!("📷 Camera stream open: {name}");

        Ok(CameraFeed { camera, name })
    }

    /// Human-readable device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grab the most recent frame as an RGB buffer.
    ///
    /// An error here means the source is not ready yet; callers treat it
    /// as a skipped tick, not a failure.
    pub fn frame(&mut self) -> Result<RgbImage, AppError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| AppError::FrameUnavailable(e.to_string()))?;

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| AppError::FrameUnavailable(e.to_string()))?;
        let (w, h) = (decoded.width(), decoded.height());
        RgbImage::from_raw(w, h, decoded.into_raw())
            .ok_or_else(|| AppError::FrameUnavailable("frame buffer size mismatch".into()))
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        // Session teardown must always release the device
        if let Err(e) = self.camera.stop_stream() {
            eprintln!("⚠️  Failed to stop camera stream: {e}");
        }
        println!("📷 Camera stream released: {}", self.name);
    }
}

/// Probe the capture and encoding capabilities at startup.
///
/// Camera enumeration runs on a blocking task because backend discovery
/// can stall for a moment on some platforms. A probe failure disables the
/// corresponding controls; it is logged, never fatal.
pub async fn probe_capabilities() -> Capability {
    let cameras = match task::spawn_blocking(|| nokhwa::query(ApiBackend::Auto)).await {
        Ok(Ok(devices)) => devices.iter().map(|d| d.human_name()).collect(),
        Ok(Err(e)) => {
            eprintln!("⚠️  Camera enumeration failed: {e}");
            Vec::new()
        }
        Err(e) => {
            eprintln!("⚠️  Camera probe did not complete: {e}");
            Vec::new()
        }
    };

    let generator_ready = crate::generate::self_check();

    let capability = Capability {
        cameras,
        generator_ready,
    };

    println!(
        "🔌 Capabilities: {} camera(s), encoder {}",
        capability.cameras.len(),
        if capability.generator_ready { "ready" } else { "unavailable" }
    );

    capability
}
