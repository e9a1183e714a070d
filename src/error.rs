use thiserror::Error;

/// Application error taxonomy
///
/// Every variant is converted into user-visible state at the boundary
/// where it occurs; nothing here propagates far enough to crash a scan
/// session. The Display strings are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Permission denied, busy device, or no device at the configured index.
    /// Aborts the scan attempt that raised it; the session stays inactive.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The source produced no frame this tick. Callers skip the tick.
    #[error("no frame available: {0}")]
    FrameUnavailable(String),

    /// Non-2xx status, network failure, or an unreadable backend reply.
    #[error("{0}")]
    Transport(String),

    /// The backend explicitly refused to classify the payload.
    #[error("Error: {0}")]
    Classification(String),

    /// Empty generator input, rejected before the encoder is invoked.
    #[error("enter some text to encode first")]
    EmptyInput,

    /// The encoder rejected the input (e.g. too long for any QR version).
    #[error("could not encode QR code: {0}")]
    Encode(String),

    /// Writing the rendered PNG to disk failed.
    #[error("could not save QR code: {0}")]
    Save(String),
}
