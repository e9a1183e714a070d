/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the capture loop, the history catalog, and the UI layer.

/// Which tab is currently visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scan,
    Generate,
}

/// The last completed dispatch, shown on the scan tab
///
/// Overwritten on every completed dispatch (success or error text) and
/// cleared when a new scan session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// The decoded payload that was sent to the backend
    pub link: String,
    /// The backend's verdict, or an inline error description
    pub message: String,
}

/// One persisted scan from the history catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    /// Unique database ID
    pub id: i64,
    /// The decoded payload
    pub payload: String,
    /// Verdict or error text recorded for the dispatch
    pub verdict: String,
    /// Whether the backend produced a classification
    pub ok: bool,
    /// Unix timestamp of the dispatch completion
    pub scanned_at: i64,
}

/// Startup readiness of the capture and encoding capabilities
///
/// Both start unavailable; the probe task fills this in once it has
/// enumerated cameras and self-checked the encoder. Scan and generate
/// controls stay disabled until then.
#[derive(Debug, Clone, Default)]
pub struct Capability {
    /// Human-readable names of the detected capture devices
    pub cameras: Vec<String>,
    /// Whether the QR encoder passed its self-check
    pub generator_ready: bool,
}

impl Capability {
    /// Scanning needs at least one capture device
    pub fn scanner_ready(&self) -> bool {
        !self.cameras.is_empty()
    }
}
