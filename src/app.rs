use std::time::Duration;

use iced::widget::image::Handle;
use iced::{Subscription, Task, Theme};
use image::RgbImage;

use crate::capture::{camera, decoder};
use crate::config::AppConfig;
use crate::dispatch::{self, DispatchOutcome};
use crate::generate::{self, GeneratedImage};
use crate::state::data::{Capability, ScanRecord, ScanResult, Tab};
use crate::state::history::History;
use crate::state::session::{plan_tick, DispatchState, ScanSession, TickAction};

/// How many history entries the scan tab shows
const RECENT_SCANS_SHOWN: usize = 8;

/// Main application state
pub struct QrSentry {
    pub(crate) config: AppConfig,
    /// The scan history catalog
    pub(crate) history: History,
    pub(crate) client: reqwest::Client,
    /// Startup readiness of the capture and encoding capabilities
    pub(crate) capability: Capability,
    pub(crate) tab: Tab,

    /// The current scanning period; owns the camera stream
    pub(crate) session: Option<ScanSession>,
    /// Single-flight guard for the classification backend
    pub(crate) dispatch: DispatchState,
    /// Most recent camera frame, shown as the live preview
    pub(crate) preview: Option<Handle>,
    /// Outcome of the last completed dispatch
    pub(crate) scan_result: Option<ScanResult>,
    pub(crate) recent_scans: Vec<ScanRecord>,

    /// Text the user wants encoded
    pub(crate) encode_input: String,
    /// The last generated QR raster; replaced on each generation
    pub(crate) generated: Option<GeneratedImage>,
    /// Inline validation or encoding message on the generate tab
    pub(crate) generate_notice: Option<String>,

    /// Status message to display to the user
    pub(crate) status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The startup probe finished enumerating capabilities
    CapabilitiesProbed(Capability),
    /// User switched tabs
    TabSelected(Tab),
    /// User pressed "Start Scanning"
    StartScan,
    /// User pressed "Stop Scanning"
    StopScan,
    /// Periodic capture tick while a session is active
    CaptureTick,
    /// A classification request resolved
    ClassifyFinished(DispatchOutcome),
    /// Generator input edited
    EncodeInputChanged(String),
    /// User asked for a QR code to be generated
    GeneratePressed,
    /// User asked to save the generated PNG
    DownloadPressed,
}

impl QrSentry {
    /// Create a new instance of the application
    pub fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();

        // If this fails, we panic because the app cannot function without
        // its history catalog
        let history = History::open()
            .expect("Failed to initialize scan history database. Check permissions and disk space.");

        let scan_count = history.scan_count().unwrap_or(0);
        println!("🛰️  QR Sentry initialized ({scan_count} scans on record)");

        let recent_scans = history.recent(RECENT_SCANS_SHOWN).unwrap_or_default();

        let app = QrSentry {
            config,
            history,
            client: reqwest::Client::new(),
            capability: Capability::default(),
            tab: Tab::Scan,
            session: None,
            dispatch: DispatchState::default(),
            preview: None,
            scan_result: None,
            recent_scans,
            encode_input: String::new(),
            generated: None,
            generate_notice: None,
            status: "Checking capture and encoding capabilities...".to_string(),
        };

        // Controls stay disabled until the probe reports back
        (
            app,
            Task::perform(camera::probe_capabilities(), Message::CapabilitiesProbed),
        )
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CapabilitiesProbed(capability) => {
                self.status = if capability.scanner_ready() {
                    format!("Ready. {} camera(s) detected.", capability.cameras.len())
                } else {
                    "No camera detected. QR generation is still available.".to_string()
                };
                self.capability = capability;
                Task::none()
            }

            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }

            Message::StartScan => {
                self.start_scan();
                Task::none()
            }

            Message::StopScan => {
                self.stop_scan("Scan stopped.");
                Task::none()
            }

            Message::CaptureTick => self.capture_tick(),

            Message::ClassifyFinished(outcome) => {
                self.finish_dispatch(outcome);
                Task::none()
            }

            Message::EncodeInputChanged(text) => {
                self.encode_input = text;
                Task::none()
            }

            Message::GeneratePressed => {
                self.generate();
                Task::none()
            }

            Message::DownloadPressed => {
                self.download();
                Task::none()
            }
        }
    }

    /// The capture loop: ticks only exist while a session does
    pub fn subscription(&self) -> Subscription<Message> {
        if self.session.is_some() {
            iced::time::every(Duration::from_millis(self.config.poll_interval_ms))
                .map(|_| Message::CaptureTick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Acquire the camera and begin a scan session
    fn start_scan(&mut self) {
        if !self.capability.scanner_ready() || self.session.is_some() {
            return;
        }

        // A new session starts with a clean slate
        self.scan_result = None;
        self.preview = None;

        match ScanSession::begin(self.config.camera_index) {
            Ok(session) => {
                self.status = format!("Scanning with {}...", session.feed.name());
                self.session = Some(session);
            }
            Err(e) => {
                // Camera acquisition failure aborts just this attempt
                self.status = e.to_string();
            }
        }
    }

    /// End the session: dropping it releases the camera stream, and the
    /// tick subscription disappears with it
    fn stop_scan(&mut self, status: &str) {
        self.session = None;
        self.preview = None;
        self.status = status.to_string();
    }

    /// One tick of the capture loop: snapshot, decode, maybe dispatch
    fn capture_tick(&mut self) -> Task<Message> {
        let Some(session) = &mut self.session else {
            return Task::none();
        };

        // Source not ready: skip this tick silently
        let frame = match session.feed.frame() {
            Ok(frame) => frame,
            Err(_) => return Task::none(),
        };

        self.preview = Some(frame_handle(&frame));

        let decoded = decoder::decode_frame(&frame);
        match plan_tick(decoded, &mut self.dispatch) {
            TickAction::Skip => Task::none(),
            TickAction::Dispatch(payload) => {
                println!("🔍 Decoded payload: {payload}");
                let client = self.client.clone();
                let backend_url = self.config.backend_url.clone();
                Task::perform(
                    dispatch::classify(client, backend_url, payload),
                    Message::ClassifyFinished,
                )
            }
        }
    }

    /// Apply a resolved dispatch, even if the session was stopped while
    /// the request was in flight
    fn finish_dispatch(&mut self, outcome: DispatchOutcome) {
        self.dispatch.finish();

        if let Err(e) = self
            .history
            .record(outcome.link(), &outcome.message(), outcome.ok())
        {
            eprintln!("⚠️  Failed to record scan: {e}");
        }
        self.recent_scans = self.history.recent(RECENT_SCANS_SHOWN).unwrap_or_default();

        let ends_session = outcome.ends_session();
        self.scan_result = Some(ScanResult {
            link: outcome.link().to_string(),
            message: outcome.message(),
        });

        if ends_session {
            self.stop_scan("Code classified. Camera released.");
        }
    }

    /// Validate and render the generator input
    fn generate(&mut self) {
        if !self.capability.generator_ready {
            return;
        }

        match generate::render_qr(&self.encode_input) {
            Ok(image) => {
                // Replaces any previously rendered raster
                self.generated = Some(image);
                self.generate_notice = None;
            }
            Err(e) => {
                self.generate_notice = Some(e.to_string());
            }
        }
    }

    /// Save the generated PNG wherever the user picks
    fn download(&mut self) {
        let Some(image) = &self.generated else {
            return;
        };

        match generate::save_png(image) {
            Ok(Some(path)) => self.status = format!("Saved QR code to {}", path.display()),
            Ok(None) => {} // dialog cancelled
            Err(e) => self.status = e.to_string(),
        }
    }
}

/// Convert a camera frame into a widget-displayable raster
fn frame_handle(frame: &RgbImage) -> Handle {
    let (width, height) = frame.dimensions();

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for pixel in frame.pixels() {
        rgba.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
    }

    Handle::from_rgba(width, height, rgba)
}
