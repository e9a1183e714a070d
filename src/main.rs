use crate::app::QrSentry;

// Application modules
mod app;
mod capture;
mod config;
mod dispatch;
mod error;
mod generate;
mod state;
mod ui;

fn main() -> iced::Result {
    iced::application("QR Sentry", QrSentry::update, QrSentry::view)
        .subscription(QrSentry::subscription)
        .theme(QrSentry::theme)
        .centered()
        .run_with(QrSentry::new)
}
