use chrono::DateTime;
use iced::widget::{button, column, container, scrollable, text, Column, Image};
use iced::{Alignment, Element, Length};

use crate::app::{Message, QrSentry};

/// Displayed width of the live camera preview
const PREVIEW_WIDTH: f32 = 480.0;

impl QrSentry {
    /// Build the scan tab: preview, control, result panel, history
    pub(super) fn scan_view(&self) -> Element<Message> {
        let scanning = self.session.is_some();

        let mut content = Column::new().spacing(16).align_x(Alignment::Center);

        // Live preview, or a placeholder while nothing streams
        if let Some(handle) = &self.preview {
            content = content.push(
                Image::new(handle.clone()).width(Length::Fixed(PREVIEW_WIDTH)),
            );
        } else {
            let placeholder = if scanning {
                "Waiting for camera frames..."
            } else {
                "Camera preview appears here"
            };
            content = content.push(
                container(text(placeholder).size(16))
                    .center_x(Length::Fixed(PREVIEW_WIDTH))
                    .center_y(Length::Fixed(270.0)),
            );
        }

        // Start/stop control; disabled until the capability probe confirms
        // a capture device
        let control = if scanning {
            button("Stop Scanning").on_press(Message::StopScan).padding(10)
        } else {
            button("Start Scanning")
                .on_press_maybe(
                    self.capability
                        .scanner_ready()
                        .then_some(Message::StartScan),
                )
                .padding(10)
        };
        content = content.push(control);

        if scanning {
            let hint = if self.dispatch.is_in_flight() {
                "Checking payload with the classifier..."
            } else {
                "Point the camera at a QR code"
            };
            content = content.push(text(hint).size(14));
        }

        // Last dispatch outcome (verdict or inline error)
        if let Some(result) = &self.scan_result {
            content = content.push(
                column![
                    text("Last scan").size(14),
                    text(&result.link).size(16),
                    text(&result.message).size(16),
                ]
                .spacing(4)
                .align_x(Alignment::Center),
            );
        }

        if !self.recent_scans.is_empty() {
            content = content.push(self.history_list());
        }

        content.into()
    }

    /// The most recent catalog entries, newest first
    fn history_list(&self) -> Element<Message> {
        let mut list = Column::new().spacing(4);

        for record in &self.recent_scans {
            let mark = if record.ok { "✔" } else { "✖" };
            let when = DateTime::from_timestamp(record.scanned_at, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();

            list = list.push(
                text(format!("{mark} {when}  {}  {}", record.payload, record.verdict)).size(13),
            );
        }

        column![
            text("History").size(14),
            scrollable(list).height(Length::Fixed(140.0)),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into()
    }
}
