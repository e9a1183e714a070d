use iced::widget::{button, row, text, text_input, Column, Image};
use iced::{Alignment, Element, Length};

use crate::app::{Message, QrSentry};

/// Displayed width of the generated QR preview
const QR_PREVIEW_WIDTH: f32 = 280.0;

impl QrSentry {
    /// Build the generate tab: input, rendered preview, download
    pub(super) fn generate_view(&self) -> Element<Message> {
        let ready = self.capability.generator_ready;

        let input = text_input("Text or URL to encode", &self.encode_input)
            .on_input(Message::EncodeInputChanged)
            .on_submit(Message::GeneratePressed)
            .padding(10)
            .width(Length::Fixed(420.0));

        // Disabled until the encoder self-check confirms the capability
        let generate = button("Generate")
            .on_press_maybe(ready.then_some(Message::GeneratePressed))
            .padding(10);

        let mut content = Column::new()
            .spacing(16)
            .align_x(Alignment::Center)
            .push(row![input, generate].spacing(8).align_y(Alignment::Center));

        // Validation prompt or encoder error, inline
        if let Some(notice) = &self.generate_notice {
            content = content.push(text(notice).size(14));
        }

        if let Some(image) = &self.generated {
            content = content
                .push(Image::new(image.handle.clone()).width(Length::Fixed(QR_PREVIEW_WIDTH)))
                .push(text(format!("Encoded: {}", image.text)).size(13))
                .push(
                    button("Download PNG")
                        .on_press(Message::DownloadPressed)
                        .padding(10),
                );
        }

        content.into()
    }
}
