/// UI composition
///
/// The view is split per tab:
/// - Scan tab: live preview, start/stop control, result panel, history (scan_tab.rs)
/// - Generate tab: text input, rendered QR preview, download (generate_tab.rs)

mod generate_tab;
mod scan_tab;

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::app::{Message, QrSentry};
use crate::state::data::Tab;

impl QrSentry {
    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let tabs = row![
            tab_button("Scan", Tab::Scan, self.tab),
            tab_button("Generate", Tab::Generate, self.tab),
        ]
        .spacing(8);

        let content = match self.tab {
            Tab::Scan => self.scan_view(),
            Tab::Generate => self.generate_view(),
        };

        let layout = column![
            text("QR Sentry").size(36),
            tabs,
            content,
            text(&self.status).size(14),
        ]
        .spacing(20)
        .padding(30)
        .align_x(Alignment::Center);

        container(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }
}

/// A tab selector; the active tab renders unpressable
fn tab_button(label: &str, tab: Tab, current: Tab) -> Element<'_, Message> {
    button(text(label))
        .on_press_maybe((tab != current).then_some(Message::TabSelected(tab)))
        .padding([6.0, 16.0])
        .into()
}
