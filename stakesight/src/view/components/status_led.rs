//! Status LED widget for the wallet connection.

use iced::widget::{container, row, text};
use iced::{Alignment, Element, Length, Theme};

use crate::view::theme::colors;

/// State shown by the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLedState {
    /// Wallet connected - green.
    Connected,
    /// Waiting on the wallet - amber.
    Pending,
    /// No wallet session - red.
    Disconnected,
}

impl StatusLedState {
    pub fn label(&self) -> &'static str {
        match self {
            StatusLedState::Connected => "Connected",
            StatusLedState::Pending => "Connecting...",
            StatusLedState::Disconnected => "Disconnected",
        }
    }
}

/// A colored dot followed by the state label.
pub struct StatusLed {
    state: StatusLedState,
    /// Diameter of the dot.
    size: f32,
}

impl StatusLed {
    pub fn new(state: StatusLedState) -> Self {
        Self { state, size: 10.0 }
    }

    /// Set the size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Render the status LED as an Iced element.
    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let state = self.state;
        let size = self.size;

        let led = container(text(""))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .style(move |theme: &Theme| {
                let palette = colors(theme);
                let color = match state {
                    StatusLedState::Connected => palette.status_connected(),
                    StatusLedState::Pending => palette.status_warning(),
                    StatusLedState::Disconnected => palette.status_disconnected(),
                };
                container::Style {
                    background: Some(iced::Background::Color(color)),
                    border: iced::Border {
                        color: palette.border(),
                        width: 1.0,
                        radius: (size / 2.0).into(),
                    },
                    ..Default::default()
                }
            });

        row![led, text(state.label()).size(14)]
            .spacing(6)
            .align_y(Alignment::Center)
            .into()
    }
}
