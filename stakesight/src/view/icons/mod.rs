//! SVG icons for the StakeSight UI.
//!
//! All icons are embedded at compile time using `include_bytes!` and
//! animate their color on hover, for use inside buttons.

use iced::widget::svg::Handle;
use iced::{Element, Length};

use iced_anim::widget::svg::Svg as AnimatedSvg;

/// Icon size presets.
#[derive(Debug, Clone, Copy, Default)]
pub enum IconSize {
    /// Small icon (12px)
    Small,
    /// Medium icon (16px) - default
    #[default]
    Medium,
    /// Large icon (20px)
    Large,
}

impl IconSize {
    fn pixels(self) -> f32 {
        match self {
            IconSize::Small => 12.0,
            IconSize::Medium => 16.0,
            IconSize::Large => 20.0,
        }
    }
}

fn animated_svg_icon<Message: 'static>(
    data: &'static [u8],
    size: IconSize,
) -> Element<'static, Message> {
    let handle = Handle::from_memory(data);
    AnimatedSvg::new(handle)
        .width(Length::Fixed(size.pixels()))
        .height(Length::Fixed(size.pixels()))
        .into()
}

/// Wallet (connect/disconnect).
pub fn wallet<Message: 'static>(size: IconSize) -> Element<'static, Message> {
    animated_svg_icon(include_bytes!("wallet.svg"), size)
}

/// Up arrow in a circle.
pub fn stake<Message: 'static>(size: IconSize) -> Element<'static, Message> {
    animated_svg_icon(include_bytes!("stake.svg"), size)
}

/// Down arrow in a circle.
pub fn withdraw<Message: 'static>(size: IconSize) -> Element<'static, Message> {
    animated_svg_icon(include_bytes!("withdraw.svg"), size)
}

/// Gift box.
pub fn claim<Message: 'static>(size: IconSize) -> Element<'static, Message> {
    animated_svg_icon(include_bytes!("claim.svg"), size)
}

/// Half-filled circle (theme toggle).
pub fn theme<Message: 'static>(size: IconSize) -> Element<'static, Message> {
    animated_svg_icon(include_bytes!("theme.svg"), size)
}
