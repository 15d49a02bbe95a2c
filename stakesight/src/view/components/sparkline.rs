//! Sparkline widget for mini inline price trends.

use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke};
use iced::widget::{Canvas, container};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

/// Direction of a series from its first to its last value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Trend of `data`; fewer than two points is flat.
    pub fn of(data: &[f64]) -> Self {
        match (data.first(), data.last()) {
            (Some(first), Some(last)) if data.len() > 1 => {
                if last > first {
                    Trend::Up
                } else if last < first {
                    Trend::Down
                } else {
                    Trend::Flat
                }
            }
            _ => Trend::Flat,
        }
    }

    fn color(self) -> Color {
        match self {
            Trend::Up => Color::from_rgb(0.2, 0.8, 0.3),
            Trend::Down => Color::from_rgb(0.9, 0.3, 0.3),
            Trend::Flat => Color::from_rgb(0.3, 0.7, 0.9),
        }
    }
}

/// A mini sparkline colored by its trend.
pub struct Sparkline {
    data: Vec<f64>,
    width: f32,
    height: f32,
}

impl Sparkline {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data,
            width: 120.0,
            height: 24.0,
        }
    }

    /// Set the dimensions.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn trend(&self) -> Trend {
        Trend::of(&self.data)
    }

    /// Render the sparkline as an Iced element.
    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let color = self.trend().color();
        let sparkline_widget = SparklineWidget {
            data: self.data,
            color,
            cache: Cache::new(),
        };

        container(
            Canvas::new(sparkline_widget)
                .width(Length::Fixed(self.width))
                .height(Length::Fixed(self.height)),
        )
        .into()
    }
}

struct SparklineWidget {
    data: Vec<f64>,
    color: Color,
    cache: Cache,
}

impl<Message> canvas::Program<Message, Theme, Renderer> for SparklineWidget {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry<Renderer>> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_sparkline(frame, bounds.size());
        });

        vec![geometry]
    }
}

impl SparklineWidget {
    fn draw_sparkline(&self, frame: &mut Frame, size: Size) {
        if self.data.is_empty() {
            return;
        }

        let padding = 2.0;
        let min = self.data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = (max - min).max(1e-9);

        let effective_height = size.height - padding * 2.0;
        let effective_width = size.width - padding * 2.0;
        let last_index = self.data.len().saturating_sub(1).max(1) as f32;

        let point_at = |i: usize, value: f64| {
            let x = padding + (i as f32 / last_index) * effective_width;
            let normalized = ((value - min) / range) as f32;
            Point::new(x, padding + effective_height - normalized * effective_height)
        };

        let mut builder = canvas::path::Builder::new();
        for (i, &value) in self.data.iter().enumerate() {
            if i == 0 {
                builder.move_to(point_at(i, value));
            } else {
                builder.line_to(point_at(i, value));
            }
        }

        frame.stroke(
            &builder.build(),
            Stroke::default().with_color(self.color).with_width(1.5),
        );

        if let Some(&last_value) = self.data.last() {
            let dot = Path::circle(point_at(self.data.len() - 1, last_value), 2.0);
            frame.fill(&dot, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend() {
        assert_eq!(Trend::of(&[]), Trend::Flat);
        assert_eq!(Trend::of(&[1.0]), Trend::Flat);
        assert_eq!(Trend::of(&[1.0, 0.5, 1.2]), Trend::Up);
        assert_eq!(Trend::of(&[1.0, 1.5, 0.9]), Trend::Down);
        assert_eq!(Sparkline::new(vec![2.0, 2.0]).trend(), Trend::Flat);
    }
}
