//! Price chart component using Iced canvas.

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{Element, Length, Point, Rectangle, Renderer, Size, Theme};

use super::formatting::{format_price, format_time_offset};
use super::theme::colors;
use crate::message::Message;

/// A data point for the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Timestamp in milliseconds.
    pub timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Time window for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// 1 minute window.
    OneMinute,
    /// 5 minute window (default).
    #[default]
    FiveMinutes,
    /// 15 minute window.
    FifteenMinutes,
}

impl TimeWindow {
    /// Get the window duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        match self {
            TimeWindow::OneMinute => 60_000,
            TimeWindow::FiveMinutes => 5 * 60_000,
            TimeWindow::FifteenMinutes => 15 * 60_000,
        }
    }

    /// Get the display label.
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::OneMinute => "1m",
            TimeWindow::FiveMinutes => "5m",
            TimeWindow::FifteenMinutes => "15m",
        }
    }

    /// Get all time window options.
    pub fn all() -> &'static [TimeWindow] {
        &[
            TimeWindow::OneMinute,
            TimeWindow::FiveMinutes,
            TimeWindow::FifteenMinutes,
        ]
    }

    /// Longest window; older points are dropped.
    pub fn max() -> TimeWindow {
        TimeWindow::FifteenMinutes
    }
}

/// State for the price chart.
#[derive(Debug)]
pub struct ChartState {
    data: Vec<DataPoint>,
    time_window: TimeWindow,
    title: String,
    cache: Cache,
    min_value: f64,
    max_value: f64,
    /// Right edge of the chart in milliseconds.
    current_time: i64,
}

impl ChartState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            time_window: TimeWindow::default(),
            title: title.into(),
            cache: Cache::new(),
            min_value: 0.0,
            max_value: 1.0,
            current_time: current_timestamp(),
        }
    }

    pub fn set_time_window(&mut self, window: TimeWindow) {
        if self.time_window != window {
            self.time_window = window;
            self.recalculate_bounds();
            self.cache.clear();
        }
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Add a point, move the right edge to it, and drop points older than
    /// the longest window.
    pub fn push(&mut self, point: DataPoint) {
        self.current_time = self.current_time.max(point.timestamp);
        self.data.push(point);

        let cutoff = self.current_time - TimeWindow::max().duration_ms();
        self.data.retain(|p| p.timestamp >= cutoff);

        self.recalculate_bounds();
        self.cache.clear();
    }

    /// Recent values within the current window, oldest first.
    pub fn recent_values(&self) -> Vec<f64> {
        self.visible_data().map(|p| p.value).collect()
    }

    fn visible_data(&self) -> impl Iterator<Item = &DataPoint> {
        let cutoff = self.current_time - self.time_window.duration_ms();
        self.data.iter().filter(move |p| p.timestamp >= cutoff)
    }

    fn recalculate_bounds(&mut self) {
        let stats = self.stats();
        if stats.count == 0 {
            self.min_value = 0.0;
            self.max_value = 1.0;
            return;
        }

        let range = stats.max - stats.min;
        let padding = if range < 1e-6 {
            // Flat line, add artificial padding
            stats.max.abs().max(1.0) * 0.01
        } else {
            range * 0.1
        };
        self.min_value = stats.min - padding;
        self.max_value = stats.max + padding;
    }

    /// Get statistics for the visible data.
    pub fn stats(&self) -> ChartStats {
        let visible: Vec<_> = self.visible_data().collect();

        if visible.is_empty() {
            return ChartStats::default();
        }

        let min = visible
            .iter()
            .map(|p| p.value)
            .fold(f64::INFINITY, f64::min);
        let max = visible
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max);

        let first = visible.first().map(|p| p.value);
        let current = visible.last().map(|p| p.value);

        ChartStats {
            min,
            max,
            first,
            current,
            count: visible.len(),
        }
    }
}

/// Statistics for the chart data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartStats {
    pub min: f64,
    pub max: f64,
    /// Oldest visible value.
    pub first: Option<f64>,
    /// Most recent value.
    pub current: Option<f64>,
    pub count: usize,
}

impl ChartStats {
    /// Relative change across the window, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        match (self.first, self.current) {
            (Some(first), Some(current)) if first != 0.0 => {
                Some((current - first) / first * 100.0)
            }
            _ => None,
        }
    }
}

/// Chart widget that renders the price series.
pub struct Chart<'a> {
    state: &'a ChartState,
}

impl<'a> Chart<'a> {
    pub fn new(state: &'a ChartState) -> Self {
        Self { state }
    }
}

impl<'a> canvas::Program<Message> for Chart<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.state.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, theme, bounds.size());
        });

        vec![geometry]
    }
}

impl<'a> Chart<'a> {
    fn draw_chart(&self, frame: &mut Frame, theme: &Theme, size: Size) {
        let palette = colors(theme);
        let padding = 50.0;
        let chart_width = size.width - padding * 2.0;
        let chart_height = size.height - padding * 2.0;

        if chart_width <= 0.0 || chart_height <= 0.0 {
            return;
        }

        let background = Path::rectangle(Point::ORIGIN, size);
        frame.fill(&background, palette.chart_outer_background());

        let chart_bg = Path::rectangle(
            Point::new(padding, padding),
            Size::new(chart_width, chart_height),
        );
        frame.fill(&chart_bg, palette.chart_background());

        frame.fill_text(Text {
            content: self.state.title.clone(),
            position: Point::new(padding, 10.0),
            color: palette.text(),
            size: 14.0.into(),
            ..Text::default()
        });

        frame.fill_text(Text {
            content: format!("Window: {}", self.state.time_window.label()),
            position: Point::new(size.width - padding - 80.0, 10.0),
            color: palette.chart_label(),
            size: 12.0.into(),
            ..Text::default()
        });

        let visible_data: Vec<_> = self.state.visible_data().collect();

        if visible_data.is_empty() {
            frame.fill_text(Text {
                content: "Waiting for prices...".to_string(),
                position: Point::new(size.width / 2.0 - 60.0, size.height / 2.0),
                color: palette.text_dimmed(),
                size: 16.0.into(),
                ..Text::default()
            });
            return;
        }

        let time_end = self.state.current_time;
        let time_start = time_end - self.state.time_window.duration_ms();
        let time_range = (time_end - time_start) as f64;

        let value_min = self.state.min_value;
        let value_max = self.state.max_value;
        let value_range = value_max - value_min;

        self.draw_grid(frame, theme, padding, chart_width, chart_height);

        let project = |point: &DataPoint| {
            let elapsed = (point.timestamp - time_start) as f64 / time_range;
            let x = padding + elapsed as f32 * chart_width;
            let y = padding + chart_height
                - ((point.value - value_min) / value_range) as f32 * chart_height;
            Point::new(x, y)
        };

        if visible_data.len() >= 2 {
            let mut path_builder = canvas::path::Builder::new();
            for (i, point) in visible_data.iter().enumerate() {
                if i == 0 {
                    path_builder.move_to(project(point));
                } else {
                    path_builder.line_to(project(point));
                }
            }

            frame.stroke(
                &path_builder.build(),
                Stroke::default()
                    .with_color(palette.chart_highlight())
                    .with_width(2.0),
            );
        }

        if let Some(last) = visible_data.last() {
            let dot = Path::circle(project(last), 3.0);
            frame.fill(&dot, palette.chart_highlight());
        }

        self.draw_stats(frame, theme, size, padding);
    }

    fn draw_grid(
        &self,
        frame: &mut Frame,
        theme: &Theme,
        padding: f32,
        chart_width: f32,
        chart_height: f32,
    ) {
        let palette = colors(theme);
        let value_range = self.state.max_value - self.state.min_value;

        let num_h_lines = 4;
        for i in 0..=num_h_lines {
            let y = padding + (i as f32 / num_h_lines as f32) * chart_height;
            let value = self.state.max_value - (i as f64 / num_h_lines as f64) * value_range;

            let line = Path::line(Point::new(padding, y), Point::new(padding + chart_width, y));
            frame.stroke(
                &line,
                Stroke::default()
                    .with_color(palette.chart_grid())
                    .with_width(1.0),
            );

            frame.fill_text(Text {
                content: format_price(value),
                position: Point::new(2.0, y - 6.0),
                color: palette.chart_label(),
                size: 10.0.into(),
                ..Text::default()
            });
        }

        let num_v_lines = 4;
        for i in 0..=num_v_lines {
            let x = padding + (i as f32 / num_v_lines as f32) * chart_width;

            let line = Path::line(
                Point::new(x, padding),
                Point::new(x, padding + chart_height),
            );
            frame.stroke(
                &line,
                Stroke::default()
                    .with_color(palette.chart_grid())
                    .with_width(1.0),
            );

            let time_offset =
                self.state.time_window.duration_ms() as f64 * (1.0 - i as f64 / num_v_lines as f64);

            frame.fill_text(Text {
                content: format_time_offset(time_offset as i64),
                position: Point::new(x - 15.0, padding + chart_height + 15.0),
                color: palette.chart_label(),
                size: 10.0.into(),
                ..Text::default()
            });
        }
    }

    fn draw_stats(&self, frame: &mut Frame, theme: &Theme, size: Size, padding: f32) {
        let stats = self.state.stats();
        let palette = colors(theme);
        let stats_x = size.width - padding - 110.0;
        let stats_y = padding + 10.0;
        let line_height = 14.0;

        let change = stats
            .change_pct()
            .map_or("-".to_string(), |pct| format!("{:+.2}%", pct));

        let stats_lines = [
            format!(
                "Current: {}",
                stats.current.map_or("-".to_string(), format_price)
            ),
            format!("Min: {}", format_price(stats.min)),
            format!("Max: {}", format_price(stats.max)),
            format!("Change: {}", change),
        ];

        for (i, line) in stats_lines.into_iter().enumerate() {
            frame.fill_text(Text {
                content: line,
                position: Point::new(stats_x, stats_y + i as f32 * line_height),
                color: palette.text_muted(),
                size: 11.0.into(),
                ..Text::default()
            });
        }
    }
}

/// Create a chart element.
pub fn chart_view(state: &ChartState) -> Element<'_, Message> {
    Canvas::new(Chart::new(state))
        .width(Length::Fill)
        .height(Length::Fixed(220.0))
        .into()
}

/// Get the current timestamp in milliseconds.
pub fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_at(now: i64) -> ChartState {
        let mut chart = ChartState::new("test");
        chart.current_time = now;
        chart
    }

    #[test]
    fn test_time_window_duration() {
        assert_eq!(TimeWindow::OneMinute.duration_ms(), 60_000);
        assert_eq!(TimeWindow::FiveMinutes.duration_ms(), 300_000);
        assert_eq!(TimeWindow::FifteenMinutes.duration_ms(), 900_000);
        assert_eq!(TimeWindow::all().len(), 3);
    }

    #[test]
    fn test_chart_stats() {
        let mut chart = chart_at(10_000);

        chart.push(DataPoint::new(5000, 1.0));
        chart.push(DataPoint::new(6000, 1.2));
        chart.push(DataPoint::new(7000, 1.1));

        let stats = chart.stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.2);
        assert_eq!(stats.current, Some(1.1));
        assert!((stats.change_pct().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_limits_visible_points() {
        let mut chart = chart_at(0);
        for second in 0..=600 {
            chart.push(DataPoint::new(second * 1000, second as f64));
        }

        assert_eq!(chart.stats().count, 301);

        chart.set_time_window(TimeWindow::OneMinute);
        assert_eq!(chart.stats().count, 61);
        assert_eq!(chart.stats().min, 540.0);

        chart.set_time_window(TimeWindow::FifteenMinutes);
        assert_eq!(chart.stats().count, 601);
    }

    #[test]
    fn test_old_points_are_dropped() {
        let mut chart = chart_at(0);
        for second in 0..=1000 {
            chart.push(DataPoint::new(second * 1000, 1.0));
        }

        assert_eq!(chart.len(), 901);
        assert_eq!(chart.recent_values().len(), 301);
    }

    #[test]
    fn test_empty_stats() {
        let chart = chart_at(0);
        assert!(chart.is_empty());
        assert_eq!(chart.stats(), ChartStats::default());
        assert_eq!(chart.stats().change_pct(), None);
    }
}
