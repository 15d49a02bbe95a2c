//! Theme-aware color palette for StakeSight.
//!
//! This module provides semantic colors that automatically adapt to the current theme.
//! Use these instead of hardcoded Color::from_rgb() values.

use iced::{Color, Theme};

/// Theme selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppTheme {
    #[default]
    Dark,
    Light,
}

impl AppTheme {
    /// The iced theme to render with.
    pub fn theme(self) -> Theme {
        match self {
            AppTheme::Dark => Theme::Dark,
            AppTheme::Light => Theme::Light,
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            AppTheme::Dark => AppTheme::Light,
            AppTheme::Light => AppTheme::Dark,
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            AppTheme::Dark => "Light Mode",
            AppTheme::Light => "Dark Mode",
        }
    }
}

/// Get colors from the theme's extended palette.
/// This provides theme-aware colors for consistent light/dark mode support.
pub struct ThemeColors<'a> {
    theme: &'a Theme,
}

impl<'a> ThemeColors<'a> {
    /// Create a new ThemeColors from a theme reference.
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Get the extended palette from the theme.
    fn palette(&self) -> &iced::theme::palette::Extended {
        self.theme.extended_palette()
    }

    // ========================================================================
    // Text Colors
    // ========================================================================

    /// Primary text color.
    pub fn text(&self) -> Color {
        self.palette().background.base.text
    }

    /// Muted/secondary text color.
    pub fn text_muted(&self) -> Color {
        self.palette().background.weak.text
    }

    /// Dimmed text (less important, disabled).
    pub fn text_dimmed(&self) -> Color {
        let text = self.text();
        let bg = self.palette().background.base.color;
        Color::from_rgb(
            text.r * 0.5 + bg.r * 0.5,
            text.g * 0.5 + bg.g * 0.5,
            text.b * 0.5 + bg.b * 0.5,
        )
    }

    // ========================================================================
    // Semantic Colors
    // ========================================================================

    /// Success color (green).
    pub fn success(&self) -> Color {
        self.palette().success.base.color
    }

    /// Danger/error color (red).
    pub fn danger(&self) -> Color {
        self.palette().danger.base.color
    }

    /// Primary accent color.
    pub fn primary(&self) -> Color {
        self.palette().primary.base.color
    }

    // ========================================================================
    // Border Colors
    // ========================================================================

    /// Default border color.
    pub fn border(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.25, 0.25, 0.3)
        } else {
            Color::from_rgb(0.8, 0.8, 0.82)
        }
    }

    // ========================================================================
    // Chart/Graph Colors
    // ========================================================================

    /// Chart background color.
    pub fn chart_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.08, 0.08, 0.1)
        } else {
            Color::from_rgb(0.98, 0.98, 0.99)
        }
    }

    /// Chart outer background.
    pub fn chart_outer_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.1, 0.1, 0.12)
        } else {
            Color::from_rgb(0.95, 0.95, 0.96)
        }
    }

    /// Chart grid lines.
    pub fn chart_grid(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.2, 0.2, 0.25)
        } else {
            Color::from_rgb(0.85, 0.85, 0.88)
        }
    }

    /// Chart axis labels.
    pub fn chart_label(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.5, 0.5, 0.5)
        } else {
            Color::from_rgb(0.4, 0.4, 0.4)
        }
    }

    /// Price line.
    pub fn chart_highlight(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.3, 0.8, 1.0)
        } else {
            Color::from_rgb(0.1, 0.5, 0.8)
        }
    }

    // ========================================================================
    // Card/Container Colors
    // ========================================================================

    /// Card background color.
    pub fn card_background(&self) -> Color {
        if self.is_dark() {
            Color::from_rgb(0.12, 0.12, 0.14)
        } else {
            Color::from_rgb(1.0, 1.0, 1.0)
        }
    }

    // ========================================================================
    // Status Colors (consistent across themes for recognition)
    // ========================================================================

    /// Connected status.
    pub fn status_connected(&self) -> Color {
        Color::from_rgb(0.2, 0.8, 0.2)
    }

    /// Disconnected status.
    pub fn status_disconnected(&self) -> Color {
        Color::from_rgb(0.8, 0.2, 0.2)
    }

    /// Pending status (connecting, transaction in flight).
    pub fn status_warning(&self) -> Color {
        Color::from_rgb(0.9, 0.7, 0.2)
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Check if the current theme is dark.
    pub fn is_dark(&self) -> bool {
        self.palette().is_dark
    }
}

/// Convenience function to create ThemeColors.
pub fn colors(theme: &Theme) -> ThemeColors<'_> {
    ThemeColors::new(theme)
}
