//! Centralized theme system for the value box
//!
//! Provides dark and light palettes. The widget reads colors from the global
//! theme at draw time; if the host never installs one, the dark palette is
//! the fixed fallback.

use crate::renderer::Color;

/// A complete color theme for the widget
#[derive(Debug, Clone)]
pub struct Theme {
    // ==========================================================================
    // Backgrounds
    // ==========================================================================
    /// Widget body background
    pub background: Color,

    /// Widget body background while a text edit is open
    pub background_editing: Color,

    // ==========================================================================
    // Borders
    // ==========================================================================
    /// Default border color
    pub border: Color,

    /// Border color when the widget holds focus
    pub border_focused: Color,

    // ==========================================================================
    // Text
    // ==========================================================================
    /// Value text color
    pub text: Color,

    /// Text color while a text edit is open (shows the raw buffer)
    pub text_editing: Color,

    /// Value text color while emission is gated off
    pub text_inactive: Color,

    // ==========================================================================
    // Cursor
    // ==========================================================================
    /// Blinking edit caret color
    pub cursor: Color,
}

impl Theme {
    /// Create the default dark theme
    pub fn dark() -> Self {
        Self {
            background: Color::rgb(0.11, 0.11, 0.14),
            background_editing: Color::rgb(0.14, 0.14, 0.18),

            border: Color::rgb(0.20, 0.20, 0.26),
            border_focused: Color::rgb(0.40, 0.58, 0.98),

            text: Color::rgb(0.95, 0.95, 0.97),
            text_editing: Color::rgb(0.98, 0.84, 0.36),
            text_inactive: Color::rgb(0.58, 0.58, 0.65),

            cursor: Color::rgb(0.40, 0.58, 0.98),
        }
    }

    /// Create a light theme
    pub fn light() -> Self {
        Self {
            background: Color::rgb(0.99, 0.99, 1.0),
            background_editing: Color::rgb(1.0, 1.0, 1.0),

            border: Color::rgb(0.82, 0.82, 0.86),
            border_focused: Color::rgb(0.35, 0.52, 0.92),

            text: Color::rgb(0.12, 0.12, 0.15),
            text_editing: Color::rgb(0.72, 0.48, 0.05),
            text_inactive: Color::rgb(0.62, 0.62, 0.68),

            cursor: Color::rgb(0.35, 0.52, 0.92),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

use std::sync::OnceLock;

/// Global theme singleton for convenience
/// The widget uses this to get colors without requiring the theme to be passed
static CURRENT_THEME: OnceLock<Theme> = OnceLock::new();

/// Set the global theme (can only be called once)
///
/// Returns `Err` with the provided theme if a theme has already been set.
pub fn set_theme(theme: Theme) -> Result<(), Theme> {
    CURRENT_THEME.set(theme)
}

/// Get the current global theme (or dark theme if not set)
pub fn current_theme() -> &'static Theme {
    CURRENT_THEME.get_or_init(Theme::dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors_valid() {
        let theme = Theme::dark();

        // All colors should have valid RGB values (0.0 to 1.0)
        assert!(theme.background.r >= 0.0 && theme.background.r <= 1.0);
        assert!(theme.text.r >= 0.0 && theme.text.r <= 1.0);
        assert!(theme.border_focused.r >= 0.0 && theme.border_focused.r <= 1.0);
        assert!(theme.cursor.a >= 0.0 && theme.cursor.a <= 1.0);
    }

    #[test]
    fn test_dark_theme_contrast() {
        let theme = Theme::dark();

        // Text should be lighter than background (dark theme)
        assert!(theme.text.r > theme.background.r);
        assert!(theme.text.g > theme.background.g);
        assert!(theme.text.b > theme.background.b);
    }

    #[test]
    fn test_light_theme_contrast() {
        let theme = Theme::light();

        // Text should be darker than background (light theme)
        assert!(theme.text.r < theme.background.r);
        assert!(theme.text.g < theme.background.g);
        assert!(theme.text.b < theme.background.b);
    }

    #[test]
    fn test_default_is_dark() {
        let default = Theme::default();
        let dark = Theme::dark();

        assert!((default.background.r - dark.background.r).abs() < 0.001);
        assert!((default.text.r - dark.text.r).abs() < 0.001);
    }
}
