//! Centralized constants for the value box
//!
//! All magic numbers and repeated constants are defined here for consistency
//! and easy maintenance.

use std::time::Duration;

// =============================================================================
// Typography
// =============================================================================

/// Font size for the value text
pub const FONT_SIZE: f32 = 12.0;

/// Approximate character width as a ratio of font size
/// Used for text measurement approximation
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;

// =============================================================================
// Geometry
// =============================================================================

/// Fixed widget height; resize requests with a different height are rewritten
pub const WIDGET_HEIGHT: f32 = 18.0;

/// Minimum widget width; narrower resize requests are rewritten
pub const MIN_WIDTH: f32 = 36.0;

/// Inset between the widget border and the value text
pub const CONTENT_PADDING: f32 = 3.0;

/// Width of the edit caret
pub const CURSOR_WIDTH: f32 = 1.0;

/// Border stroke width
pub const BORDER_WIDTH: f32 = 1.0;

/// Border stroke width while the widget holds focus
pub const BORDER_WIDTH_FOCUSED: f32 = 2.0;

// =============================================================================
// Drag Adjustment
// =============================================================================

/// Value change per vertical device unit while dragging
pub const NORMAL_STEP: f32 = 0.5;

/// Value change per vertical device unit with the fine modifier held
pub const FINE_STEP: f32 = 0.02;

/// Vertical offset from the drag origin beyond which the system cursor is
/// warped back to the origin so motion deltas cannot stall at a screen edge
pub const DRAG_RECENTER_THRESHOLD: f32 = 30.0;

// =============================================================================
// Value Range
// =============================================================================

/// Default lower bound when no range has been configured
pub const DEFAULT_MIN: f32 = -100.0;

/// Default upper bound when no range has been configured
pub const DEFAULT_MAX: f32 = 100.0;

/// Decibel input at or below this floor displays "-inf" and outputs 0
pub const DB_FLOOR: f32 = -80.0;

// =============================================================================
// Timing
// =============================================================================

/// Edit caret blink half-period; the caret toggles once per interval
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Delay before a global click is resolved against the clicked-inside flag
pub const FOCUS_CHECK_DELAY: Duration = Duration::from_millis(1);

/// Per-attribute increment between staggered restore writes
pub const RESTORE_STAGGER_STEP: Duration = Duration::from_millis(10);

// =============================================================================
// Helper Functions
// =============================================================================

/// Calculate approximate character width for a given font size
#[inline]
pub fn char_width(font_size: f32) -> f32 {
    font_size * CHAR_WIDTH_FACTOR
}
