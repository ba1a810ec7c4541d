//! The bounded numeric value at the heart of the widget
//!
//! Every mutation of the stored value goes through [`ValueModel::set_value`],
//! which clamps into the configured range and recomputes the derived output.
//! Callers use the returned change flag to decide whether to emit.

use crate::constants::{DEFAULT_MAX, DEFAULT_MIN};
use crate::units::{self, UnitStyle};

/// Current value, range, reset value, and unit style of one widget instance.
#[derive(Debug, Clone)]
pub struct ValueModel {
    /// Stored value, always within `[min, max]`
    current: f32,
    /// Lower bound
    min: f32,
    /// Upper bound
    max: f32,
    /// Value applied by reset when enabled
    initial: f32,
    /// Whether the configured initial value is in effect (reset falls back
    /// to 0 when off)
    initial_enabled: bool,
    /// Display/output formatting mode
    unit_style: UnitStyle,
    /// Derived output, recomputed on every value or style change
    output: f32,
}

impl Default for ValueModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueModel {
    pub fn new() -> Self {
        Self {
            current: 0.0,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            initial: 0.0,
            initial_enabled: false,
            unit_style: UnitStyle::Default,
            output: 0.0,
        }
    }

    /// Clamp `x` into range, store it, and recompute the output.
    ///
    /// Returns whether the stored value actually changed, so callers can
    /// skip redundant emissions. Non-finite input is ignored.
    pub fn set_value(&mut self, x: f32) -> bool {
        if !x.is_finite() {
            log::debug!("ignoring non-finite value {}", x);
            return false;
        }
        let clamped = x.clamp(self.min, self.max);
        if clamped == self.current {
            return false;
        }
        self.current = clamped;
        self.refresh_output();
        true
    }

    /// Replace the bounds and re-clamp the stored value.
    ///
    /// A reversed pair is normalized by swapping. Returns whether re-clamping
    /// changed the stored value.
    pub fn set_range(&mut self, min: f32, max: f32) -> bool {
        if !min.is_finite() || !max.is_finite() {
            log::debug!("ignoring non-finite range [{}, {}]", min, max);
            return false;
        }
        if min <= max {
            self.min = min;
            self.max = max;
        } else {
            self.min = max;
            self.max = min;
        }
        let clamped = self.current.clamp(self.min, self.max);
        if clamped == self.current {
            return false;
        }
        self.current = clamped;
        self.refresh_output();
        true
    }

    /// Change the unit style and recompute the output under the new style.
    /// Returns whether the style changed.
    pub fn set_unit_style(&mut self, style: UnitStyle) -> bool {
        if style == self.unit_style {
            return false;
        }
        self.unit_style = style;
        self.refresh_output();
        true
    }

    pub fn set_initial(&mut self, initial: f32) {
        if initial.is_finite() {
            self.initial = initial;
        }
    }

    pub fn set_initial_enabled(&mut self, enabled: bool) {
        self.initial_enabled = enabled;
    }

    /// Apply the reset value through the normal value path.
    pub fn reset_to_initial(&mut self) -> bool {
        self.set_value(self.initial_value())
    }

    /// The value a reset applies: the configured initial when enabled, else 0.
    pub fn initial_value(&self) -> f32 {
        if self.initial_enabled {
            self.initial
        } else {
            0.0
        }
    }

    /// Format the stored value for display under the current unit style.
    pub fn display_text(&self) -> String {
        units::format_value(self.current, self.unit_style)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// The derived output emitted on value changes.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn initial_enabled(&self) -> bool {
        self.initial_enabled
    }

    pub fn unit_style(&self) -> UnitStyle {
        self.unit_style
    }

    fn refresh_output(&mut self) {
        self.output = units::output_value(self.current, self.unit_style);
    }
}
