//! Unit-style display formatting and output-value derivation
//!
//! Every style formats the stored value for display; only the decibel style
//! also transforms the emitted output (amplitude conversion, with a hard
//! floor that outputs silence).

use serde::{Deserialize, Serialize};

use crate::constants::DB_FLOOR;

/// Display/output formatting mode for the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStyle {
    Int,
    Float,
    Time,
    Hertz,
    Decibel,
    Percent,
    Pan,
    Semitone,
    MidiNote,
    Custom,
    Native,
    #[default]
    Default,
}

impl UnitStyle {
    /// Parse a style name from external configuration, case-insensitively.
    /// Unknown names fall back to [`UnitStyle::Default`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => UnitStyle::Int,
            "float" => UnitStyle::Float,
            "time" | "ms" => UnitStyle::Time,
            "hertz" | "hz" => UnitStyle::Hertz,
            "decibel" | "db" => UnitStyle::Decibel,
            "percent" | "%" => UnitStyle::Percent,
            "pan" => UnitStyle::Pan,
            "semitone" | "semitones" | "st" => UnitStyle::Semitone,
            "midinote" | "midi" | "note" => UnitStyle::MidiNote,
            "custom" => UnitStyle::Custom,
            "native" => UnitStyle::Native,
            _ => UnitStyle::Default,
        }
    }

    /// Canonical name, as written back to the configuration store.
    pub fn name(&self) -> &'static str {
        match self {
            UnitStyle::Int => "int",
            UnitStyle::Float => "float",
            UnitStyle::Time => "time",
            UnitStyle::Hertz => "hertz",
            UnitStyle::Decibel => "decibel",
            UnitStyle::Percent => "percent",
            UnitStyle::Pan => "pan",
            UnitStyle::Semitone => "semitone",
            UnitStyle::MidiNote => "midinote",
            UnitStyle::Custom => "custom",
            UnitStyle::Native => "native",
            UnitStyle::Default => "default",
        }
    }
}

/// Format a value for display under the given unit style.
pub fn format_value(value: f32, style: UnitStyle) -> String {
    match style {
        UnitStyle::Int | UnitStyle::MidiNote => format!("{}", value.round() as i64),
        UnitStyle::Float | UnitStyle::Pan | UnitStyle::Custom | UnitStyle::Native => {
            format!("{:.2}", value)
        }
        UnitStyle::Time => format!("{:.1} ms", value),
        UnitStyle::Hertz => format!("{} Hz", value.round() as i64),
        UnitStyle::Decibel => {
            if value <= DB_FLOOR {
                "-inf".to_string()
            } else {
                format!("{:.1} dB", value)
            }
        }
        UnitStyle::Percent => format!("{} %", value.round() as i64),
        UnitStyle::Semitone => format!("{:.1} st", value),
        UnitStyle::Default => format!("{:.1}", value),
    }
}

/// Derive the emitted output from the stored value under the given style.
///
/// Identical to the stored value for every style except decibel, where the
/// floor outputs 0 and everything above converts to linear amplitude.
pub fn output_value(value: f32, style: UnitStyle) -> f32 {
    match style {
        UnitStyle::Decibel => {
            if value <= DB_FLOOR {
                0.0
            } else {
                10.0_f32.powf(value / 20.0)
            }
        }
        _ => value,
    }
}
