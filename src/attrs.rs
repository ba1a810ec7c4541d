//! Attribute store protocol
//!
//! The widget never owns its configuration source. Hosts hand it a
//! [`AttrStore`] view and notify it of changes; the widget pulls the named
//! attributes it cares about and pushes saved state back during restore.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// ATTRIBUTE NAMES
// =============================================================================

pub const ATTR_RANGE: &str = "range";
pub const ATTR_INITIAL: &str = "initial";
pub const ATTR_INITIAL_ENABLED: &str = "initial_enabled";
pub const ATTR_UNIT_STYLE: &str = "unit_style";
pub const ATTR_JUSTIFICATION: &str = "justification";
pub const ATTR_VISIBLE: &str = "visible";
pub const ATTR_PARAM_TYPE: &str = "param_type";

// =============================================================================
// VALUES
// =============================================================================

/// Loosely typed attribute payload.
///
/// Stores surface values in whatever shape the host keeps them; the accessors
/// coerce where a sensible reading exists and return `None` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Float(f32),
    Bool(bool),
    Text(String),
    FloatList(Vec<f32>),
    TextList(Vec<String>),
}

impl AttrValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Read as a flag. Numeric payloads count as set when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Float(x) => Some(*x != 0.0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f32]> {
        match self {
            Self::FloatList(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            Self::TextList(xs) => Some(xs),
            _ => None,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Host-provided attribute access.
pub trait AttrStore {
    /// Current value of a named attribute, if set.
    fn get(&self, name: &str) -> Option<AttrValue>;

    /// Publish a value under a name.
    fn set(&mut self, name: &str, value: AttrValue);
}

/// In-memory store used by the demo and the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, AttrValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttrStore for MemoryStore {
    fn get(&self, name: &str) -> Option<AttrValue> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: AttrValue) {
        self.values.insert(name.to_string(), value);
    }
}

// =============================================================================
// JUSTIFICATION
// =============================================================================

/// Horizontal text placement inside the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    #[default]
    Centre,
    Right,
}

impl Justification {
    /// Resolve a justification argument list.
    ///
    /// Matching is case-insensitive and accepts both spellings of centre.
    /// Returns the resolved placement plus a conflict flag: more than one
    /// recognized argument falls back to centred and flags the conflict, as
    /// does zero arguments without flagging.
    pub fn from_args(args: &[String]) -> (Self, bool) {
        let mut found: Option<Self> = None;
        let mut matches = 0usize;
        for arg in args {
            let parsed = match arg.to_ascii_lowercase().as_str() {
                "left" => Some(Self::Left),
                "centre" | "center" => Some(Self::Centre),
                "right" => Some(Self::Right),
                _ => None,
            };
            if let Some(j) = parsed {
                matches += 1;
                found = Some(j);
            }
        }
        match matches {
            0 => (Self::Centre, false),
            1 => (found.unwrap_or_default(), false),
            _ => (Self::Centre, true),
        }
    }
}

// =============================================================================
// RESTORE SCHEDULE
// =============================================================================

/// Attributes published back to the store after a state restore, in the
/// order they are staggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreAttr {
    Range,
    Initial,
    InitialEnabled,
    UnitStyle,
    Visible,
    ParamType,
}

impl RestoreAttr {
    pub const ALL: [Self; 6] = [
        Self::Range,
        Self::Initial,
        Self::InitialEnabled,
        Self::UnitStyle,
        Self::Visible,
        Self::ParamType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Range => ATTR_RANGE,
            Self::Initial => ATTR_INITIAL,
            Self::InitialEnabled => ATTR_INITIAL_ENABLED,
            Self::UnitStyle => ATTR_UNIT_STYLE,
            Self::Visible => ATTR_VISIBLE,
            Self::ParamType => ATTR_PARAM_TYPE,
        }
    }
}
