//! numbox - An interactive numeric value box widget
//!
//! This crate provides a host-agnostic number box: drag to adjust, type to
//! edit, step with the keyboard. The host feeds in events and a clock, and
//! drains outputs and draw commands back out.

mod attrs;
mod constants;
mod event;
mod layout;
mod numbox;
mod persist;
mod renderer;
mod sched;
mod state;
mod theme;
mod units;
mod value;

pub use attrs::{
    AttrStore, AttrValue, Justification, MemoryStore, RestoreAttr, ATTR_INITIAL,
    ATTR_INITIAL_ENABLED, ATTR_JUSTIFICATION, ATTR_PARAM_TYPE, ATTR_RANGE, ATTR_UNIT_STYLE,
    ATTR_VISIBLE,
};
pub use constants::{MIN_WIDTH, WIDGET_HEIGHT};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use layout::{Point, Rectangle, Size};
pub use numbox::{CursorHost, NullCursor, NumBox, Output};
pub use persist::{RecordError, SaveRecord, RECORD_VERSION};
pub use renderer::{Color, DrawCommand, Renderer};
pub use theme::{current_theme, set_theme, Theme};
pub use units::UnitStyle;
pub use value::ValueModel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attrs::{AttrStore, AttrValue, Justification, MemoryStore};
    pub use crate::event::{Event, Key, Modifiers, MouseButton};
    pub use crate::layout::{Point, Rectangle, Size};
    pub use crate::numbox::{CursorHost, NullCursor, NumBox, Output};
    pub use crate::persist::SaveRecord;
    pub use crate::renderer::{Color, DrawCommand, Renderer};
    pub use crate::units::UnitStyle;
}
