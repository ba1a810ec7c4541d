//! Interaction state machines
//!
//! Dragging, text editing, and focus tracking each get a small state machine
//! so event handling stays a total match over explicit variants instead of a
//! pile of booleans.

use crate::constants::DRAG_RECENTER_THRESHOLD;
use crate::layout::Point;

/// Result of feeding a pointer move into an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMove {
    /// No drag in progress
    Inactive,
    /// Apply a step scaled by the vertical distance travelled since the
    /// previous move (positive = upward)
    Step { delta_y: f32 },
    /// The pointer wandered too far from the anchor; the host should warp
    /// it back to `origin`
    Recenter { origin: Point },
}

/// Drag-to-adjust session state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        /// Anchor position where the drag began
        origin: Point,
        /// Vertical position at the previous move
        last_y: f32,
        /// Value when the drag began, kept for logging
        start_value: f32,
    },
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn start(&mut self, position: Point, value: f32) {
        *self = Self::Dragging {
            origin: position,
            last_y: position.y,
            start_value: value,
        };
    }

    pub fn stop(&mut self) {
        *self = Self::Idle;
    }

    pub fn origin(&self) -> Option<Point> {
        match self {
            Self::Dragging { origin, .. } => Some(*origin),
            Self::Idle => None,
        }
    }

    pub fn start_value(&self) -> Option<f32> {
        match self {
            Self::Dragging { start_value, .. } => Some(*start_value),
            Self::Idle => None,
        }
    }

    /// Advance the drag to a new vertical pointer position.
    ///
    /// If the pointer has strayed beyond the recenter threshold from the
    /// anchor, the move is swallowed and the tracked position snaps back to
    /// the anchor so the next move measures from there.
    pub fn track(&mut self, new_y: f32) -> DragMove {
        match self {
            Self::Idle => DragMove::Inactive,
            Self::Dragging { origin, last_y, .. } => {
                if (new_y - origin.y).abs() > DRAG_RECENTER_THRESHOLD {
                    *last_y = origin.y;
                    return DragMove::Recenter { origin: *origin };
                }
                // Upward movement increases the value
                let delta_y = *last_y - new_y;
                *last_y = new_y;
                DragMove::Step { delta_y }
            }
        }
    }
}

/// Characters accepted into the edit buffer.
pub fn is_valid_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

/// Text-edit session state with its blinking caret.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Inactive,
    Editing {
        buffer: String,
        cursor_visible: bool,
    },
}

impl EditSession {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Enter edit mode with `c` as the first buffered character.
    pub fn begin(&mut self, c: char) {
        *self = Self::Editing {
            buffer: c.to_string(),
            cursor_visible: true,
        };
    }

    pub fn push_char(&mut self, c: char) {
        if let Self::Editing { buffer, .. } = self {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Self::Editing { buffer, .. } = self {
            buffer.pop();
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Inactive => None,
        }
    }

    pub fn cursor_visible(&self) -> bool {
        matches!(
            self,
            Self::Editing {
                cursor_visible: true,
                ..
            }
        )
    }

    pub fn toggle_cursor(&mut self) {
        if let Self::Editing { cursor_visible, .. } = self {
            *cursor_visible = !*cursor_visible;
        }
    }

    /// Leave edit mode and hand the buffered text to the caller.
    pub fn take_buffer(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Inactive => None,
        }
    }

    /// Leave edit mode discarding the buffer.
    pub fn cancel(&mut self) {
        *self = Self::Inactive;
    }
}

/// Focus bookkeeping for the two-step blur protocol.
///
/// A press anywhere in the window may land inside or outside the widget; the
/// widget's own press handler runs first and marks `clicked_inside`, then a
/// deferred check reads and clears the mark to decide whether focus was lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusController {
    has_focus: bool,
    clicked_inside: bool,
}

impl FocusController {
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Take focus and mark the triggering press as landing inside.
    pub fn acquire(&mut self) {
        self.has_focus = true;
        self.clicked_inside = true;
    }

    /// Run the deferred focus check. Returns true when focus was lost, i.e.
    /// the widget had focus and the press did not land inside it.
    pub fn resolve_deferred(&mut self) -> bool {
        let lost = self.has_focus && !self.clicked_inside;
        if lost {
            self.has_focus = false;
        }
        self.clicked_inside = false;
        lost
    }
}
