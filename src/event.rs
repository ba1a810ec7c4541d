use crate::Point;

/// Events the widget can respond to.
///
/// Pointer positions are in the same coordinate space as the widget bounds.
/// `GlobalMousePressed` is the host's global click observation channel and
/// fires for every click anywhere on screen, including clicks that also
/// arrive as a local `MousePressed`.
#[derive(Debug, Clone)]
pub enum Event {
    /// Mouse button pressed inside the host surface.
    MousePressed {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },
    /// Mouse button released.
    MouseReleased {
        button: MouseButton,
        position: Point,
    },
    /// Mouse moved.
    MouseMoved {
        position: Point,
        modifiers: Modifiers,
    },
    /// Mouse wheel scrolled.
    MouseWheel { delta: f32, position: Point },
    /// Double click (host-detected).
    DoubleClicked { position: Point },
    /// Keyboard key pressed.
    KeyPressed { key: Key, modifiers: Modifiers },
    /// A click observed anywhere on screen, possibly outside the widget.
    GlobalMousePressed {
        button: MouseButton,
        position: Point,
    },
    /// Pointer left the widget bounds.
    IdleOut,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard keys (simplified set for now).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    NumpadEnter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the fine-adjustment modifier is held.
    pub fn fine_adjust(&self) -> bool {
        self.shift
    }
}
