//! The number box widget
//!
//! Owns the value model and the interaction state machines, consumes host
//! events, and buffers outputs and draw commands for the host to drain.
//! Attribute configuration flows in through an [`AttrStore`] and pointer
//! control flows out through a [`CursorHost`], so the widget itself stays
//! free of host specifics.

use web_time::Instant;

use crate::attrs::{
    AttrStore, AttrValue, Justification, RestoreAttr, ATTR_INITIAL, ATTR_INITIAL_ENABLED,
    ATTR_JUSTIFICATION, ATTR_PARAM_TYPE, ATTR_RANGE, ATTR_UNIT_STYLE, ATTR_VISIBLE,
};
use crate::constants::{
    char_width, BLINK_INTERVAL, BORDER_WIDTH, BORDER_WIDTH_FOCUSED, CONTENT_PADDING, CURSOR_WIDTH,
    FINE_STEP, FOCUS_CHECK_DELAY, FONT_SIZE, MIN_WIDTH, NORMAL_STEP, RESTORE_STAGGER_STEP,
    WIDGET_HEIGHT,
};
use crate::event::{Event, Key, Modifiers, MouseButton};
use crate::layout::{Point, Rectangle, Size};
use crate::persist::{SaveRecord, RECORD_VERSION};
use crate::renderer::Renderer;
use crate::sched::{Scheduler, Task, TimerHandle};
use crate::state::{is_valid_char, DragMove, DragSession, EditSession, FocusController};
use crate::theme;
use crate::units::UnitStyle;
use crate::value::ValueModel;

/// Outputs the widget queues for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Output {
    /// Converted value for downstream consumers. Withheld while inactive.
    Value(f32),
    /// Request for the host to report the pointer position.
    PollPointer,
    /// State changed in a way worth persisting.
    Changed,
}

/// Host-provided pointer control.
///
/// Dragging hides the pointer and warps it back to the press position, both
/// on release and when it strays too far mid-drag.
pub trait CursorHost {
    fn hide(&mut self);
    fn show(&mut self);
    fn warp(&mut self, x: f32, y: f32);
}

/// Cursor host that ignores every request, for hosts without pointer control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCursor;

impl CursorHost for NullCursor {
    fn hide(&mut self) {}
    fn show(&mut self) {}
    fn warp(&mut self, _x: f32, _y: f32) {}
}

fn step_for(modifiers: &Modifiers) -> f32 {
    if modifiers.fine_adjust() {
        FINE_STEP
    } else {
        NORMAL_STEP
    }
}

/// An interactive numeric value box.
#[derive(Debug)]
pub struct NumBox {
    value: ValueModel,
    edit: EditSession,
    drag: DragSession,
    focus: FocusController,
    justification: Justification,
    justification_conflict: bool,
    /// Gates `Output::Value` emission
    active: bool,
    visible: bool,
    param_type: String,
    bounds: Rectangle,
    sched: Scheduler,
    blink_timer: Option<TimerHandle>,
    focus_timer: Option<TimerHandle>,
    restore_timers: Vec<TimerHandle>,
    pending_restore: Option<SaveRecord>,
    restore_remaining: u8,
    outputs: Vec<Output>,
    needs_redraw: bool,
}

impl Default for NumBox {
    fn default() -> Self {
        Self::new()
    }
}

impl NumBox {
    pub fn new() -> Self {
        Self {
            value: ValueModel::new(),
            edit: EditSession::default(),
            drag: DragSession::default(),
            focus: FocusController::default(),
            justification: Justification::default(),
            justification_conflict: false,
            active: true,
            visible: true,
            param_type: "float".to_string(),
            bounds: Rectangle::new(0.0, 0.0, MIN_WIDTH, WIDGET_HEIGHT),
            sched: Scheduler::new(),
            blink_timer: None,
            focus_timer: None,
            restore_timers: Vec::new(),
            pending_restore: None,
            restore_remaining: 0,
            outputs: Vec::new(),
            needs_redraw: true,
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Place the widget, clamping the size to its sizing rules.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        let size = Self::clamp_size(bounds.size());
        self.bounds = Rectangle::new(bounds.x, bounds.y, size.width, size.height);
        self.needs_redraw = true;
    }

    /// Apply a host resize request. The height is fixed and the width has a
    /// floor, so the granted size may differ from the request.
    pub fn resize(&mut self, requested: Size) -> Size {
        let size = Self::clamp_size(requested);
        self.bounds = Rectangle::new(self.bounds.x, self.bounds.y, size.width, size.height);
        self.needs_redraw = true;
        size
    }

    fn clamp_size(requested: Size) -> Size {
        Size::new(requested.width.max(MIN_WIDTH), WIDGET_HEIGHT)
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Feed one host event into the widget.
    pub fn handle_event(
        &mut self,
        event: &Event,
        now: Instant,
        store: &dyn AttrStore,
        cursor: &mut dyn CursorHost,
    ) {
        match event {
            Event::MousePressed {
                button, position, ..
            } => {
                if *button == MouseButton::Left && self.bounds.contains(*position) {
                    self.focus.acquire();
                    self.refresh_config(store);
                    // An open edit commits before the drag takes over, so the
                    // two sessions never run at once
                    self.commit_edit();
                    self.drag.start(*position, self.value.current());
                    self.outputs.push(Output::PollPointer);
                    cursor.hide();
                    self.needs_redraw = true;
                    log::debug!("drag started at ({}, {})", position.x, position.y);
                }
            }
            Event::MouseMoved {
                position,
                modifiers,
            } => match self.drag.track(position.y) {
                DragMove::Inactive => {}
                DragMove::Step { delta_y } => {
                    self.apply_user_value(self.value.current() + delta_y * step_for(modifiers));
                }
                DragMove::Recenter { origin } => {
                    cursor.warp(origin.x, origin.y);
                }
            },
            Event::MouseReleased { button, .. } => {
                if *button == MouseButton::Left && self.drag.is_dragging() {
                    self.finish_drag(cursor);
                }
            }
            Event::DoubleClicked { position } => {
                if self.bounds.contains(*position) {
                    self.reset(store);
                }
            }
            Event::MouseWheel { delta, position } => {
                if self.bounds.contains(*position) {
                    self.apply_user_value(self.value.current() + NORMAL_STEP * delta.signum());
                }
            }
            Event::KeyPressed { key, modifiers } => {
                if self.focus.has_focus() {
                    self.handle_key(*key, *modifiers, now, store);
                }
            }
            Event::GlobalMousePressed { button, .. } => {
                if *button == MouseButton::Left && self.focus.has_focus() {
                    // Only the most recent press decides focus
                    if let Some(handle) = self.focus_timer.take() {
                        self.sched.cancel(handle);
                    }
                    self.focus_timer =
                        Some(self.sched.schedule(now, FOCUS_CHECK_DELAY, Task::FocusCheck));
                }
            }
            Event::IdleOut => {
                if self.drag.is_dragging() {
                    self.finish_drag(cursor);
                }
            }
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers, now: Instant, store: &dyn AttrStore) {
        match key {
            Key::Char(c) => {
                // Typing is inert while the pointer is adjusting the value
                if is_valid_char(c) && !self.drag.is_dragging() {
                    if self.edit.is_editing() {
                        self.edit.push_char(c);
                    } else {
                        self.begin_edit(c, now);
                    }
                    self.needs_redraw = true;
                }
            }
            Key::Backspace => {
                if self.edit.is_editing() {
                    self.edit.backspace();
                    self.needs_redraw = true;
                }
            }
            Key::Enter | Key::NumpadEnter => {
                self.commit_edit();
            }
            Key::Escape => {
                if self.edit.is_editing() {
                    self.cancel_edit();
                }
            }
            Key::Up => {
                self.refresh_config(store);
                self.commit_edit();
                self.apply_user_value(self.value.current() + step_for(&modifiers));
            }
            Key::Down => {
                self.refresh_config(store);
                self.commit_edit();
                self.apply_user_value(self.value.current() - step_for(&modifiers));
            }
            Key::Delete
            | Key::Tab
            | Key::Space
            | Key::Left
            | Key::Right
            | Key::Home
            | Key::End
            | Key::PageUp
            | Key::PageDown => {}
        }
    }

    fn finish_drag(&mut self, cursor: &mut dyn CursorHost) {
        if let (Some(origin), Some(start)) = (self.drag.origin(), self.drag.start_value()) {
            cursor.warp(origin.x, origin.y);
            cursor.show();
            log::debug!("drag finished: {} -> {}", start, self.value.current());
        }
        self.drag.stop();
        self.needs_redraw = true;
    }

    // =========================================================================
    // Deferred tasks
    // =========================================================================

    /// Run every task that has come due. Hosts call this on their frame or
    /// timer cadence with the current time.
    pub fn tick(&mut self, now: Instant, store: &mut dyn AttrStore) {
        for task in self.sched.take_due(now) {
            match task {
                Task::BlinkTick => {
                    self.blink_timer = None;
                    if self.edit.is_editing() {
                        self.edit.toggle_cursor();
                        self.needs_redraw = true;
                        self.arm_blink(now);
                    }
                }
                Task::FocusCheck => {
                    self.focus_timer = None;
                    if self.focus.resolve_deferred() {
                        self.commit_edit();
                        self.needs_redraw = true;
                        log::debug!("focus lost");
                    }
                }
                Task::RestoreAttr(attr) => {
                    if let Some(record) = &self.pending_restore {
                        store.set(attr.name(), record.restore_value(attr));
                        self.restore_remaining = self.restore_remaining.saturating_sub(1);
                        if self.restore_remaining == 0 {
                            self.pending_restore = None;
                            self.restore_timers.clear();
                            log::debug!("restore publication complete");
                        }
                    }
                }
            }
        }
    }

    /// When the host should next call [`tick`](Self::tick), if anything is
    /// pending.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.sched.next_due()
    }

    // =========================================================================
    // Value access
    // =========================================================================

    /// Apply a host-driven value change, as from an inbound set message.
    /// The configuration is re-read first so clamping uses current bounds.
    pub fn set_value(&mut self, x: f32, store: &dyn AttrStore) {
        self.refresh_config(store);
        self.apply_user_value(x);
    }

    /// Apply a value change without raising a change notification. The value
    /// still flows to the output.
    pub fn set_value_programmatic(&mut self, x: f32, store: &dyn AttrStore) {
        self.refresh_config(store);
        self.apply_programmatic_value(x);
    }

    /// Return to the configured initial value, as on double-click.
    pub fn reset(&mut self, store: &dyn AttrStore) {
        self.refresh_config(store);
        self.apply_user_value(self.value.initial_value());
    }

    /// Toggle output gating. Re-activation re-announces the current value so
    /// downstream consumers resynchronize.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            self.outputs.push(Output::Value(self.value.output()));
        }
        self.needs_redraw = true;
    }

    /// Current stored value.
    pub fn value(&self) -> f32 {
        self.value.current()
    }

    /// Current converted output value.
    pub fn output_value(&self) -> f32 {
        self.value.output()
    }

    /// The value as it is currently shown, honoring the unit style.
    pub fn display_text(&self) -> String {
        self.value.display_text()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn has_focus(&self) -> bool {
        self.focus.has_focus()
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    /// Whether the last justification read had conflicting arguments.
    pub fn justification_conflicted(&self) -> bool {
        self.justification_conflict
    }

    pub fn param_type(&self) -> &str {
        &self.param_type
    }

    /// Drain the queued outputs.
    pub fn take_outputs(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.outputs)
    }

    /// Whether the widget needs redrawing, clearing the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Snapshot the widget for embedding in a host document.
    pub fn save(&self) -> SaveRecord {
        SaveRecord {
            version: RECORD_VERSION,
            value: self.value.current(),
            min: self.value.min(),
            max: self.value.max(),
            initial: self.value.initial(),
            justification: self.justification,
            active: self.active,
            initial_enabled: self.value.initial_enabled(),
            unit_style: self.value.unit_style(),
            visible: self.visible,
            param_type: self.param_type.clone(),
        }
    }

    /// Load a saved record.
    ///
    /// All fields apply to the widget immediately and silently; the attribute
    /// publications back to the store are staggered over the following ticks
    /// so the host sees them arrive one at a time.
    pub fn restore(&mut self, record: SaveRecord, now: Instant) {
        self.value.set_range(record.min, record.max);
        self.value.set_value(record.value);
        self.value.set_initial(record.initial);
        self.value.set_initial_enabled(record.initial_enabled);
        self.value.set_unit_style(record.unit_style);
        self.justification = record.justification;
        self.justification_conflict = false;
        self.active = record.active;
        self.visible = record.visible;
        self.param_type = record.param_type.clone();
        self.needs_redraw = true;

        // A newer restore supersedes any still-pending publications
        for handle in self.restore_timers.drain(..) {
            self.sched.cancel(handle);
        }
        self.restore_remaining = RestoreAttr::ALL.len() as u8;
        for (i, attr) in RestoreAttr::ALL.iter().enumerate() {
            let handle = self.sched.schedule(
                now,
                RESTORE_STAGGER_STEP * (i as u32 + 1),
                Task::RestoreAttr(*attr),
            );
            self.restore_timers.push(handle);
        }
        self.pending_restore = Some(record);
        log::debug!("restore applied, publication scheduled");
    }

    // =========================================================================
    // Attribute synchronization
    // =========================================================================

    /// Host notification that a named attribute changed in the store.
    /// Unrecognized names are ignored.
    pub fn attr_changed(&mut self, name: &str, store: &dyn AttrStore) {
        match name {
            ATTR_RANGE => self.refresh_range(store),
            ATTR_INITIAL | ATTR_INITIAL_ENABLED => self.refresh_initial(store),
            ATTR_UNIT_STYLE => self.refresh_unit_style(store),
            ATTR_JUSTIFICATION => self.refresh_justification(store),
            ATTR_VISIBLE => self.refresh_visible(store),
            ATTR_PARAM_TYPE => self.refresh_param_type(store),
            other => log::debug!("ignoring unknown attribute '{}'", other),
        }
    }

    /// Pull the full attribute set, as at session start.
    pub fn sync_from_store(&mut self, store: &dyn AttrStore) {
        self.refresh_config(store);
        self.refresh_visible(store);
        self.refresh_param_type(store);
    }

    /// Pull every value-affecting attribute, as at the start of an
    /// interaction.
    fn refresh_config(&mut self, store: &dyn AttrStore) {
        self.refresh_range(store);
        self.refresh_initial(store);
        self.refresh_unit_style(store);
        self.refresh_justification(store);
    }

    /// Pull the range attribute. A malformed payload keeps the previous
    /// range.
    fn refresh_range(&mut self, store: &dyn AttrStore) {
        let Some(value) = store.get(ATTR_RANGE) else {
            return;
        };
        if let Some(&[min, max, ..]) = value.as_float_list() {
            if self.value.set_range(min, max) {
                self.emit_current();
                self.outputs.push(Output::Changed);
                self.needs_redraw = true;
            }
        } else {
            log::warn!("malformed range attribute: {:?}", value);
        }
    }

    fn refresh_initial(&mut self, store: &dyn AttrStore) {
        if let Some(x) = store.get(ATTR_INITIAL).and_then(|v| v.as_float()) {
            self.value.set_initial(x);
        }
        if let Some(enabled) = store.get(ATTR_INITIAL_ENABLED).and_then(|v| v.as_bool()) {
            self.value.set_initial_enabled(enabled);
        }
    }

    fn refresh_unit_style(&mut self, store: &dyn AttrStore) {
        if let Some(name) = store.get(ATTR_UNIT_STYLE) {
            if let Some(s) = name.as_text() {
                if self.value.set_unit_style(UnitStyle::from_name(s)) {
                    self.needs_redraw = true;
                }
            }
        }
    }

    /// Pull the justification attribute, accepting a single name or an
    /// argument list. Conflicting arguments fall back to centred.
    fn refresh_justification(&mut self, store: &dyn AttrStore) {
        let Some(value) = store.get(ATTR_JUSTIFICATION) else {
            return;
        };
        let args: Vec<String> = match &value {
            AttrValue::Text(s) => vec![s.clone()],
            AttrValue::TextList(xs) => xs.clone(),
            other => {
                log::warn!("malformed justification attribute: {:?}", other);
                return;
            }
        };
        let (justification, conflict) = Justification::from_args(&args);
        if conflict {
            log::warn!("conflicting justification arguments: {:?}", args);
        }
        self.justification_conflict = conflict;
        if justification != self.justification {
            self.justification = justification;
            self.needs_redraw = true;
        }
    }

    fn refresh_visible(&mut self, store: &dyn AttrStore) {
        if let Some(visible) = store.get(ATTR_VISIBLE).and_then(|v| v.as_bool()) {
            if visible != self.visible {
                self.visible = visible;
                self.needs_redraw = true;
            }
        }
    }

    fn refresh_param_type(&mut self, store: &dyn AttrStore) {
        if let Some(value) = store.get(ATTR_PARAM_TYPE) {
            if let Some(s) = value.as_text() {
                self.param_type = s.to_string();
            }
        }
    }

    // =========================================================================
    // Value application
    // =========================================================================

    fn apply_user_value(&mut self, x: f32) {
        if self.value.set_value(x) {
            self.emit_current();
            self.outputs.push(Output::Changed);
            self.needs_redraw = true;
        }
    }

    fn apply_programmatic_value(&mut self, x: f32) {
        if self.value.set_value(x) {
            self.emit_current();
            self.needs_redraw = true;
        }
    }

    /// Queue the current output value unless emission is gated off.
    fn emit_current(&mut self) {
        if self.active {
            self.outputs.push(Output::Value(self.value.output()));
        }
    }

    // =========================================================================
    // Text editing
    // =========================================================================

    fn begin_edit(&mut self, c: char, now: Instant) {
        self.edit.begin(c);
        self.arm_blink(now);
        log::debug!("edit started with '{}'", c);
    }

    /// Leave edit mode, applying the buffer when it parses as a number.
    fn commit_edit(&mut self) {
        self.stop_blink();
        if let Some(buffer) = self.edit.take_buffer() {
            match buffer.parse::<f32>() {
                Ok(x) => self.apply_user_value(x),
                Err(_) => log::debug!("discarding unparseable edit '{}'", buffer),
            }
            self.needs_redraw = true;
        }
    }

    /// Leave edit mode discarding the buffer.
    fn cancel_edit(&mut self) {
        self.stop_blink();
        self.edit.cancel();
        self.needs_redraw = true;
        log::debug!("edit cancelled");
    }

    fn arm_blink(&mut self, now: Instant) {
        self.blink_timer = Some(self.sched.schedule(now, BLINK_INTERVAL, Task::BlinkTick));
    }

    fn stop_blink(&mut self) {
        if let Some(handle) = self.blink_timer.take() {
            self.sched.cancel(handle);
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Push this frame's draw commands. Hidden widgets draw nothing.
    pub fn draw(&self, renderer: &mut Renderer) {
        if !self.visible {
            return;
        }
        let theme = theme::current_theme();

        let background = if self.edit.is_editing() {
            theme.background_editing
        } else {
            theme.background
        };
        renderer.fill_rect(self.bounds, background);

        let (border, border_width) = if self.focus.has_focus() {
            (theme.border_focused, BORDER_WIDTH_FOCUSED)
        } else {
            (theme.border, BORDER_WIDTH)
        };
        renderer.stroke_rect(self.bounds, border, border_width);

        let content = self.bounds.with_padding(CONTENT_PADDING);
        let text = match self.edit.buffer() {
            Some(buffer) => buffer.to_string(),
            None => self.value.display_text(),
        };
        let color = if self.edit.is_editing() {
            theme.text_editing
        } else if self.active {
            theme.text
        } else {
            theme.text_inactive
        };

        let text_width = text.chars().count() as f32 * char_width(FONT_SIZE);
        let text_x = match self.justification {
            Justification::Left => content.x,
            Justification::Centre => content.x + (content.width - text_width) / 2.0,
            Justification::Right => content.x + content.width - text_width,
        };
        // Long values overflow to the right rather than past the left edge
        let text_x = text_x.max(content.x);
        let text_y = content.y + (content.height - FONT_SIZE) / 2.0;
        renderer.draw_text(&text, Point::new(text_x, text_y), color, FONT_SIZE);

        if self.edit.is_editing() && self.edit.cursor_visible() {
            let cursor_x = text_x + text_width + 1.0;
            renderer.fill_rect(
                Rectangle::new(cursor_x, content.y, CURSOR_WIDTH, content.height),
                theme.cursor,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::attrs::MemoryStore;
    use crate::renderer::DrawCommand;

    #[derive(Debug, Default)]
    struct TestCursor {
        hidden: u32,
        shown: u32,
        warps: Vec<(f32, f32)>,
    }

    impl CursorHost for TestCursor {
        fn hide(&mut self) {
            self.hidden += 1;
        }

        fn show(&mut self) {
            self.shown += 1;
        }

        fn warp(&mut self, x: f32, y: f32) {
            self.warps.push((x, y));
        }
    }

    fn press(position: Point) -> Event {
        Event::MousePressed {
            button: MouseButton::Left,
            position,
            modifiers: Modifiers::default(),
        }
    }

    fn global_press(position: Point) -> Event {
        Event::GlobalMousePressed {
            button: MouseButton::Left,
            position,
        }
    }

    fn release(position: Point) -> Event {
        Event::MouseReleased {
            button: MouseButton::Left,
            position,
        }
    }

    fn moved(position: Point) -> Event {
        Event::MouseMoved {
            position,
            modifiers: Modifiers::default(),
        }
    }

    fn moved_fine(position: Point) -> Event {
        Event::MouseMoved {
            position,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        }
    }

    fn key(k: Key) -> Event {
        Event::KeyPressed {
            key: k,
            modifiers: Modifiers::default(),
        }
    }

    /// Widget placed at (0, 100) sized 100x18, with an empty store.
    fn rig() -> (NumBox, MemoryStore, TestCursor, Instant) {
        let mut nb = NumBox::new();
        nb.set_bounds(Rectangle::new(0.0, 100.0, 100.0, 18.0));
        (nb, MemoryStore::new(), TestCursor::default(), Instant::now())
    }

    fn inside() -> Point {
        Point::new(50.0, 109.0)
    }

    /// Full click: local press, the matching global press, release, and the
    /// deferred focus check.
    fn click_inside(
        nb: &mut NumBox,
        store: &mut MemoryStore,
        cursor: &mut TestCursor,
        now: Instant,
    ) -> Instant {
        nb.handle_event(&press(inside()), now, store, cursor);
        nb.handle_event(&global_press(inside()), now, store, cursor);
        nb.handle_event(&release(inside()), now, store, cursor);
        let after = now + Duration::from_millis(2);
        nb.tick(after, store);
        after
    }

    #[test]
    fn test_press_inside_takes_focus_and_polls() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        assert!(nb.has_focus());
        assert!(nb.is_dragging());
        assert_eq!(nb.take_outputs(), vec![Output::PollPointer]);
        assert_eq!(cursor.hidden, 1);
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(Point::new(50.0, 50.0)), t0, &store, &mut cursor);
        assert!(!nb.has_focus());
        assert!(!nb.is_dragging());
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_right_press_is_ignored() {
        let (mut nb, store, mut cursor, t0) = rig();
        let event = Event::MousePressed {
            button: MouseButton::Right,
            position: inside(),
            modifiers: Modifiers::default(),
        };
        nb.handle_event(&event, t0, &store, &mut cursor);
        assert!(!nb.is_dragging());
    }

    #[test]
    fn test_drag_up_increases_value() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.take_outputs();

        // 10 units upward at the normal step
        nb.handle_event(&moved(Point::new(50.0, 99.0)), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 5.0);
        assert_eq!(nb.take_outputs(), vec![Output::Value(5.0), Output::Changed]);

        nb.handle_event(&moved(Point::new(50.0, 103.0)), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 3.0);
    }

    #[test]
    fn test_drag_fine_step() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.handle_event(&moved_fine(Point::new(50.0, 99.0)), t0, &store, &mut cursor);
        assert!((nb.value() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_drag_recenter_warps_without_value_change() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.take_outputs();

        nb.handle_event(&moved(Point::new(50.0, 140.0)), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 0.0);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
        assert_eq!(cursor.warps, vec![(50.0, 109.0)]);

        // After the warp, steps measure from the press position again
        nb.handle_event(&moved(Point::new(50.0, 99.0)), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 5.0);
    }

    #[test]
    fn test_release_restores_cursor() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.handle_event(&moved(Point::new(50.0, 99.0)), t0, &store, &mut cursor);
        nb.handle_event(&release(Point::new(50.0, 99.0)), t0, &store, &mut cursor);

        assert!(!nb.is_dragging());
        assert_eq!(cursor.warps, vec![(50.0, 109.0)]);
        assert_eq!(cursor.shown, 1);
        // Keyboard focus survives the release
        assert!(nb.has_focus());
    }

    #[test]
    fn test_idle_out_ends_drag() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.handle_event(&Event::IdleOut, t0, &store, &mut cursor);
        assert!(!nb.is_dragging());
        assert_eq!(cursor.warps, vec![(50.0, 109.0)]);
        assert!(nb.has_focus());
    }

    #[test]
    fn test_wheel_steps_value() {
        let (mut nb, store, mut cursor, t0) = rig();
        let event = Event::MouseWheel {
            delta: 3.0,
            position: inside(),
        };
        nb.handle_event(&event, t0, &store, &mut cursor);
        assert_eq!(nb.value(), 0.5);

        let event = Event::MouseWheel {
            delta: -0.5,
            position: inside(),
        };
        nb.handle_event(&event, t0, &store, &mut cursor);
        assert_eq!(nb.value(), 0.0);
    }

    #[test]
    fn test_edit_commit_applies_typed_value() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.take_outputs();

        nb.handle_event(&key(Key::Char('4')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('2')), t1, &store, &mut cursor);
        assert!(nb.is_editing());

        nb.handle_event(&key(Key::Enter), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.value(), 42.0);
        assert_eq!(nb.take_outputs(), vec![Output::Value(42.0), Output::Changed]);
    }

    #[test]
    fn test_numpad_enter_commits() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('7')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::NumpadEnter), t1, &store, &mut cursor);
        assert_eq!(nb.value(), 7.0);
    }

    #[test]
    fn test_invalid_char_does_not_start_edit() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.take_outputs();
        nb.handle_event(&key(Key::Char('a')), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_keys_ignored_without_focus() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&key(Key::Char('5')), t0, &store, &mut cursor);
        assert!(!nb.is_editing());
        nb.handle_event(&key(Key::Up), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 0.0);
    }

    #[test]
    fn test_escape_cancels_edit() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.set_value(10.0, &store);
        nb.take_outputs();

        nb.handle_event(&key(Key::Char('9')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Escape), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.value(), 10.0);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_unparseable_edit_is_discarded() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.take_outputs();

        nb.handle_event(&key(Key::Char('-')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('.')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('-')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Enter), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.value(), 0.0);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_arrow_keys_step_value() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Up), t1, &store, &mut cursor);
        assert_eq!(nb.value(), 0.5);
        nb.handle_event(&key(Key::Down), t1, &store, &mut cursor);
        assert_eq!(nb.value(), 0.0);

        let fine_up = Event::KeyPressed {
            key: Key::Up,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        };
        nb.handle_event(&fine_up, t1, &store, &mut cursor);
        assert!((nb.value() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_arrow_commits_pending_edit_first() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('4')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('2')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Up), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.value(), 42.5);
    }

    #[test]
    fn test_press_during_edit_commits_first() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('4')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('2')), t1, &store, &mut cursor);
        nb.take_outputs();

        // A second press inside closes the edit before the drag begins
        nb.handle_event(&press(inside()), t1, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert!(nb.is_dragging());
        assert_eq!(nb.value(), 42.0);
        assert_eq!(
            nb.take_outputs(),
            vec![Output::Value(42.0), Output::Changed, Output::PollPointer]
        );
        // The blink timer died with the edit
        assert_eq!(nb.next_wakeup(), None);

        // Mid-drag frames show the live value, not the old buffer
        nb.handle_event(&moved(Point::new(50.0, 99.0)), t1, &store, &mut cursor);
        assert_eq!(nb.value(), 47.0);
        let mut renderer = Renderer::new();
        nb.draw(&mut renderer);
        let commands = renderer.commands();
        assert_eq!(commands.len(), 3);
        match &commands[2] {
            DrawCommand::DrawText { text, .. } => assert_eq!(text, "47.0"),
            other => panic!("expected text command, got {:?}", other),
        }

        // Enter after the release finds no leftover buffer to commit
        nb.handle_event(&release(Point::new(50.0, 99.0)), t1, &store, &mut cursor);
        nb.take_outputs();
        nb.handle_event(&key(Key::Enter), t1, &store, &mut cursor);
        assert_eq!(nb.value(), 47.0);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_char_during_drag_is_ignored() {
        let (mut nb, store, mut cursor, t0) = rig();
        nb.handle_event(&press(inside()), t0, &store, &mut cursor);
        nb.take_outputs();

        nb.handle_event(&key(Key::Char('5')), t0, &store, &mut cursor);
        assert!(!nb.is_editing());
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());

        // The drag keeps stepping from the unchanged value
        nb.handle_event(&moved(Point::new(50.0, 99.0)), t0, &store, &mut cursor);
        assert_eq!(nb.value(), 5.0);
    }

    #[test]
    fn test_focus_kept_after_inside_click() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        click_inside(&mut nb, &mut store, &mut cursor, t0);
        assert!(nb.has_focus());
    }

    #[test]
    fn test_outside_click_drops_focus_and_commits() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('8')), t1, &store, &mut cursor);
        nb.take_outputs();

        let away = Point::new(500.0, 500.0);
        nb.handle_event(&global_press(away), t1, &store, &mut cursor);
        nb.tick(t1 + Duration::from_millis(2), &mut store);

        assert!(!nb.has_focus());
        assert!(!nb.is_editing());
        assert_eq!(nb.value(), 8.0);
        assert_eq!(nb.take_outputs(), vec![Output::Value(8.0), Output::Changed]);
    }

    #[test]
    fn test_double_click_resets_to_initial() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        store.set(ATTR_INITIAL, AttrValue::Float(25.0));
        store.set(ATTR_INITIAL_ENABLED, AttrValue::Bool(true));
        nb.set_value(80.0, &store);

        let event = Event::DoubleClicked { position: inside() };
        nb.handle_event(&event, t0, &store, &mut cursor);
        assert_eq!(nb.value(), 25.0);
    }

    #[test]
    fn test_double_click_without_initial_resets_to_zero() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        store.set(ATTR_INITIAL, AttrValue::Float(25.0));
        nb.set_value(80.0, &store);

        let event = Event::DoubleClicked { position: inside() };
        nb.handle_event(&event, t0, &store, &mut cursor);
        assert_eq!(nb.value(), 0.0);
    }

    #[test]
    fn test_inactive_gates_value_output() {
        let (mut nb, store, _cursor, _t0) = rig();
        nb.set_active(false);
        nb.take_outputs();

        nb.set_value(30.0, &store);
        assert_eq!(nb.take_outputs(), vec![Output::Changed]);
        assert_eq!(nb.value(), 30.0);

        nb.set_active(true);
        assert_eq!(nb.take_outputs(), vec![Output::Value(30.0)]);
    }

    #[test]
    fn test_set_value_programmatic_skips_changed() {
        let (mut nb, store, _cursor, _t0) = rig();
        nb.set_value_programmatic(12.0, &store);
        assert_eq!(nb.take_outputs(), vec![Output::Value(12.0)]);
    }

    #[test]
    fn test_range_narrowing_emits_once() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        nb.set_value(50.0, &store);
        nb.take_outputs();

        store.set(ATTR_RANGE, AttrValue::FloatList(vec![0.0, 10.0]));
        nb.attr_changed(ATTR_RANGE, &store);
        assert_eq!(nb.value(), 10.0);
        assert_eq!(nb.take_outputs(), vec![Output::Value(10.0), Output::Changed]);

        // Re-announcing the same range emits nothing further
        nb.attr_changed(ATTR_RANGE, &store);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_malformed_range_keeps_previous() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        store.set(ATTR_RANGE, AttrValue::FloatList(vec![0.0, 10.0]));
        nb.attr_changed(ATTR_RANGE, &store);

        store.set(ATTR_RANGE, AttrValue::Text("wide".to_string()));
        nb.attr_changed(ATTR_RANGE, &store);
        // set_value re-reads the malformed attribute too; the old bounds
        // must survive both reads
        nb.set_value(50.0, &store);
        assert_eq!(nb.value(), 10.0);
    }

    #[test]
    fn test_justification_conflict_recorded() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        store.set(
            ATTR_JUSTIFICATION,
            AttrValue::TextList(vec!["left".to_string(), "right".to_string()]),
        );
        nb.attr_changed(ATTR_JUSTIFICATION, &store);
        assert_eq!(nb.justification(), Justification::Centre);
        assert!(nb.justification_conflicted());

        store.set(ATTR_JUSTIFICATION, AttrValue::Text("left".to_string()));
        nb.attr_changed(ATTR_JUSTIFICATION, &store);
        assert_eq!(nb.justification(), Justification::Left);
        assert!(!nb.justification_conflicted());
    }

    #[test]
    fn test_unknown_attr_is_ignored() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        store.set("flavor", AttrValue::Text("grape".to_string()));
        nb.attr_changed("flavor", &store);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_unit_style_change_redraws_without_emission() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        nb.set_value(-6.0, &store);
        nb.take_outputs();
        nb.take_redraw();

        store.set(ATTR_UNIT_STYLE, AttrValue::Text("db".to_string()));
        nb.attr_changed(ATTR_UNIT_STYLE, &store);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
        assert!(nb.take_redraw());
        assert!((nb.output_value() - 0.5012).abs() < 0.001);
    }

    #[test]
    fn test_resize_enforces_fixed_height_and_min_width() {
        let (mut nb, _store, _cursor, _t0) = rig();
        let granted = nb.resize(Size::new(10.0, 64.0));
        assert_eq!(granted, Size::new(MIN_WIDTH, WIDGET_HEIGHT));
        assert_eq!(nb.bounds().width, MIN_WIDTH);
        assert_eq!(nb.bounds().height, WIDGET_HEIGHT);

        let granted = nb.resize(Size::new(200.0, 18.0));
        assert_eq!(granted, Size::new(200.0, WIDGET_HEIGHT));
    }

    #[test]
    fn test_blink_toggles_cursor() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('1')), t1, &store, &mut cursor);
        assert!(nb.edit.cursor_visible());

        nb.tick(t1 + BLINK_INTERVAL, &mut store);
        assert!(!nb.edit.cursor_visible());
        nb.tick(t1 + BLINK_INTERVAL * 2, &mut store);
        assert!(nb.edit.cursor_visible());

        // Leaving edit mode stops the cycle
        nb.handle_event(&key(Key::Enter), t1 + BLINK_INTERVAL * 2, &store, &mut cursor);
        assert_eq!(nb.next_wakeup(), None);
    }

    #[test]
    fn test_save_roundtrip() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        store.set(ATTR_RANGE, AttrValue::FloatList(vec![0.0, 1000.0]));
        store.set(ATTR_UNIT_STYLE, AttrValue::Text("hertz".to_string()));
        nb.sync_from_store(&store);
        nb.set_value(440.0, &store);

        let record = nb.save();
        assert_eq!(record.value, 440.0);
        assert_eq!(record.min, 0.0);
        assert_eq!(record.max, 1000.0);
        assert_eq!(record.unit_style, UnitStyle::Hertz);

        let json = record.to_json().unwrap();
        let loaded = SaveRecord::from_json(&json).unwrap();
        let mut other = NumBox::new();
        other.restore(loaded, Instant::now());
        assert_eq!(other.value(), 440.0);
        assert_eq!(other.save(), record);
    }

    #[test]
    fn test_restore_is_silent() {
        let (mut nb, _store, _cursor, t0) = rig();
        let record = SaveRecord {
            version: RECORD_VERSION,
            value: 5.0,
            min: 0.0,
            max: 10.0,
            initial: 2.0,
            justification: Justification::Right,
            active: true,
            initial_enabled: true,
            unit_style: UnitStyle::Float,
            visible: true,
            param_type: "float".to_string(),
        };
        nb.restore(record, t0);
        assert_eq!(nb.value(), 5.0);
        assert_eq!(nb.justification(), Justification::Right);
        assert_eq!(nb.take_outputs(), Vec::<Output>::new());
    }

    #[test]
    fn test_restore_publishes_attrs_staggered() {
        let (mut nb, mut store, _cursor, t0) = rig();
        let record = SaveRecord {
            version: RECORD_VERSION,
            value: 5.0,
            min: 0.0,
            max: 10.0,
            initial: 2.0,
            justification: Justification::Centre,
            active: true,
            initial_enabled: true,
            unit_style: UnitStyle::Hertz,
            visible: true,
            param_type: "float".to_string(),
        };
        nb.restore(record, t0);

        nb.tick(t0 + Duration::from_millis(10), &mut store);
        assert_eq!(
            store.get(ATTR_RANGE),
            Some(AttrValue::FloatList(vec![0.0, 10.0]))
        );
        assert_eq!(store.get(ATTR_INITIAL), None);

        nb.tick(t0 + Duration::from_millis(60), &mut store);
        assert_eq!(store.get(ATTR_INITIAL), Some(AttrValue::Float(2.0)));
        assert_eq!(store.get(ATTR_INITIAL_ENABLED), Some(AttrValue::Bool(true)));
        assert_eq!(
            store.get(ATTR_UNIT_STYLE),
            Some(AttrValue::Text("hertz".to_string()))
        );
        assert_eq!(store.get(ATTR_VISIBLE), Some(AttrValue::Bool(true)));
        assert_eq!(
            store.get(ATTR_PARAM_TYPE),
            Some(AttrValue::Text("float".to_string()))
        );
        assert_eq!(nb.next_wakeup(), None);
    }

    #[test]
    fn test_draw_idle_widget() {
        let (nb, _store, _cursor, _t0) = rig();
        let mut renderer = Renderer::new();
        nb.draw(&mut renderer);

        let commands = renderer.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert!(matches!(commands[1], DrawCommand::StrokeRect { .. }));
        match &commands[2] {
            DrawCommand::DrawText { text, .. } => assert_eq!(text, "0.0"),
            other => panic!("expected text command, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_editing_shows_buffer_and_caret() {
        let (mut nb, mut store, mut cursor, t0) = rig();
        let t1 = click_inside(&mut nb, &mut store, &mut cursor, t0);
        nb.handle_event(&key(Key::Char('4')), t1, &store, &mut cursor);
        nb.handle_event(&key(Key::Char('2')), t1, &store, &mut cursor);

        let mut renderer = Renderer::new();
        nb.draw(&mut renderer);
        let commands = renderer.commands();
        // Background, border, buffer text, caret
        assert_eq!(commands.len(), 4);
        match &commands[2] {
            DrawCommand::DrawText { text, .. } => assert_eq!(text, "42"),
            other => panic!("expected text command, got {:?}", other),
        }
        assert!(matches!(commands[3], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_hidden_widget_draws_nothing() {
        let (mut nb, mut store, _cursor, _t0) = rig();
        store.set(ATTR_VISIBLE, AttrValue::Bool(false));
        nb.attr_changed(ATTR_VISIBLE, &store);

        let mut renderer = Renderer::new();
        nb.draw(&mut renderer);
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn test_redraw_flag_lifecycle() {
        let (mut nb, store, _cursor, _t0) = rig();
        assert!(nb.take_redraw());
        assert!(!nb.take_redraw());
        nb.set_value(1.0, &store);
        assert!(nb.take_redraw());
    }
}
