//! Deferred task scheduling
//!
//! The widget never spawns threads or registers OS timers. Instead it queues
//! tasks with a due time and the host drives them by calling
//! [`crate::NumBox::tick`] with the current time. This keeps timing fully
//! deterministic under test.

use std::time::Duration;

use web_time::Instant;

use crate::attrs::RestoreAttr;

/// Work the widget defers to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Toggle the edit caret
    BlinkTick,
    /// Run the deferred focus-loss check
    FocusCheck,
    /// Publish one saved attribute back to the attribute store
    RestoreAttr(RestoreAttr),
}

/// Token for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    due: Instant,
    task: Task,
}

/// Ordered queue of pending tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once `delay` has elapsed from `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: now + delay,
            task,
        });
        TimerHandle(id)
    }

    /// Drop a pending task. Cancelling an already-fired or already-cancelled
    /// handle does nothing.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.id != handle.0);
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.id == handle.0)
    }

    /// Remove and return every task due at or before `now`, ordered by due
    /// time with scheduling order breaking ties.
    pub fn take_due(&mut self, now: Instant) -> Vec<Task> {
        let mut due: Vec<Entry> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due <= now {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|e| e.task).collect()
    }

    /// Earliest due time among pending tasks, for hosts that want to sleep
    /// until the next tick matters.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
