// ── UI store ──
//
// Shell-level presentation state: sidebar visibility and the toast
// queue. Views push toasts after mutations; the front end drains or
// dismisses them.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use strum::Display;
use tokio::sync::watch;

/// Toasts kept before the oldest is dropped.
pub const DEFAULT_TOAST_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct UiState {
    sidebar_open: bool,
    toasts: VecDeque<Toast>,
    next_id: u64,
}

pub struct UiStore {
    state: Mutex<UiState>,
    capacity: usize,
    version: watch::Sender<u64>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Mutex::new(UiState {
                sidebar_open: true,
                toasts: VecDeque::new(),
                next_id: 1,
            }),
            capacity: capacity.max(1),
            version,
        }
    }

    // ── Sidebar ──────────────────────────────────────────────────────

    pub fn sidebar_open(&self) -> bool {
        self.lock().sidebar_open
    }

    /// Flip the sidebar and return the new state.
    pub fn toggle_sidebar(&self) -> bool {
        let open = {
            let mut state = self.lock();
            state.sidebar_open = !state.sidebar_open;
            state.sidebar_open
        };
        self.bump();
        open
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.lock().sidebar_open = open;
        self.bump();
    }

    // ── Toasts ───────────────────────────────────────────────────────

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            if state.toasts.len() >= self.capacity {
                state.toasts.pop_front();
            }
            state.toasts.push_back(Toast {
                id,
                level,
                message: message.into(),
                created_at: Utc::now(),
            });
            id
        };
        self.bump();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message)
    }

    /// Remove one toast. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let removed = {
            let mut state = self.lock();
            let before = state.toasts.len();
            state.toasts.retain(|t| t.id != id);
            state.toasts.len() != before
        };
        if removed {
            self.bump();
        }
        removed
    }

    /// Oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().toasts.iter().cloned().collect()
    }

    /// Take every pending toast, leaving the queue empty.
    pub fn drain_toasts(&self) -> Vec<Toast> {
        let drained: Vec<Toast> = self.lock().toasts.drain(..).collect();
        if !drained.is_empty() {
            self.bump();
        }
        drained
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_oldest_when_full() {
        let ui = UiStore::with_capacity(2);
        ui.success("one");
        ui.success("two");
        ui.error("three");

        let messages: Vec<_> = ui.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let ui = UiStore::new();
        let first = ui.success("saved");
        let second = ui.error("failed");

        assert!(ui.dismiss(first));
        assert!(!ui.dismiss(first));
        let left = ui.toasts();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, second);
        assert_eq!(left[0].level, ToastLevel::Error);
    }

    #[test]
    fn sidebar_toggles() {
        let ui = UiStore::new();
        assert!(ui.sidebar_open());
        assert!(!ui.toggle_sidebar());
        assert!(ui.toggle_sidebar());
    }

    #[test]
    fn drain_empties_queue() {
        let ui = UiStore::new();
        ui.success("a");
        assert_eq!(ui.drain_toasts().len(), 1);
        assert!(ui.toasts().is_empty());
    }
}
