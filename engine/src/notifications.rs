//! User-facing toasts.
//!
//! Flows report failures through a [`Notifier`]. [`ToastQueue`] is the
//! in-process implementation: toasts accumulate until the host drains them
//! for display. Repeats are kept: two identical failures are two toasts.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Single-line rendering for terminals and logs.
    #[must_use]
    pub fn format(&self) -> String {
        let tag = match self.kind {
            ToastKind::Error => "✗",
            ToastKind::Success => "✓",
        };
        format!("{tag} {}: {}", self.title, self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Pending toasts, in the order they were raised.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        // A panic while holding the lock cannot leave a Vec half-written.
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Take all pending toasts, clearing the queue.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        tracing::info!(title = %toast.title, message = %toast.message, "Toast raised");
        self.lock().push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_format() {
        assert_eq!(
            Toast::error("Plan Error", "timeout").format(),
            "✗ Plan Error: timeout"
        );
        assert_eq!(Toast::success("Saved", "done").format(), "✓ Saved: done");
    }

    #[test]
    fn queue_notify_and_take() {
        let queue = ToastQueue::new();
        assert!(queue.is_empty());

        queue.notify(Toast::error("Plan Error", "timeout"));
        queue.notify(Toast::error("Sign Up Error", "Email already exists"));
        assert_eq!(queue.len(), 2);

        let toasts = queue.take();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].title, "Plan Error");
        assert!(queue.is_empty());
    }

    #[test]
    fn identical_failures_are_not_deduplicated() {
        let queue = ToastQueue::new();
        queue.notify(Toast::error("Plan Error", "timeout"));
        queue.notify(Toast::error("Plan Error", "timeout"));
        assert_eq!(queue.len(), 2);
    }
}
