//! User-facing notifications
//!
//! Non-blocking notices (toasts) are an injected capability so the reorder
//! core stays testable without a UI.

use std::sync::{Arc, Mutex};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// A single notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

/// Sink for user-visible notices
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, title: &str, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(Severity, &str, &str) + Send + Sync,
{
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        self(severity, title, message)
    }
}

/// Forwards notices to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        match severity {
            Severity::Error => tracing::error!(title, "{}", message),
            Severity::Success | Severity::Info => tracing::info!(title, "{}", message),
        }
    }
}

/// Keeps every notice in memory, for headless front-ends and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notice {
                severity,
                title: title.to_string(),
                message: message.to_string(),
            });
    }
}
