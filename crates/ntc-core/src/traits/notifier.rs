//! Notifier trait: user-visible messages.

use crate::types::NoticeKind;

/// Receives user-visible notices from view models.
pub trait Notifier: Send + Sync + 'static {
    /// Show a message of the given kind.
    fn notify(&self, kind: NoticeKind, message: &str);

    /// Show an informational message.
    fn info(&self, message: &str) {
        self.notify(NoticeKind::Info, message);
    }

    /// Show an error message.
    fn error(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }
}
