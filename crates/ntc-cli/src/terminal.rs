//! Terminal implementations of the notifier and navigator.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use ntc_core::traits::{LOGIN_PATH, Navigator, Notifier};
use ntc_core::types::NoticeKind;

use crate::output;

/// Prints notices as `✓ message` and `✗ message`.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    errors: AtomicUsize,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of error notices printed so far.
    pub fn errors_shown(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Info => output::print_success(message),
            NoticeKind::Error => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                output::print_error(message);
            }
        }
    }
}

/// Turns navigation requests into hints about the next command to run.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

/// The command that opens the screen at `path`.
pub fn command_hint(path: &str) -> Option<&'static str> {
    match path {
        LOGIN_PATH => Some("ntc login"),
        "/dashboard" => Some("ntc dashboard"),
        "/tripsearch" => Some("ntc search"),
        _ => None,
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "Navigation requested");
        if let Some(command) = command_hint(path) {
            println!("→ Run `{command}` to continue.");
        }
    }
}
