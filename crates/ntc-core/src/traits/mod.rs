//! Collaborator traits defined in `ntc-core` and implemented by other crates.

pub mod navigator;
pub mod notifier;
pub mod session;

pub use navigator::{LOGIN_PATH, Navigator};
pub use notifier::Notifier;
pub use session::{Session, SessionStore};
