//! Collaborators shared by every view model.

use std::sync::Arc;

use ntc_core::error::{AppError, ErrorKind};
use ntc_core::result::AppResult;
use ntc_core::traits::{Navigator, Notifier, SessionStore};
use tracing::debug;

/// Shown when an action needs a session and none is stored.
pub const NO_SESSION_MESSAGE: &str = "No token found. Please log in again.";

/// Session store, notifier, and navigator injected into view models.
///
/// Cloning is cheap; all collaborators are shared.
#[derive(Clone)]
pub struct ViewContext {
    /// Where the bearer token lives.
    pub session: Arc<dyn SessionStore>,
    /// User-visible messages.
    pub notifier: Arc<dyn Notifier>,
    /// Screen navigation.
    pub navigator: Arc<dyn Navigator>,
}

impl ViewContext {
    /// Bundle the collaborators.
    pub fn new(
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
        }
    }

    /// The stored bearer token.
    ///
    /// When there is none, notifies the user, redirects to login, and
    /// returns an `Unauthorized` error.
    pub fn require_token(&self) -> AppResult<String> {
        match self.session.token() {
            Some(token) => Ok(token),
            None => Err(self.reject(AppError::unauthorized(NO_SESSION_MESSAGE))),
        }
    }

    /// Report a locally detected failure using its own message.
    pub fn reject(&self, err: AppError) -> AppError {
        debug!(kind = %err.kind, message = %err.message, "Action rejected");
        self.notifier.error(&err.message);
        self.redirect_if_unauthorized(&err);
        err
    }

    /// Report a backend failure: the server's message if it sent one,
    /// otherwise `fallback`.
    pub fn fail(&self, err: AppError, fallback: &str) -> AppError {
        self.notifier.error(err.user_message(fallback));
        self.redirect_if_unauthorized(&err);
        err
    }

    /// Report success: the server's message if it sent one, otherwise
    /// `fallback`.
    pub fn succeed(&self, message: Option<&str>, fallback: &str) {
        let text = message.filter(|m| !m.trim().is_empty()).unwrap_or(fallback);
        self.notifier.info(text);
    }

    fn redirect_if_unauthorized(&self, err: &AppError) {
        if err.is(ErrorKind::Unauthorized) {
            self.navigator.redirect_to_login();
        }
    }
}
