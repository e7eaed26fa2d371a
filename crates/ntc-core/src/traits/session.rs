//! Session store trait: where the bearer token and role live.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::UserRole;

/// An authenticated session as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token sent as `Authorization: Bearer <token>`.
    pub token: String,
    /// Role string reported by the backend at login.
    pub role: String,
}

impl Session {
    /// Create a session from a token and role string.
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role: role.into(),
        }
    }

    /// The role parsed into a [`UserRole`], if recognised.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

/// Holds the current session between screens (and between runs, for
/// persistent implementations).
///
/// Reads are infallible from the caller's point of view: a store that
/// cannot read its backing medium reports "no session".
pub trait SessionStore: Send + Sync + 'static {
    /// The full current session, if any.
    fn current(&self) -> Option<Session>;

    /// Replace the current session.
    fn save(&self, session: Session) -> AppResult<()>;

    /// Forget the current session.
    fn clear(&self) -> AppResult<()>;

    /// The bearer token, if a non-empty one is present.
    fn token(&self) -> Option<String> {
        self.current()
            .map(|s| s.token)
            .filter(|t| !t.trim().is_empty())
    }

    /// The role of the current session, if recognised.
    fn role(&self) -> Option<UserRole> {
        self.current().and_then(|s| s.user_role())
    }
}
