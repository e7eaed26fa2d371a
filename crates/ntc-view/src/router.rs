//! Route table and access guard.
//!
//! Maps an application path to the screen it shows, redirecting when the
//! session is missing or its role is not allowed on that screen.

use std::fmt;
use std::sync::Arc;

use ntc_core::traits::{LOGIN_PATH, SessionStore};
use ntc_core::types::{TripId, UserRole};

/// Path of the home screen.
pub const HOME_PATH: &str = "/";
/// Path of the dashboard screen.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Screens of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Trip search, also the home screen.
    TripSearch,
    /// Sign-in form.
    Login,
    /// Account creation form.
    Register,
    /// Role-dependent overview.
    Dashboard,
    /// Seat layout of one trip.
    BusLayout(TripId),
    /// Bus management.
    Buses,
    /// Route management.
    Routes,
    /// Trip management.
    TripManagement,
    /// User management.
    Users,
    /// Reservation management.
    Reservations,
}

/// Who may open a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Any signed-in user.
    Session,
    /// Signed-in users with at least this role.
    Role(UserRole),
}

impl Screen {
    /// Parse an application path. Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let screen = match trimmed {
            "" | "/tripsearch" => Self::TripSearch,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/buses" => Self::Buses,
            "/routes" => Self::Routes,
            "/tripmanagement" => Self::TripManagement,
            "/users" => Self::Users,
            "/reservations" => Self::Reservations,
            other => {
                let id = other.strip_prefix("/buslayout/")?;
                Self::BusLayout(id.parse().ok()?)
            }
        };
        Some(screen)
    }

    /// Who may open this screen.
    pub fn access(&self) -> Access {
        match self {
            Self::TripSearch | Self::Login | Self::Register => Access::Public,
            Self::Dashboard | Self::BusLayout(_) => Access::Session,
            Self::Buses | Self::Routes | Self::TripManagement => {
                Access::Role(UserRole::Operator)
            }
            Self::Users | Self::Reservations => Access::Role(UserRole::Admin),
        }
    }

    /// Canonical path of this screen.
    pub fn path(&self) -> String {
        match self {
            Self::TripSearch => "/tripsearch".into(),
            Self::Login => LOGIN_PATH.into(),
            Self::Register => "/register".into(),
            Self::Dashboard => DASHBOARD_PATH.into(),
            Self::BusLayout(id) => format!("/buslayout/{id}"),
            Self::Buses => "/buses".into(),
            Self::Routes => "/routes".into(),
            Self::TripManagement => "/tripmanagement".into(),
            Self::Users => "/users".into(),
            Self::Reservations => "/reservations".into(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show this screen.
    Render(Screen),
    /// Go to another path instead.
    Redirect(&'static str),
}

/// Resolves paths against the current session.
#[derive(Clone)]
pub struct Router {
    session: Arc<dyn SessionStore>,
}

impl Router {
    /// Create a router reading the given session store.
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    /// Decide what `path` shows for the current session.
    pub fn resolve(&self, path: &str) -> Resolution {
        let Some(screen) = Screen::from_path(path) else {
            return Resolution::Redirect(HOME_PATH);
        };
        match screen.access() {
            Access::Public => Resolution::Render(screen),
            Access::Session | Access::Role(_) if self.session.token().is_none() => {
                Resolution::Redirect(LOGIN_PATH)
            }
            Access::Session => Resolution::Render(screen),
            Access::Role(min) => match self.session.role() {
                Some(role) if role.has_at_least(&min) => Resolution::Render(screen),
                _ => Resolution::Redirect(DASHBOARD_PATH),
            },
        }
    }

    /// Where the current user lands after signing in.
    pub fn landing_path(&self) -> &'static str {
        self.session
            .role()
            .map_or(HOME_PATH, |role| role.landing_path())
    }
}
