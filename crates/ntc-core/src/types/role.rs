//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Roles known to the reservation backend.
///
/// Roles are ordered by privilege level: Admin > Operator > Commuter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// System administrator: all buses, users, and reservations.
    Admin,
    /// Bus operator: manages their own fleet, routes, and trips.
    Operator,
    /// Passenger: searches trips and books seats.
    #[default]
    Commuter,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Operator => 2,
            Self::Commuter => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Path a user of this role lands on after signing in.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Commuter => "/",
            Self::Operator | Self::Admin => "/dashboard",
        }
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
            Self::Commuter => "commuter",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            "commuter" => Ok(Self::Commuter),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, operator, commuter"
            ))),
        }
    }
}
