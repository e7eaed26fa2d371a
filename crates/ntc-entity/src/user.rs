//! User models and authentication payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ntc_core::error::AppError;
use ntc_core::traits::Session;
use ntc_core::types::{UserId, UserRole};

/// A user account as listed by the admin endpoints and `/users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Role.
    pub role: UserRole,
}

/// A user as embedded in other documents; the backend may project only a
/// subset of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id.
    #[serde(rename = "_id", default)]
    pub id: Option<UserId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Body for updating a user (admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    /// Display name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// New role.
    pub role: UserRole,
    /// Contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone_number: user.phone_number.clone(),
        }
    }
}

/// Login form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    /// Login email.
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Registration {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Contact number.
    #[validate(length(min = 7, max = 20, message = "phone number is not valid"))]
    pub phone_number: String,
    /// Requested role.
    #[serde(default)]
    pub role: UserRole,
}

/// Response of `POST /users/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    #[serde(default)]
    pub token: Option<String>,
    /// Role string.
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// Convert into a session, rejecting responses without a token or role.
    pub fn into_session(self) -> Result<Session, AppError> {
        match (self.token, self.role) {
            (Some(token), Some(role)) if !token.is_empty() && !role.is_empty() => {
                Ok(Session::new(token, role))
            }
            _ => Err(AppError::service_unavailable(
                "Invalid response from server: missing token or role",
            )),
        }
    }
}

/// Generic `{ "message": "..." }` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    #[serde(default)]
    pub message: Option<String>,
}
