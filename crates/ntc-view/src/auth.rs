//! Sign-in, sign-up, and sign-out.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use ntc_client::UserService;
use ntc_core::error::AppError;
use ntc_core::result::AppResult;
use ntc_core::traits::{LOGIN_PATH, Session};
use ntc_entity::{Credentials, Registration, User};

use crate::context::ViewContext;

const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials and try again.";
const REGISTER_OK_MESSAGE: &str = "Registration successful! Please log in.";
const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// View model of the login and register screens.
pub struct AuthView {
    users: Arc<dyn UserService>,
    ctx: ViewContext,
}

impl AuthView {
    pub fn new(users: Arc<dyn UserService>, ctx: ViewContext) -> Self {
        Self { users, ctx }
    }

    /// Sign in, store the session, and go to the role's landing screen.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(self
                .ctx
                .reject(AppError::validation("Please enter your email and password.")));
        }
        if credentials.validate().is_err() {
            return Err(self
                .ctx
                .reject(AppError::validation("Please enter a valid email address.")));
        }

        let session = self
            .users
            .login(&credentials)
            .await
            .and_then(|response| response.into_session())
            .map_err(|err| {
                self.ctx.notifier.error(err.user_message(LOGIN_FAILED_MESSAGE));
                err
            })?;

        self.ctx
            .session
            .save(session.clone())
            .map_err(|err| self.ctx.reject(err))?;

        let role = session.user_role().unwrap_or_default();
        info!(role = %role, "Signed in");
        self.ctx.notifier.info("Login successful!");
        self.ctx.navigator.navigate(role.landing_path());
        Ok(session)
    }

    /// Create an account, then go to the login screen.
    pub async fn register(&self, form: &Registration) -> AppResult<()> {
        form.validate()
            .map_err(|errors| self.ctx.reject(AppError::from(errors)))?;

        match self.users.register(form).await {
            Ok(response) => {
                info!(email = %form.email, "Account registered");
                self.ctx
                    .succeed(response.message.as_deref(), REGISTER_OK_MESSAGE);
                self.ctx.navigator.navigate(LOGIN_PATH);
                Ok(())
            }
            Err(err) => {
                self.ctx.notifier.error(err.user_message(REGISTER_FAILED_MESSAGE));
                Err(err)
            }
        }
    }

    /// Forget the session and go to the login screen.
    pub fn logout(&self) -> AppResult<()> {
        self.ctx.session.clear().map_err(|err| self.ctx.reject(err))?;
        info!("Signed out");
        self.ctx.notifier.info("Logged out.");
        self.ctx.navigator.redirect_to_login();
        Ok(())
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> AppResult<User> {
        let token = self.ctx.require_token()?;
        self.users
            .me(&token)
            .await
            .map_err(|err| self.ctx.fail(err, "Failed to load profile."))
    }
}
