//! Login, logout, registration, and profile commands.

use clap::Args;

use ntc_core::error::AppError;
use ntc_core::types::UserRole;
use ntc_entity::Registration;
use ntc_view::auth::AuthView;

use super::{AppContext, prompt_password, prompt_text};
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (prompted if omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(short, long)]
    pub name: String,
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Phone number
    #[arg(long)]
    pub phone: String,
    /// Requested role
    #[arg(short, long, default_value = "commuter")]
    pub role: UserRole,
    /// Password (prompted if omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

fn auth_view(app: &AppContext) -> AuthView {
    AuthView::new(app.api.clone(), app.view.clone())
}

pub async fn login(args: &LoginArgs, app: &AppContext) -> Result<(), AppError> {
    let email = prompt_text(&args.email, "Email")?;
    let password = prompt_password(&args.password, "Password", false)?;
    let session = auth_view(app).login(&email, &password).await?;
    output::print_kv("Role", &session.role);
    Ok(())
}

pub fn logout(app: &AppContext) -> Result<(), AppError> {
    auth_view(app).logout()
}

pub async fn register(args: &RegisterArgs, app: &AppContext) -> Result<(), AppError> {
    let password = prompt_password(&args.password, "Password", true)?;
    let form = Registration {
        name: args.name.clone(),
        email: args.email.clone(),
        password,
        phone_number: args.phone.clone(),
        role: args.role,
    };
    auth_view(app).register(&form).await
}

pub async fn whoami(app: &AppContext) -> Result<(), AppError> {
    let user = auth_view(app).current_user().await?;
    match app.format {
        OutputFormat::Json => output::print_json(&user),
        OutputFormat::Table => {
            output::print_kv("ID", user.id.as_str());
            output::print_kv("Name", &user.name);
            output::print_kv("Email", &user.email);
            output::print_kv("Phone", user.phone_number.as_deref().unwrap_or("-"));
            output::print_kv("Role", user.role.as_str());
        }
    }
    Ok(())
}
