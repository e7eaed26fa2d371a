//! User management commands (admin).

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ntc_core::error::AppError;
use ntc_core::types::{UserId, UserRole};
use ntc_entity::{Registration, User, UserUpdate};
use ntc_view::manage::UsersView;

use super::{AppContext, prompt_password};
use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Filter by name, email, or role
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create an account
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Email
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Role
        #[arg(long, default_value = "commuter")]
        role: UserRole,
        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Update a user; omitted fields keep their current value
    Update {
        /// User ID
        id: UserId,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New phone number
        #[arg(long)]
        phone: Option<String>,
        /// New role
        #[arg(long)]
        role: Option<UserRole>,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: UserId,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Phone
    phone: String,
    /// Role
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone_number.clone().unwrap_or_else(|| "-".into()),
            role: u.role.to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, app: &AppContext) -> Result<(), AppError> {
    let view = UsersView::new(app.api.clone(), app.view.clone());

    match &args.command {
        UserCommand::List { search } => {
            view.load().await?;
            let users = view.filtered(search.as_deref().unwrap_or_default());
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, app.format);
        }
        UserCommand::Add {
            name,
            email,
            phone,
            role,
            password,
        } => {
            let password = prompt_password(password, "Password", true)?;
            let form = Registration {
                name: name.clone(),
                email: email.clone(),
                password,
                phone_number: phone.clone(),
                role: *role,
            };
            view.create(&form).await?;
        }
        UserCommand::Update {
            id,
            name,
            email,
            phone,
            role,
        } => {
            view.load().await?;
            let current = view
                .items()
                .into_iter()
                .find(|u| &u.id == id)
                .ok_or_else(|| AppError::not_found(format!("User '{id}' not found")))?;
            let mut update = UserUpdate::from(&current);
            if let Some(name) = name {
                update.name = name.clone();
            }
            if let Some(email) = email {
                update.email = email.clone();
            }
            if let Some(phone) = phone {
                update.phone_number = Some(phone.clone());
            }
            if let Some(role) = role {
                update.role = *role;
            }
            view.update(id, &update).await?;
        }
        UserCommand::Delete { id, force } => {
            if output::confirm(&format!("Delete user {id}?"), *force)? {
                view.delete(id).await?;
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}
