//! CLI command definitions and dispatch.

pub mod account;
pub mod bus;
pub mod dashboard;
pub mod reservation;
pub mod route;
pub mod search;
pub mod seats;
pub mod trip;
pub mod user;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use ntc_client::{FileSessionStore, HttpApiClient};
use ntc_core::config::ClientConfig;
use ntc_core::error::AppError;
use ntc_view::ViewContext;

use crate::output::{self, OutputFormat};
use crate::terminal::{TerminalNavigator, TerminalNotifier};

/// NTC bus reservations from the terminal
#[derive(Debug, Parser)]
#[command(name = "ntc", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and profile overlays
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    /// Configuration profile to overlay on default.toml
    #[arg(long, global = true, env = "NTC_PROFILE", default_value = "development")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(account::LoginArgs),
    /// Forget the stored session
    Logout,
    /// Create an account
    Register(account::RegisterArgs),
    /// Show the signed-in user
    Whoami,
    /// Search trips, or list route endpoints
    Search(search::SearchArgs),
    /// Show a trip's seat map
    Seats(seats::SeatsArgs),
    /// Reserve seats on a trip
    Reserve(seats::ReserveArgs),
    /// Show the dashboard for your role
    Dashboard,
    /// Ticket actions
    Tickets(dashboard::TicketsArgs),
    /// Bus management
    Bus(bus::BusArgs),
    /// Route management
    Route(route::RouteArgs),
    /// Trip management
    Trip(trip::TripArgs),
    /// User management
    User(user::UserArgs),
    /// Reservation listing
    Reservation(reservation::ReservationArgs),
}

/// Collaborators shared by every command.
pub struct AppContext {
    /// Backend client.
    pub api: Arc<HttpApiClient>,
    /// Session, notifier, and navigator for view models.
    pub view: ViewContext,
    /// The notifier behind `view`, kept to count printed errors.
    pub notifier: Arc<TerminalNotifier>,
    /// Selected output format.
    pub format: OutputFormat,
}

impl AppContext {
    /// Wire the HTTP client and terminal collaborators from configuration.
    pub fn new(config: &ClientConfig, format: OutputFormat) -> Result<Self, AppError> {
        let api = Arc::new(HttpApiClient::new(&config.api)?);
        let notifier = Arc::new(TerminalNotifier::new());
        let view = ViewContext::new(
            Arc::new(FileSessionStore::new(&config.session.path)),
            notifier.clone(),
            Arc::new(TerminalNavigator),
        );
        Ok(Self {
            api,
            view,
            notifier,
            format,
        })
    }
}

impl Cli {
    /// Execute the CLI command
    ///
    /// Errors already shown to the user by a view model are not printed
    /// again.
    pub async fn execute(&self, config: &ClientConfig) -> Result<(), AppError> {
        let app = AppContext::new(config, self.format).inspect_err(|e| {
            output::print_error(&e.message);
        })?;

        let result = self.dispatch(&app).await;
        if let Err(err) = &result {
            if app.notifier.errors_shown() == 0 {
                output::print_error(&err.message);
            }
        }
        result
    }

    async fn dispatch(&self, app: &AppContext) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => account::login(args, app).await,
            Commands::Logout => account::logout(app),
            Commands::Register(args) => account::register(args, app).await,
            Commands::Whoami => account::whoami(app).await,
            Commands::Search(args) => search::execute(args, app).await,
            Commands::Seats(args) => seats::show(args, app).await,
            Commands::Reserve(args) => seats::reserve(args, app).await,
            Commands::Dashboard => dashboard::show(app).await,
            Commands::Tickets(args) => dashboard::tickets(args, app).await,
            Commands::Bus(args) => bus::execute(args, app).await,
            Commands::Route(args) => route::execute(args, app).await,
            Commands::Trip(args) => trip::execute(args, app).await,
            Commands::User(args) => user::execute(args, app).await,
            Commands::Reservation(args) => reservation::execute(args, app).await,
        }
    }
}

/// Read a value from the terminal when it was not given as a flag.
pub(crate) fn prompt_text(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Read a secret from the terminal when it was not given as a flag.
pub(crate) fn prompt_password(
    value: &Option<String>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
