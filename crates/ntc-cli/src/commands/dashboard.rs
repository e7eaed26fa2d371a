//! Dashboard and ticket commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ntc_core::error::AppError;
use ntc_core::types::{TicketId, UserRole};
use ntc_entity::Reservation;
use ntc_view::dashboard::{Dashboard, DashboardData};

use super::AppContext;
use super::bus::BusRow;
use super::route::RouteRow;
use crate::output::{self, OutputFormat};

/// Arguments for `tickets`
#[derive(Debug, Args)]
pub struct TicketsArgs {
    /// Ticket subcommand
    #[command(subcommand)]
    pub command: TicketCommand,
}

/// Ticket subcommands
#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// Cancel a booked ticket
    Cancel {
        /// Ticket ID
        ticket: TicketId,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Ticket display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct TicketRow {
    /// Ticket ID
    ticket: String,
    /// Passenger
    passenger: String,
    /// Bus
    bus: String,
    /// Seats
    seats: String,
    /// Fare
    fare: String,
    /// Status
    status: String,
}

impl From<&Reservation> for TicketRow {
    fn from(r: &Reservation) -> Self {
        Self {
            ticket: r.ticket_id.to_string(),
            passenger: r.user_name().unwrap_or("-").to_string(),
            bus: r.bus_number().unwrap_or("-").to_string(),
            seats: r.seat_list(),
            fare: format!("{:.2}", r.total_fare),
            status: r.status.to_string(),
        }
    }
}

fn dashboard_view(app: &AppContext) -> Dashboard {
    Dashboard::new(app.api.clone(), app.view.clone())
}

pub async fn show(app: &AppContext) -> Result<(), AppError> {
    let data = dashboard_view(app).load().await?;
    if app.format == OutputFormat::Json {
        output::print_json(&data);
        return Ok(());
    }
    print_dashboard(&data, app.format);
    Ok(())
}

fn print_dashboard(data: &DashboardData, format: OutputFormat) {
    if let Some(user) = &data.user {
        output::print_kv("Signed in as", &format!("{} <{}>", user.name, user.email));
        output::print_kv("Role", user.role.as_str());
        println!();
    }
    match data.role() {
        Some(UserRole::Commuter) => {
            println!("My tickets:");
            let rows: Vec<TicketRow> = data.reservations.iter().map(TicketRow::from).collect();
            output::print_list(&rows, format);
        }
        Some(UserRole::Admin) => {
            println!("Reservations:");
            let rows: Vec<TicketRow> = data.reservations.iter().map(TicketRow::from).collect();
            output::print_list(&rows, format);
            println!();
            println!("Buses:");
            let rows: Vec<BusRow> = data.buses.iter().map(BusRow::from).collect();
            output::print_list(&rows, format);
        }
        Some(UserRole::Operator) => {
            println!("My buses:");
            let rows: Vec<BusRow> = data.buses.iter().map(BusRow::from).collect();
            output::print_list(&rows, format);
            println!();
            println!("Routes:");
            let rows: Vec<RouteRow> = data.routes.iter().map(RouteRow::from).collect();
            output::print_list(&rows, format);
        }
        None => {}
    }
}

pub async fn tickets(args: &TicketsArgs, app: &AppContext) -> Result<(), AppError> {
    match &args.command {
        TicketCommand::Cancel { ticket, force } => {
            if !output::confirm(&format!("Cancel ticket {ticket}?"), *force)? {
                println!("Aborted.");
                return Ok(());
            }
            let view = dashboard_view(app);
            view.load().await?;
            view.cancel_ticket(ticket).await?;
            let data = view.data();
            let rows: Vec<TicketRow> = data.reservations.iter().map(TicketRow::from).collect();
            output::print_list(&rows, app.format);
        }
    }
    Ok(())
}
