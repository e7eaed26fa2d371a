//! Reservation listing commands.

use clap::{Args, Subcommand};

use ntc_core::error::AppError;
use ntc_view::manage::ReservationsView;

use super::AppContext;
use super::dashboard::TicketRow;
use crate::output;

/// Arguments for reservation commands
#[derive(Debug, Args)]
pub struct ReservationArgs {
    /// Reservation subcommand
    #[command(subcommand)]
    pub command: ReservationCommand,
}

/// Reservation subcommands
#[derive(Debug, Subcommand)]
pub enum ReservationCommand {
    /// List reservations (admin), or only your own with --mine
    List {
        /// Only the signed-in user's reservations
        #[arg(long)]
        mine: bool,
        /// Filter by ticket ID or passenger name
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Execute reservation commands
pub async fn execute(args: &ReservationArgs, app: &AppContext) -> Result<(), AppError> {
    let view = ReservationsView::new(app.api.clone(), app.view.clone());

    match &args.command {
        ReservationCommand::List { mine, search } => {
            if *mine {
                view.load_mine().await?;
            } else {
                view.load().await?;
            }
            let reservations = view.filtered(search.as_deref().unwrap_or_default());
            let rows: Vec<TicketRow> = reservations.iter().map(TicketRow::from).collect();
            output::print_list(&rows, app.format);
        }
    }

    Ok(())
}
