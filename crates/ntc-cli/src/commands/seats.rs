//! Seat map and reservation commands.

use std::collections::BTreeSet;

use clap::Args;
use tracing::info;

use ntc_core::error::{AppError, ErrorKind};
use ntc_core::types::{SeatNumber, TripId};
use ntc_view::{SeatSelection, SeatToggle};

use super::AppContext;
use crate::output;

/// Arguments for `seats`
#[derive(Debug, Args)]
pub struct SeatsArgs {
    /// Trip ID
    pub trip: TripId,
}

/// Arguments for `reserve`
#[derive(Debug, Args)]
pub struct ReserveArgs {
    /// Trip ID
    pub trip: TripId,
    /// Seat number to reserve (repeatable)
    #[arg(short, long = "seat", required = true)]
    pub seats: Vec<SeatNumber>,
}

fn seat_view(app: &AppContext) -> SeatSelection {
    SeatSelection::new(app.api.clone(), app.view.clone())
}

pub async fn show(args: &SeatsArgs, app: &AppContext) -> Result<(), AppError> {
    let view = seat_view(app);
    view.load_trip(args.trip.clone()).await?;
    output::print_seat_map(&view.snapshot(), app.format);
    Ok(())
}

/// Select every requested seat and submit them as one reservation.
///
/// A conflict reloads the trip and prints the fresh seat map.
pub async fn reserve(args: &ReserveArgs, app: &AppContext) -> Result<(), AppError> {
    let view = seat_view(app);
    view.load_trip(args.trip.clone()).await?;

    let requested: BTreeSet<SeatNumber> = args.seats.iter().copied().collect();
    for seat in requested {
        match view.toggle_seat(seat) {
            Ok(SeatToggle::Selected | SeatToggle::Deselected) => {}
            Ok(SeatToggle::Unavailable) => {
                let err = AppError::conflict(format!("Seat {seat} is already booked."));
                app.view.notifier.error(&err.message);
                output::print_seat_map(&view.snapshot(), app.format);
                return Err(err);
            }
            Err(err) => {
                app.view.notifier.error(&err.message);
                return Err(err);
            }
        }
    }

    match view.submit_reservation().await {
        Ok(receipt) => {
            if let Some(ticket) = &receipt.ticket_id {
                output::print_kv("Ticket", ticket.as_str());
            }
            info!(trip_id = %args.trip, "Reservation complete");
            output::print_seat_map(&view.snapshot(), app.format);
            Ok(())
        }
        Err(err) if err.is(ErrorKind::Conflict) => {
            output::print_warning("Seat availability changed; refreshed seat map:");
            view.reload().await?;
            output::print_seat_map(&view.snapshot(), app.format);
            Err(err)
        }
        Err(err) => Err(err),
    }
}
