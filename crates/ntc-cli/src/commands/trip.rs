//! Trip management commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use ntc_core::error::AppError;
use ntc_core::types::{BusId, RouteId, TripId};
use ntc_entity::TripDraft;
use ntc_view::manage::TripsView;

use super::AppContext;
use super::search::TripRow;
use crate::output;

/// Arguments for trip commands
#[derive(Debug, Args)]
pub struct TripArgs {
    /// Trip subcommand
    #[command(subcommand)]
    pub command: TripCommand,
}

/// Trip fields shared by `add` and `update`
#[derive(Debug, Args)]
pub struct TripFields {
    /// Bus serving the trip
    #[arg(long)]
    pub bus: BusId,
    /// Route travelled
    #[arg(long)]
    pub route: RouteId,
    /// Departure (RFC 3339, e.g. 2026-11-01T06:30:00Z)
    #[arg(long)]
    pub departure: DateTime<Utc>,
    /// Arrival (RFC 3339)
    #[arg(long)]
    pub arrival: DateTime<Utc>,
    /// Intermediate stops
    #[arg(long, default_value = "")]
    pub stops: String,
}

impl From<&TripFields> for TripDraft {
    fn from(f: &TripFields) -> Self {
        Self {
            bus_id: f.bus.clone(),
            route_id: f.route.clone(),
            departure_time: f.departure,
            arrival_time: f.arrival,
            middle_stops: f.stops.clone(),
        }
    }
}

/// Trip subcommands
#[derive(Debug, Subcommand)]
pub enum TripCommand {
    /// List trips
    List {
        /// Filter by route endpoint or bus number
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Schedule a trip
    Add(TripFields),
    /// Update a trip
    Update {
        /// Trip ID
        id: TripId,
        #[command(flatten)]
        fields: TripFields,
    },
    /// Delete a trip
    Delete {
        /// Trip ID
        id: TripId,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute trip commands
pub async fn execute(args: &TripArgs, app: &AppContext) -> Result<(), AppError> {
    let view = TripsView::new(app.api.clone(), app.view.clone());

    match &args.command {
        TripCommand::List { search } => {
            view.load().await?;
            let trips = view.filtered(search.as_deref().unwrap_or_default());
            let rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
            output::print_list(&rows, app.format);
        }
        TripCommand::Add(fields) => view.create(&TripDraft::from(fields)).await?,
        TripCommand::Update { id, fields } => view.update(id, &TripDraft::from(fields)).await?,
        TripCommand::Delete { id, force } => {
            if output::confirm(&format!("Delete trip {id}?"), *force)? {
                view.delete(id).await?;
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}
