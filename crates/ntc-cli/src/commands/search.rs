//! Trip search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use ntc_core::error::AppError;
use ntc_entity::Trip;
use ntc_view::trip_search::TripSearch;

use super::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for `search`
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin; omit every field to list known endpoints
    #[arg(long)]
    pub from: Option<String>,
    /// Destination
    #[arg(long)]
    pub to: Option<String>,
    /// Travel date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

/// Trip display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct TripRow {
    /// Trip ID
    id: String,
    /// Route
    route: String,
    /// Bus
    bus: String,
    /// Departure
    departure: String,
    /// Arrival
    arrival: String,
    /// Free seats
    seats: String,
    /// Booking command
    book: String,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            route: trip.route().map_or_else(|| "-".to_string(), |r| r.label()),
            bus: trip.bus_number().unwrap_or("-").to_string(),
            departure: trip.departure_time.format("%Y-%m-%d %H:%M").to_string(),
            arrival: trip.arrival_time.format("%Y-%m-%d %H:%M").to_string(),
            seats: trip
                .available_seats
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            book: if trip.is_bookable() {
                format!("ntc seats {}", trip.id)
            } else {
                "full".to_string()
            },
        }
    }
}

/// Endpoint display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EndpointRow {
    /// From
    start_point: String,
    /// To
    end_point: String,
}

pub async fn execute(args: &SearchArgs, app: &AppContext) -> Result<(), AppError> {
    let view = TripSearch::new(app.api.clone(), app.api.clone(), app.view.clone());

    if args.from.is_none() && args.to.is_none() && args.date.is_none() {
        let choices = view.load_routes().await?;
        if app.format == OutputFormat::Json {
            output::print_json(&choices);
            return Ok(());
        }
        let len = choices.start_points.len().max(choices.end_points.len());
        let rows: Vec<EndpointRow> = (0..len)
            .map(|i| EndpointRow {
                start_point: choices.start_points.get(i).cloned().unwrap_or_default(),
                end_point: choices.end_points.get(i).cloned().unwrap_or_default(),
            })
            .collect();
        output::print_list(&rows, app.format);
        return Ok(());
    }

    let trips = view
        .search(
            args.from.as_deref().unwrap_or_default(),
            args.to.as_deref().unwrap_or_default(),
            args.date.as_deref().unwrap_or_default(),
        )
        .await?;
    let rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
    output::print_list(&rows, app.format);
    Ok(())
}
