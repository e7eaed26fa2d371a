//! Trip models.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::{Validate, ValidationError};

use ntc_core::types::{BusId, RouteId, SeatNumber, TripId};

use crate::bus::Bus;
use crate::reference::Ref;
use crate::reservation::SeatClaim;
use crate::route::Route;

/// A scheduled run of a bus along a route, as listed by search and
/// management endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip id.
    #[serde(rename = "_id")]
    pub id: TripId,
    /// Bus serving the trip.
    #[serde(default)]
    pub bus_id: Option<Ref<Bus>>,
    /// Route travelled.
    #[serde(default)]
    pub route_id: Option<Ref<Route>>,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Free-text list of intermediate stops.
    #[serde(default)]
    pub middle_stops: Option<String>,
    /// Seats still free, computed by the backend.
    #[serde(default)]
    pub available_seats: Option<u32>,
}

impl Trip {
    /// Whether the trip still has seats to book.
    pub fn is_bookable(&self) -> bool {
        self.available_seats.is_some_and(|n| n > 0)
    }

    /// Application path of this trip's seat layout screen.
    pub fn booking_path(&self) -> String {
        format!("/buslayout/{}", self.id)
    }

    /// Bus number if the bus is populated.
    pub fn bus_number(&self) -> Option<&str> {
        self.bus_id
            .as_ref()
            .and_then(Ref::populated)
            .map(|b| b.bus_number.as_str())
    }

    /// The populated route, if any.
    pub fn route(&self) -> Option<&Route> {
        self.route_id.as_ref().and_then(Ref::populated)
    }
}

/// A trip reference as embedded in reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripStub {
    /// Trip id.
    #[serde(rename = "_id")]
    pub id: TripId,
    /// Scheduled departure, when projected.
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
}

/// Response of `GET /trips/{id}`: the trip with its bus and route
/// populated, plus every reservation made on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetails {
    /// Trip id.
    #[serde(rename = "_id")]
    pub id: TripId,
    /// Bus serving the trip.
    #[serde(rename = "bus_id")]
    pub bus: Bus,
    /// Route travelled.
    #[serde(rename = "route_id")]
    pub route: Route,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Free-text list of intermediate stops.
    #[serde(default)]
    pub middle_stops: Option<String>,
    /// Seats still free, computed by the backend.
    #[serde(default)]
    pub available_seats: Option<u32>,
    /// Reservations on this trip.
    #[serde(default)]
    pub reservations: Vec<SeatClaim>,
}

impl TripDetails {
    /// Seats held by non-cancelled reservations, restricted to
    /// `1..=capacity`.
    pub fn booked_seats(&self) -> BTreeSet<SeatNumber> {
        let capacity = self.bus.capacity;
        let mut booked = BTreeSet::new();
        for claim in self.reservations.iter().filter(|c| c.is_active()) {
            for &seat in &claim.seat_numbers {
                if (1..=capacity).contains(&seat) {
                    booked.insert(seat);
                } else {
                    warn!(
                        trip_id = %self.id,
                        seat = seat,
                        capacity = capacity,
                        "Ignoring reserved seat outside bus capacity"
                    );
                }
            }
        }
        booked
    }
}

/// Body for creating or updating a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_schedule"))]
pub struct TripDraft {
    /// Bus serving the trip.
    pub bus_id: BusId,
    /// Route travelled.
    pub route_id: RouteId,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Free-text list of intermediate stops.
    #[serde(default)]
    pub middle_stops: String,
}

fn validate_schedule(draft: &TripDraft) -> Result<(), ValidationError> {
    if draft.arrival_time <= draft.departure_time {
        let mut err = ValidationError::new("schedule");
        err.message = Some("arrival must be after departure".into());
        return Err(err);
    }
    Ok(())
}

/// Query of `GET /trips/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripSearchQuery {
    /// Origin.
    #[validate(length(min = 1, message = "start point is required"))]
    pub start_point: String,
    /// Destination.
    #[validate(length(min = 1, message = "end point is required"))]
    pub end_point: String,
    /// Travel date.
    pub date: NaiveDate,
}

impl TripSearchQuery {
    /// Query-string pairs in the backend's parameter names.
    pub fn to_params(&self) -> [(&'static str, String); 3] {
        [
            ("start_point", self.start_point.clone()),
            ("end_point", self.end_point.clone()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
        ]
    }
}
