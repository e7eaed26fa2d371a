//! Reservation models.

use std::fmt;

use serde::{Deserialize, Serialize};

use ntc_core::types::{BusId, ReservationId, SeatNumber, TicketId, TripId};

use crate::bus::Bus;
use crate::reference::Ref;
use crate::trip::TripStub;
use crate::user::UserSummary;

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Seats are held.
    #[default]
    Booked,
    /// Ticket was cancelled; seats are free again.
    Cancelled,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "booked"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The part of a reservation the seat layout needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatClaim {
    /// Seats covered.
    #[serde(default)]
    pub seat_numbers: Vec<SeatNumber>,
    /// Status; missing means booked.
    #[serde(default)]
    pub status: ReservationStatus,
}

impl SeatClaim {
    /// Whether the claim still holds its seats.
    pub fn is_active(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }
}

/// A reservation row as listed by `/reservations` and `/reservations/my`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation id.
    #[serde(rename = "_id")]
    pub id: ReservationId,
    /// Ticket code; several rows may share one.
    pub ticket_id: TicketId,
    /// Passenger.
    #[serde(default)]
    pub user_id: Option<Ref<UserSummary>>,
    /// Bus.
    #[serde(default)]
    pub bus_id: Option<Ref<Bus>>,
    /// Trip.
    #[serde(default)]
    pub trip_id: Option<Ref<TripStub>>,
    /// Seats covered.
    #[serde(default)]
    pub seat_numbers: Vec<SeatNumber>,
    /// Total fare charged.
    #[serde(default)]
    pub total_fare: f64,
    /// Status.
    #[serde(default)]
    pub status: ReservationStatus,
}

impl Reservation {
    /// Passenger name if populated.
    pub fn user_name(&self) -> Option<&str> {
        self.user_id
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|u| u.name.as_deref())
    }

    /// Bus number if populated.
    pub fn bus_number(&self) -> Option<&str> {
        self.bus_id
            .as_ref()
            .and_then(Ref::populated)
            .map(|b| b.bus_number.as_str())
    }

    /// Whether the ticket can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        self.status == ReservationStatus::Booked
    }

    /// Comma-separated seat list.
    pub fn seat_list(&self) -> String {
        self.seat_numbers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Merge reservation rows that share a ticket id.
///
/// The first row of each ticket is kept and later rows' seats are appended
/// to it; ticket order follows first appearance.
pub fn group_by_ticket(rows: Vec<Reservation>) -> Vec<Reservation> {
    let mut grouped: Vec<Reservation> = Vec::with_capacity(rows.len());
    for row in rows {
        match grouped.iter_mut().find(|r| r.ticket_id == row.ticket_id) {
            Some(existing) => existing.seat_numbers.extend(row.seat_numbers),
            None => grouped.push(row),
        }
    }
    grouped
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    /// Trip being booked.
    pub trip_id: TripId,
    /// Bus serving the trip.
    pub bus_id: BusId,
    /// Seats requested, ascending.
    pub seat_numbers: Vec<SeatNumber>,
}

/// Success response of `POST /reservations`. The backend's body is not
/// contractually fixed, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationReceipt {
    /// Confirmation message.
    #[serde(default)]
    pub message: Option<String>,
    /// Ticket code issued, if echoed back.
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
}
