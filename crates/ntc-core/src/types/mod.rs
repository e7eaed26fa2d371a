//! Shared value types: identifiers, roles, seat numbers, and notice kinds.

pub mod id;
pub mod notice;
pub mod role;

pub use id::{BusId, ReservationId, RouteId, TicketId, TripId, UserId};
pub use notice::NoticeKind;
pub use role::UserRole;

/// A seat number on a bus, counted from 1.
pub type SeatNumber = u32;
