//! # ntc-entity
//!
//! Wire models exchanged with the reservation backend. Field names follow
//! the backend's JSON (snake_case, `_id` for identifiers). References to
//! other documents may arrive either as a bare id or as a populated object;
//! see [`Ref`].

pub mod bus;
pub mod reference;
pub mod reservation;
pub mod route;
pub mod trip;
pub mod user;

pub use bus::{Bus, BusDraft};
pub use reference::Ref;
pub use reservation::{
    NewReservation, Reservation, ReservationReceipt, ReservationStatus, SeatClaim,
    group_by_ticket,
};
pub use route::{Route, RouteDraft};
pub use trip::{Trip, TripDetails, TripDraft, TripSearchQuery, TripStub};
pub use user::{
    Credentials, LoginResponse, MessageResponse, Registration, User, UserSummary, UserUpdate,
};
