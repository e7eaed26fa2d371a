//! # ntc-client
//!
//! Talks to the reservation backend. Defines one service trait per resource
//! (consumed by view models as trait objects), a reqwest-based
//! [`HttpApiClient`] implementing all of them, and the session stores that
//! hold the bearer token between screens and runs.

pub mod api;
pub mod http;
pub mod session;

pub use api::{ApiClient, BusService, ReservationService, RouteService, TripService, UserService};
pub use http::HttpApiClient;
pub use session::{FileSessionStore, MemorySessionStore};
