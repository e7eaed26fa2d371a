//! # ntc-view
//!
//! Screen view models. Each view model owns its screen's state, talks to
//! the backend through the service traits of `ntc-client`, and reports
//! outcomes through the collaborators bundled in [`ViewContext`]. None of
//! them knows how it is rendered.

pub mod auth;
pub mod context;
pub mod dashboard;
pub mod manage;
pub mod router;
pub mod seat_selection;
pub mod trip_search;


pub use context::ViewContext;
pub use router::{Resolution, Router, Screen};
pub use seat_selection::{SeatCell, SeatMap, SeatPhase, SeatSelection, SeatStatus, SeatToggle};
