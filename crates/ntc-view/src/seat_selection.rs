//! Seat selection for one trip.
//!
//! [`SeatSelection`] loads a trip's seat picture, lets the user toggle free
//! seats, and submits the selection as a single reservation. Every state
//! change is published as a [`SeatMap`] snapshot on a watch channel so a
//! renderer never reads half-updated state.
//!
//! At most one backend call (load or submit) is in flight per view. A
//! second call while one is pending is rejected with `Busy` and leaves the
//! state untouched.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use ntc_client::ReservationService;
use ntc_core::error::{AppError, ErrorKind};
use ntc_core::result::AppResult;
use ntc_core::types::{BusId, SeatNumber, TripId};
use ntc_entity::{NewReservation, ReservationReceipt, TripDetails};

use crate::context::{NO_SESSION_MESSAGE, ViewContext};

/// Where a search result screen lives; used after a trip disappears.
pub const TRIP_SEARCH_PATH: &str = "/tripsearch";

const BUSY_MESSAGE: &str = "Please wait, a request is already in progress.";
const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one seat.";
const STALE_MESSAGE: &str = "Seat availability has changed. Reload the trip and choose again.";
const NOT_LOADED_MESSAGE: &str = "No trip is loaded.";
const TRIP_NOT_FOUND_MESSAGE: &str = "Trip not found.";
const ACCESS_DENIED_MESSAGE: &str = "Access denied. Please log in.";
const LOAD_FAILED_MESSAGE: &str = "Failed to fetch trip details. Please try again later.";
const SUBMIT_FAILED_MESSAGE: &str = "Failed to create reservation.";
const SUBMIT_OK_MESSAGE: &str = "Reservation successful!";

/// Lifecycle of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatPhase {
    /// No trip requested yet.
    #[default]
    Unloaded,
    /// Trip details are being fetched.
    Loading,
    /// Seats can be toggled and submitted.
    Ready,
    /// A reservation request is in flight.
    Submitting,
    /// The backend rejected the selection as conflicting; the seat picture
    /// must be reloaded before anything else.
    Stale,
    /// Loading failed.
    Error,
}

impl SeatPhase {
    /// Whether a backend call is pending.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }
}

/// Trip facts shown above the seat grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    /// Trip id.
    pub trip_id: TripId,
    /// Bus serving the trip.
    pub bus_id: BusId,
    /// Bus registration number.
    pub bus_number: String,
    /// Origin.
    pub start_point: String,
    /// Destination.
    pub end_point: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Free-text intermediate stops.
    pub middle_stops: Option<String>,
    /// Fare per seat.
    pub fare: f64,
}

impl From<&TripDetails> for TripSummary {
    fn from(details: &TripDetails) -> Self {
        Self {
            trip_id: details.id.clone(),
            bus_id: details.bus.id.clone(),
            bus_number: details.bus.bus_number.clone(),
            start_point: details.route.start_point.clone(),
            end_point: details.route.end_point.clone(),
            departure_time: details.departure_time,
            arrival_time: details.arrival_time,
            middle_stops: details.middle_stops.clone(),
            fare: details.route.fare,
        }
    }
}

/// How a single seat is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Can be selected.
    Free,
    /// Held by an existing reservation.
    Booked,
    /// Chosen by the user in this session.
    Selected,
}

/// One seat of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatCell {
    /// 1-based seat number.
    pub number: SeatNumber,
    /// Display state.
    pub status: SeatStatus,
}

/// Immutable snapshot of the view, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeatMap {
    /// Current phase.
    pub phase: SeatPhase,
    /// Loaded trip, if any.
    pub trip: Option<TripSummary>,
    /// Seats on the bus.
    pub capacity: u32,
    /// Seats held by existing reservations.
    pub booked: BTreeSet<SeatNumber>,
    /// Seats chosen by the user.
    pub selected: BTreeSet<SeatNumber>,
}

impl SeatMap {
    /// Status of `seat`, or `None` when it is not on the bus.
    pub fn status(&self, seat: SeatNumber) -> Option<SeatStatus> {
        if seat == 0 || seat > self.capacity {
            None
        } else if self.booked.contains(&seat) {
            Some(SeatStatus::Booked)
        } else if self.selected.contains(&seat) {
            Some(SeatStatus::Selected)
        } else {
            Some(SeatStatus::Free)
        }
    }

    /// Every seat in number order.
    pub fn cells(&self) -> impl Iterator<Item = SeatCell> + '_ {
        (1..=self.capacity).filter_map(|number| {
            self.status(number)
                .map(|status| SeatCell { number, status })
        })
    }

    /// Seats neither booked nor selected.
    pub fn free_count(&self) -> usize {
        (self.capacity as usize)
            .saturating_sub(self.booked.len())
            .saturating_sub(self.selected.len())
    }

    /// Fare for the current selection.
    pub fn selection_fare(&self) -> f64 {
        self.trip
            .as_ref()
            .map_or(0.0, |t| t.fare * self.selected.len() as f64)
    }
}

/// Result of [`SeatSelection::toggle_seat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatToggle {
    /// The seat was free and is now selected.
    Selected,
    /// The seat was selected and is now free.
    Deselected,
    /// The seat is booked; nothing changed.
    Unavailable,
}

#[derive(Debug, Default)]
struct SeatState {
    phase: SeatPhase,
    trip_id: Option<TripId>,
    trip: Option<TripSummary>,
    capacity: u32,
    booked: BTreeSet<SeatNumber>,
    selected: BTreeSet<SeatNumber>,
}

impl SeatState {
    fn snapshot(&self) -> SeatMap {
        SeatMap {
            phase: self.phase,
            trip: self.trip.clone(),
            capacity: self.capacity,
            booked: self.booked.clone(),
            selected: self.selected.clone(),
        }
    }
}

/// View model of the seat layout screen.
pub struct SeatSelection {
    service: Arc<dyn ReservationService>,
    ctx: ViewContext,
    state: Mutex<SeatState>,
    changes: watch::Sender<SeatMap>,
}

impl SeatSelection {
    /// Create an unloaded view.
    pub fn new(service: Arc<dyn ReservationService>, ctx: ViewContext) -> Self {
        let (changes, _) = watch::channel(SeatMap::default());
        Self {
            service,
            ctx,
            state: Mutex::new(SeatState::default()),
            changes,
        }
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SeatMap> {
        self.changes.subscribe()
    }

    /// The current state.
    pub fn snapshot(&self) -> SeatMap {
        self.lock().snapshot()
    }

    /// The current phase.
    pub fn phase(&self) -> SeatPhase {
        self.lock().phase
    }

    /// Seats held by existing reservations.
    pub fn booked_seats(&self) -> BTreeSet<SeatNumber> {
        self.lock().booked.clone()
    }

    /// Seats chosen by the user.
    pub fn selected_seats(&self) -> BTreeSet<SeatNumber> {
        self.lock().selected.clone()
    }

    /// Fetch `trip_id` and derive its booked seats.
    ///
    /// Clears any previous selection. On failure the view enters
    /// [`SeatPhase::Error`] and the user is notified; a missing trip also
    /// sends the user back to trip search.
    pub async fn load_trip(&self, trip_id: TripId) -> AppResult<()> {
        {
            let mut state = self.lock();
            if state.phase.is_in_flight() {
                drop(state);
                return Err(self.ctx.reject(AppError::busy(BUSY_MESSAGE)));
            }
            state.phase = SeatPhase::Loading;
            state.trip_id = Some(trip_id.clone());
            state.trip = None;
            state.capacity = 0;
            state.booked.clear();
            state.selected.clear();
            self.publish(&state);
        }

        let token = match self.ctx.require_token() {
            Ok(token) => token,
            Err(err) => {
                self.set_phase(SeatPhase::Error);
                return Err(err);
            }
        };

        let guard = InFlight::new(self, SeatPhase::Loading, SeatPhase::Error);
        debug!(trip_id = %trip_id, "Fetching trip details");
        let result = self.service.trip_details(&token, &trip_id).await;
        guard.disarm();

        match result {
            Ok(details) => {
                let mut state = self.lock();
                state.capacity = details.bus.capacity;
                state.booked = details.booked_seats();
                state.trip = Some(TripSummary::from(&details));
                state.phase = SeatPhase::Ready;
                info!(
                    trip_id = %trip_id,
                    capacity = state.capacity,
                    booked = state.booked.len(),
                    "Trip loaded"
                );
                self.publish(&state);
                Ok(())
            }
            Err(err) => {
                self.set_phase(SeatPhase::Error);
                warn!(trip_id = %trip_id, error = %err, "Failed to load trip");
                Err(self.report_load_failure(err))
            }
        }
    }

    /// Load the current trip again, discarding the selection.
    ///
    /// This is the only way out of [`SeatPhase::Stale`].
    pub async fn reload(&self) -> AppResult<()> {
        let trip_id = self.lock().trip_id.clone();
        match trip_id {
            Some(id) => self.load_trip(id).await,
            None => Err(self.ctx.reject(AppError::validation(NOT_LOADED_MESSAGE))),
        }
    }

    /// Select a free seat or deselect a selected one.
    ///
    /// Booked seats are left alone and reported as
    /// [`SeatToggle::Unavailable`]. Fails without notifying when the seat
    /// is not on the bus or the view is not ready.
    pub fn toggle_seat(&self, seat: SeatNumber) -> AppResult<SeatToggle> {
        let mut state = self.lock();
        match state.phase {
            SeatPhase::Ready => {}
            SeatPhase::Loading | SeatPhase::Submitting => {
                return Err(AppError::busy(BUSY_MESSAGE));
            }
            SeatPhase::Stale => return Err(AppError::conflict(STALE_MESSAGE)),
            SeatPhase::Unloaded | SeatPhase::Error => {
                return Err(AppError::validation(NOT_LOADED_MESSAGE));
            }
        }

        if seat == 0 || seat > state.capacity {
            return Err(AppError::validation(format!(
                "Seat {seat} does not exist on this bus (1-{}).",
                state.capacity
            )));
        }
        if state.booked.contains(&seat) {
            return Ok(SeatToggle::Unavailable);
        }

        let outcome = if state.selected.remove(&seat) {
            SeatToggle::Deselected
        } else {
            state.selected.insert(seat);
            SeatToggle::Selected
        };
        self.publish(&state);
        Ok(outcome)
    }

    /// Reserve every selected seat in one request.
    ///
    /// On success the seats move from selected to booked. On failure the
    /// selection is kept; a conflict marks the view stale until
    /// [`reload`](Self::reload).
    pub async fn submit_reservation(&self) -> AppResult<ReservationReceipt> {
        let token = self.ctx.session.token();
        let prepared = {
            let mut state = self.lock();
            self.prepare_submit(&mut state, token)
        };
        let (token, request) = prepared.map_err(|err| self.ctx.reject(err))?;

        let guard = InFlight::new(self, SeatPhase::Submitting, SeatPhase::Ready);
        info!(
            trip_id = %request.trip_id,
            seats = ?request.seat_numbers,
            "Submitting reservation"
        );
        let result = self.service.create_reservation(&token, &request).await;
        guard.disarm();

        let mut state = self.lock();
        match result {
            Ok(receipt) => {
                for seat in &request.seat_numbers {
                    state.selected.remove(seat);
                    state.booked.insert(*seat);
                }
                state.phase = SeatPhase::Ready;
                self.publish(&state);
                drop(state);
                info!(ticket_id = ?receipt.ticket_id, "Reservation created");
                self.ctx
                    .succeed(receipt.message.as_deref(), SUBMIT_OK_MESSAGE);
                Ok(receipt)
            }
            Err(err) => {
                state.phase = if err.is(ErrorKind::Conflict) {
                    SeatPhase::Stale
                } else {
                    SeatPhase::Ready
                };
                self.publish(&state);
                drop(state);
                warn!(error = %err, "Reservation failed");
                Err(self.ctx.fail(err, SUBMIT_FAILED_MESSAGE))
            }
        }
    }

    fn prepare_submit(
        &self,
        state: &mut SeatState,
        token: Option<String>,
    ) -> AppResult<(String, NewReservation)> {
        match state.phase {
            SeatPhase::Ready => {}
            SeatPhase::Loading | SeatPhase::Submitting => {
                return Err(AppError::busy(BUSY_MESSAGE));
            }
            SeatPhase::Stale => return Err(AppError::conflict(STALE_MESSAGE)),
            SeatPhase::Unloaded | SeatPhase::Error => {
                return Err(AppError::validation(NOT_LOADED_MESSAGE));
            }
        }
        if state.selected.is_empty() {
            return Err(AppError::validation(EMPTY_SELECTION_MESSAGE));
        }
        let token = token.ok_or_else(|| AppError::unauthorized(NO_SESSION_MESSAGE))?;
        let trip = state
            .trip
            .as_ref()
            .ok_or_else(|| AppError::internal("Ready view without trip details"))?;

        let request = NewReservation {
            trip_id: trip.trip_id.clone(),
            bus_id: trip.bus_id.clone(),
            seat_numbers: state.selected.iter().copied().collect(),
        };
        state.phase = SeatPhase::Submitting;
        self.publish(state);
        Ok((token, request))
    }

    fn report_load_failure(&self, err: AppError) -> AppError {
        match err.kind {
            ErrorKind::NotFound => {
                self.ctx.notifier.error(TRIP_NOT_FOUND_MESSAGE);
                self.ctx.navigator.navigate(TRIP_SEARCH_PATH);
                err
            }
            ErrorKind::Unauthorized | ErrorKind::Forbidden => {
                self.ctx.notifier.error(ACCESS_DENIED_MESSAGE);
                self.ctx.navigator.redirect_to_login();
                err
            }
            _ => {
                self.ctx.notifier.error(LOAD_FAILED_MESSAGE);
                AppError {
                    kind: ErrorKind::ServiceUnavailable,
                    ..err
                }
            }
        }
    }

    fn set_phase(&self, phase: SeatPhase) {
        let mut state = self.lock();
        state.phase = phase;
        self.publish(&state);
    }

    fn publish(&self, state: &SeatState) {
        self.changes.send_replace(state.snapshot());
    }

    fn lock(&self) -> MutexGuard<'_, SeatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores a settled phase if the future driving a backend call is
/// dropped before the call completes.
struct InFlight<'a> {
    view: &'a SeatSelection,
    pending: SeatPhase,
    settled: SeatPhase,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(view: &'a SeatSelection, pending: SeatPhase, settled: SeatPhase) -> Self {
        Self {
            view,
            pending,
            settled,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.view.lock();
        if state.phase == self.pending {
            warn!(phase = ?self.pending, "Request abandoned before completion");
            state.phase = self.settled;
            self.view.publish(&state);
        }
    }
}
