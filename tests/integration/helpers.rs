//! Shared test helpers for integration tests.
//!
//! [`FakeBackend`] is an in-memory stand-in for the reservation backend
//! that enforces the same rules the real one does: bearer-token auth, role
//! checks, and seat conflicts.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use ntc_client::{
    BusService, MemorySessionStore, ReservationService, RouteService, TripService, UserService,
};
use ntc_core::error::AppError;
use ntc_core::result::AppResult;
use ntc_core::traits::{Navigator, Notifier, Session, SessionStore};
use ntc_core::types::{
    BusId, NoticeKind, ReservationId, RouteId, SeatNumber, TicketId, TripId, UserId, UserRole,
};
use ntc_entity::{
    Bus, BusDraft, Credentials, LoginResponse, MessageResponse, NewReservation, Ref,
    Registration, Reservation, ReservationReceipt, ReservationStatus, Route, RouteDraft,
    SeatClaim, Trip, TripDetails, TripDraft, TripSearchQuery, TripStub, User, UserSummary,
    UserUpdate,
};
use ntc_view::ViewContext;

pub const COMMUTER_TOKEN: &str = "tok-commuter";
pub const OPERATOR_TOKEN: &str = "tok-operator";
pub const ADMIN_TOKEN: &str = "tok-admin";

/// Records notices and navigation in call order.
#[derive(Clone, Default)]
pub struct Recorder {
    notices: Arc<Mutex<Vec<(NoticeKind, String)>>>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn infos(&self) -> Vec<String> {
        self.of_kind(NoticeKind::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.of_kind(NoticeKind::Error)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    fn of_kind(&self, kind: NoticeKind) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for Recorder {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.lock().unwrap().push((kind, message.to_string()));
    }
}

impl Navigator for Recorder {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// Test application context
pub struct TestApp {
    pub backend: Arc<FakeBackend>,
    pub session: Arc<MemorySessionStore>,
    pub recorder: Recorder,
    pub ctx: ViewContext,
}

impl TestApp {
    /// A seeded backend and no session.
    pub fn anonymous() -> Self {
        let backend = Arc::new(FakeBackend::seeded());
        let session = Arc::new(MemorySessionStore::new());
        let recorder = Recorder::default();
        let ctx = ViewContext::new(
            session.clone(),
            Arc::new(recorder.clone()),
            Arc::new(recorder.clone()),
        );
        Self {
            backend,
            session,
            recorder,
            ctx,
        }
    }

    /// A seeded backend with a session for `role`.
    pub fn signed_in(role: UserRole) -> Self {
        let app = Self::anonymous();
        let token = match role {
            UserRole::Commuter => COMMUTER_TOKEN,
            UserRole::Operator => OPERATOR_TOKEN,
            UserRole::Admin => ADMIN_TOKEN,
        };
        app.session
            .save(Session::new(token, role.as_str()))
            .unwrap();
        app
    }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, day, hour, 0, 0).unwrap()
}

struct Account {
    token: String,
    password: String,
    user: User,
}

struct StoredTrip {
    id: TripId,
    bus_id: BusId,
    route_id: RouteId,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    middle_stops: Option<String>,
}

#[derive(Default)]
struct BackendState {
    accounts: Vec<Account>,
    routes: Vec<Route>,
    buses: Vec<Bus>,
    owners: Vec<(BusId, UserId)>,
    trips: Vec<StoredTrip>,
    reservations: Vec<Reservation>,
    next_id: u32,
}

impl BackendState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn user_for(&self, token: &str) -> AppResult<User> {
        self.accounts
            .iter()
            .find(|a| a.token == token)
            .map(|a| a.user.clone())
            .ok_or_else(|| {
                AppError::unauthorized("HTTP 401 Unauthorized").with_remote_message("Invalid token")
            })
    }

    fn require(&self, token: &str, min: UserRole) -> AppResult<User> {
        let user = self.user_for(token)?;
        if user.role.has_at_least(&min) {
            Ok(user)
        } else {
            Err(AppError::forbidden("HTTP 403 Forbidden").with_remote_message("Access denied"))
        }
    }

    fn route(&self, id: &RouteId) -> AppResult<Route> {
        self.routes
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Route not found"))
    }

    fn bus(&self, id: &BusId) -> AppResult<Bus> {
        self.buses
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| not_found("Bus not found"))
    }

    fn trip(&self, id: &TripId) -> AppResult<&StoredTrip> {
        self.trips
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| not_found("Trip not found"))
    }

    fn booked_on(&self, trip_id: &TripId) -> Vec<SeatNumber> {
        self.reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Booked)
            .filter(|r| {
                r.trip_id
                    .as_ref()
                    .and_then(Ref::populated)
                    .is_some_and(|t| &t.id == trip_id)
            })
            .flat_map(|r| r.seat_numbers.iter().copied())
            .collect()
    }

    fn listing(&self, stored: &StoredTrip) -> AppResult<Trip> {
        let bus = self.bus(&stored.bus_id)?;
        let booked = self.booked_on(&stored.id).len() as u32;
        Ok(Trip {
            id: stored.id.clone(),
            available_seats: Some(bus.capacity.saturating_sub(booked)),
            bus_id: Some(Ref::Populated(bus)),
            route_id: Some(Ref::Populated(self.route(&stored.route_id)?)),
            departure_time: stored.departure_time,
            arrival_time: stored.arrival_time,
            middle_stops: stored.middle_stops.clone(),
        })
    }

    fn book(
        &mut self,
        user: &User,
        trip_id: &TripId,
        seats: Vec<SeatNumber>,
    ) -> AppResult<TicketId> {
        let stored = self.trip(trip_id)?;
        let (bus_id, route_id, departure) =
            (stored.bus_id.clone(), stored.route_id.clone(), stored.departure_time);
        let bus = self.bus(&bus_id)?;
        let fare = self.route(&route_id)?.fare;

        if let Some(seat) = seats.iter().find(|s| **s == 0 || **s > bus.capacity) {
            return Err(AppError::validation("HTTP 400 Bad Request")
                .with_remote_message(format!("Seat {seat} does not exist")));
        }
        let taken = self.booked_on(trip_id);
        let clashes: Vec<String> = seats
            .iter()
            .filter(|s| taken.contains(s))
            .map(ToString::to_string)
            .collect();
        if !clashes.is_empty() {
            return Err(AppError::conflict("HTTP 409 Conflict")
                .with_remote_message(format!("Seats already booked: {}", clashes.join(", "))));
        }

        let ticket = TicketId::new(self.next("TCK"));
        let id = ReservationId::new(self.next("res"));
        self.reservations.push(Reservation {
            id,
            ticket_id: ticket.clone(),
            user_id: Some(Ref::Populated(UserSummary {
                id: Some(user.id.clone()),
                name: Some(user.name.clone()),
                email: Some(user.email.clone()),
            })),
            bus_id: Some(Ref::Populated(bus)),
            trip_id: Some(Ref::Populated(TripStub {
                id: trip_id.clone(),
                departure_time: Some(departure),
            })),
            total_fare: fare * seats.len() as f64,
            seat_numbers: seats,
            status: ReservationStatus::Booked,
        });
        Ok(ticket)
    }
}

fn not_found(remote: &str) -> AppError {
    AppError::not_found("HTTP 404 Not Found").with_remote_message(remote)
}

fn message(text: &str) -> AppResult<MessageResponse> {
    Ok(MessageResponse {
        message: Some(text.to_string()),
    })
}

/// In-memory reservation backend.
pub struct FakeBackend {
    state: Mutex<BackendState>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    /// Three accounts, two routes, two buses, and one trip on bus `b1`
    /// (capacity 8) from Colombo to Kandy on 2026-11-01.
    ///
    /// Ticket `TCK-A` holds seats 1 and 2 for the commuter as two rows;
    /// ticket `TCK-X` (seat 3) is cancelled.
    pub fn seeded() -> Self {
        let mut s = BackendState::default();
        for (id, name, role, token) in [
            ("u-c", "Nimal Perera", UserRole::Commuter, COMMUTER_TOKEN),
            ("u-o", "Kamal Silva", UserRole::Operator, OPERATOR_TOKEN),
            ("u-a", "Admin", UserRole::Admin, ADMIN_TOKEN),
        ] {
            s.accounts.push(Account {
                token: token.to_string(),
                password: "secret123".to_string(),
                user: User {
                    id: UserId::new(id),
                    name: name.to_string(),
                    email: format!("{id}@ntc.lk"),
                    phone_number: Some("0771234567".into()),
                    role,
                },
            });
        }

        s.routes = vec![
            Route {
                id: RouteId::new("r1"),
                start_point: "Colombo".into(),
                end_point: "Kandy".into(),
                distance: 115.0,
                fare: 450.0,
            },
            Route {
                id: RouteId::new("r2"),
                start_point: "Colombo".into(),
                end_point: "Galle".into(),
                distance: 126.0,
                fare: 520.0,
            },
            Route {
                id: RouteId::new("r3"),
                start_point: "Kandy".into(),
                end_point: "Jaffna".into(),
                distance: 321.0,
                fare: 1200.0,
            },
        ];

        let operator = UserSummary {
            id: Some(UserId::new("u-o")),
            name: Some("Kamal Silva".into()),
            email: Some("u-o@ntc.lk".into()),
        };
        s.buses = vec![
            Bus {
                id: BusId::new("b1"),
                bus_number: "NB-1234".into(),
                capacity: 8,
                route_id: Some(Ref::Id("r1".into())),
                bus_owner: Some(Ref::Populated(operator)),
                bus_permission_number: Some("PRM-77".into()),
            },
            Bus {
                id: BusId::new("b2"),
                bus_number: "NC-9000".into(),
                capacity: 40,
                route_id: None,
                bus_owner: None,
                bus_permission_number: None,
            },
        ];
        s.owners = vec![(BusId::new("b1"), UserId::new("u-o"))];

        s.trips.push(StoredTrip {
            id: TripId::new("t1"),
            bus_id: BusId::new("b1"),
            route_id: RouteId::new("r1"),
            departure_time: at(1, 6),
            arrival_time: at(1, 10),
            middle_stops: Some("Kegalle".into()),
        });

        let commuter = s.accounts[0].user.clone();
        for seat in [1, 2] {
            s.book(&commuter, &TripId::new("t1"), vec![seat]).unwrap();
        }
        for r in &mut s.reservations {
            r.ticket_id = TicketId::new("TCK-A");
        }
        s.book(&commuter, &TripId::new("t1"), vec![3]).unwrap();
        if let Some(r) = s.reservations.last_mut() {
            r.ticket_id = TicketId::new("TCK-X");
            r.status = ReservationStatus::Cancelled;
        }

        Self {
            state: Mutex::new(s),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Book seats as another passenger, bypassing any client.
    pub fn book_elsewhere(&self, trip: &str, seats: &[SeatNumber]) {
        let mut s = self.state.lock().unwrap();
        let admin = s.accounts[2].user.clone();
        s.book(&admin, &TripId::new(trip), seats.to_vec()).unwrap();
    }

    /// Number of calls made to the named endpoint.
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == endpoint)
            .count()
    }

    /// Reservations stored for `ticket`.
    pub fn ticket_rows(&self, ticket: &str) -> Vec<Reservation> {
        self.state
            .lock()
            .unwrap()
            .reservations
            .iter()
            .filter(|r| r.ticket_id.as_str() == ticket)
            .cloned()
            .collect()
    }

    pub fn bus_numbers(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .buses
            .iter()
            .map(|b| b.bus_number.clone())
            .collect()
    }

    fn enter(&self, endpoint: &'static str) -> std::sync::MutexGuard<'_, BackendState> {
        self.calls.lock().unwrap().push(endpoint);
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl ReservationService for FakeBackend {
    async fn trip_details(&self, token: &str, trip_id: &TripId) -> AppResult<TripDetails> {
        let s = self.enter("trip_details");
        s.user_for(token)?;
        let stored = s.trip(trip_id)?;
        let listing = s.listing(stored)?;
        let reservations = s
            .reservations
            .iter()
            .filter(|r| {
                r.trip_id
                    .as_ref()
                    .and_then(Ref::populated)
                    .is_some_and(|t| &t.id == trip_id)
            })
            .map(|r| SeatClaim {
                seat_numbers: r.seat_numbers.clone(),
                status: r.status,
            })
            .collect();
        Ok(TripDetails {
            id: listing.id,
            bus: s.bus(&stored.bus_id)?,
            route: s.route(&stored.route_id)?,
            departure_time: listing.departure_time,
            arrival_time: listing.arrival_time,
            middle_stops: listing.middle_stops,
            available_seats: listing.available_seats,
            reservations,
        })
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &NewReservation,
    ) -> AppResult<ReservationReceipt> {
        let mut s = self.enter("create_reservation");
        let user = s.user_for(token)?;
        let ticket = s.book(&user, &request.trip_id, request.seat_numbers.clone())?;
        Ok(ReservationReceipt {
            message: Some("Reservation created successfully".into()),
            ticket_id: Some(ticket),
        })
    }

    async fn list_reservations(&self, token: &str) -> AppResult<Vec<Reservation>> {
        let s = self.enter("list_reservations");
        s.require(token, UserRole::Admin)?;
        Ok(s.reservations.clone())
    }

    async fn my_reservations(&self, token: &str) -> AppResult<Vec<Reservation>> {
        let s = self.enter("my_reservations");
        let user = s.user_for(token)?;
        Ok(s.reservations
            .iter()
            .filter(|r| {
                r.user_id
                    .as_ref()
                    .and_then(Ref::populated)
                    .and_then(|u| u.id.as_ref())
                    == Some(&user.id)
            })
            .cloned()
            .collect())
    }

    async fn cancel_ticket(&self, token: &str, ticket_id: &TicketId) -> AppResult<MessageResponse> {
        let mut s = self.enter("cancel_ticket");
        s.user_for(token)?;
        let mut found = false;
        for r in s.reservations.iter_mut().filter(|r| &r.ticket_id == ticket_id) {
            r.status = ReservationStatus::Cancelled;
            found = true;
        }
        if !found {
            return Err(not_found("Ticket not found"));
        }
        message("Reservation cancelled")
    }
}

#[async_trait]
impl TripService for FakeBackend {
    async fn list_trips(&self, token: &str) -> AppResult<Vec<Trip>> {
        let s = self.enter("list_trips");
        s.user_for(token)?;
        s.trips.iter().map(|t| s.listing(t)).collect()
    }

    async fn search_trips(&self, token: &str, query: &TripSearchQuery) -> AppResult<Vec<Trip>> {
        let s = self.enter("search_trips");
        s.user_for(token)?;
        let mut found = Vec::new();
        for stored in &s.trips {
            let route = s.route(&stored.route_id)?;
            if route.start_point == query.start_point
                && route.end_point == query.end_point
                && stored.departure_time.date_naive() == query.date
            {
                found.push(s.listing(stored)?);
            }
        }
        if found.is_empty() {
            return Err(not_found("No trips found"));
        }
        Ok(found)
    }

    async fn create_trip(&self, token: &str, draft: &TripDraft) -> AppResult<MessageResponse> {
        let mut s = self.enter("create_trip");
        s.require(token, UserRole::Operator)?;
        s.bus(&draft.bus_id)?;
        s.route(&draft.route_id)?;
        let id = TripId::new(s.next("t"));
        s.trips.push(StoredTrip {
            id,
            bus_id: draft.bus_id.clone(),
            route_id: draft.route_id.clone(),
            departure_time: draft.departure_time,
            arrival_time: draft.arrival_time,
            middle_stops: Some(draft.middle_stops.clone()),
        });
        message("Trip created")
    }

    async fn update_trip(
        &self,
        token: &str,
        id: &TripId,
        draft: &TripDraft,
    ) -> AppResult<MessageResponse> {
        let mut s = self.enter("update_trip");
        s.require(token, UserRole::Operator)?;
        let stored = s
            .trips
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| not_found("Trip not found"))?;
        stored.departure_time = draft.departure_time;
        stored.arrival_time = draft.arrival_time;
        stored.middle_stops = Some(draft.middle_stops.clone());
        message("Trip updated")
    }

    async fn delete_trip(&self, token: &str, id: &TripId) -> AppResult<MessageResponse> {
        let mut s = self.enter("delete_trip");
        s.require(token, UserRole::Operator)?;
        let before = s.trips.len();
        s.trips.retain(|t| &t.id != id);
        if s.trips.len() == before {
            return Err(not_found("Trip not found"));
        }
        message("Trip deleted")
    }
}

#[async_trait]
impl BusService for FakeBackend {
    async fn list_buses(&self, token: &str) -> AppResult<Vec<Bus>> {
        let s = self.enter("list_buses");
        s.require(token, UserRole::Admin)?;
        Ok(s.buses.clone())
    }

    async fn my_buses(&self, token: &str) -> AppResult<Vec<Bus>> {
        let s = self.enter("my_buses");
        let user = s.require(token, UserRole::Operator)?;
        Ok(s.buses
            .iter()
            .filter(|b| s.owners.iter().any(|(bus, owner)| bus == &b.id && owner == &user.id))
            .cloned()
            .collect())
    }

    async fn create_bus(&self, token: &str, draft: &BusDraft) -> AppResult<MessageResponse> {
        let mut s = self.enter("create_bus");
        let user = s.require(token, UserRole::Operator)?;
        if s.buses.iter().any(|b| b.bus_number == draft.bus_number) {
            return Err(AppError::conflict("HTTP 409 Conflict")
                .with_remote_message("Bus number already registered"));
        }
        let id = BusId::new(s.next("b"));
        s.owners.push((id.clone(), user.id.clone()));
        s.buses.push(Bus {
            id,
            bus_number: draft.bus_number.clone(),
            capacity: draft.capacity,
            route_id: draft.route_id.as_ref().map(|r| Ref::Id(r.to_string())),
            bus_owner: None,
            bus_permission_number: draft.bus_permission_number.clone(),
        });
        message("Bus created")
    }

    async fn update_bus(
        &self,
        token: &str,
        id: &BusId,
        draft: &BusDraft,
    ) -> AppResult<MessageResponse> {
        let mut s = self.enter("update_bus");
        s.require(token, UserRole::Operator)?;
        let bus = s
            .buses
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| not_found("Bus not found"))?;
        bus.bus_number = draft.bus_number.clone();
        bus.capacity = draft.capacity;
        bus.bus_permission_number = draft.bus_permission_number.clone();
        message("Bus updated")
    }

    async fn delete_bus(&self, token: &str, id: &BusId) -> AppResult<MessageResponse> {
        let mut s = self.enter("delete_bus");
        s.require(token, UserRole::Operator)?;
        let before = s.buses.len();
        s.buses.retain(|b| &b.id != id);
        if s.buses.len() == before {
            return Err(not_found("Bus not found"));
        }
        message("Bus deleted")
    }
}

#[async_trait]
impl RouteService for FakeBackend {
    async fn list_routes(&self, _token: Option<&str>) -> AppResult<Vec<Route>> {
        let s = self.enter("list_routes");
        Ok(s.routes.clone())
    }

    async fn create_route(&self, token: &str, draft: &RouteDraft) -> AppResult<MessageResponse> {
        let mut s = self.enter("create_route");
        s.require(token, UserRole::Operator)?;
        let id = RouteId::new(s.next("r"));
        s.routes.push(Route {
            id,
            start_point: draft.start_point.clone(),
            end_point: draft.end_point.clone(),
            distance: draft.distance,
            fare: draft.fare,
        });
        message("Route created")
    }

    async fn update_route(
        &self,
        token: &str,
        id: &RouteId,
        draft: &RouteDraft,
    ) -> AppResult<MessageResponse> {
        let mut s = self.enter("update_route");
        s.require(token, UserRole::Operator)?;
        let route = s
            .routes
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found("Route not found"))?;
        route.start_point = draft.start_point.clone();
        route.end_point = draft.end_point.clone();
        route.distance = draft.distance;
        route.fare = draft.fare;
        message("Route updated")
    }

    async fn delete_route(&self, token: &str, id: &RouteId) -> AppResult<MessageResponse> {
        let mut s = self.enter("delete_route");
        s.require(token, UserRole::Operator)?;
        s.routes.retain(|r| &r.id != id);
        message("Route deleted")
    }
}

#[async_trait]
impl UserService for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        let s = self.enter("login");
        s.accounts
            .iter()
            .find(|a| a.user.email == credentials.email && a.password == credentials.password)
            .map(|a| LoginResponse {
                token: Some(a.token.clone()),
                role: Some(a.user.role.to_string()),
            })
            .ok_or_else(|| {
                AppError::unauthorized("HTTP 401 Unauthorized")
                    .with_remote_message("Invalid email or password")
            })
    }

    async fn register(&self, form: &Registration) -> AppResult<MessageResponse> {
        let mut s = self.enter("register");
        if s.accounts.iter().any(|a| a.user.email == form.email) {
            return Err(AppError::conflict("HTTP 409 Conflict")
                .with_remote_message("User already exists"));
        }
        let id = UserId::new(s.next("u"));
        s.accounts.push(Account {
            token: format!("tok-{id}"),
            password: form.password.clone(),
            user: User {
                id,
                name: form.name.clone(),
                email: form.email.clone(),
                phone_number: Some(form.phone_number.clone()),
                role: form.role,
            },
        });
        message("User registered successfully")
    }

    async fn me(&self, token: &str) -> AppResult<User> {
        let s = self.enter("me");
        s.user_for(token)
    }

    async fn list_users(&self, token: &str) -> AppResult<Vec<User>> {
        let s = self.enter("list_users");
        s.require(token, UserRole::Admin)?;
        Ok(s.accounts.iter().map(|a| a.user.clone()).collect())
    }

    async fn update_user(
        &self,
        token: &str,
        id: &UserId,
        update: &UserUpdate,
    ) -> AppResult<MessageResponse> {
        let mut s = self.enter("update_user");
        s.require(token, UserRole::Admin)?;
        let account = s
            .accounts
            .iter_mut()
            .find(|a| &a.user.id == id)
            .ok_or_else(|| not_found("User not found"))?;
        account.user.name = update.name.clone();
        account.user.email = update.email.clone();
        account.user.role = update.role;
        account.user.phone_number = update.phone_number.clone();
        message("User updated")
    }

    async fn delete_user(&self, token: &str, id: &UserId) -> AppResult<MessageResponse> {
        let mut s = self.enter("delete_user");
        s.require(token, UserRole::Admin)?;
        s.accounts.retain(|a| &a.user.id != id);
        message("User deleted")
    }
}
