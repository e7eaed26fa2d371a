//! Service traits for the backend's resources.
//!
//! Every authenticated call takes the bearer token explicitly; the caller
//! decides where the token comes from (normally a
//! [`SessionStore`](ntc_core::traits::SessionStore)).

use async_trait::async_trait;

use ntc_core::result::AppResult;
use ntc_core::types::{BusId, RouteId, TicketId, TripId, UserId};
use ntc_entity::{
    Bus, BusDraft, Credentials, LoginResponse, MessageResponse, NewReservation, Registration,
    Reservation, ReservationReceipt, Route, RouteDraft, Trip, TripDetails, TripDraft,
    TripSearchQuery, User, UserUpdate,
};

/// Reservations and the per-trip seat picture.
#[async_trait]
pub trait ReservationService: Send + Sync + 'static {
    /// `GET /trips/{id}`: trip with bus, route, and reservations.
    async fn trip_details(&self, token: &str, trip_id: &TripId) -> AppResult<TripDetails>;

    /// `POST /reservations`.
    async fn create_reservation(
        &self,
        token: &str,
        request: &NewReservation,
    ) -> AppResult<ReservationReceipt>;

    /// `GET /reservations` (admin).
    async fn list_reservations(&self, token: &str) -> AppResult<Vec<Reservation>>;

    /// `GET /reservations/my`.
    async fn my_reservations(&self, token: &str) -> AppResult<Vec<Reservation>>;

    /// `DELETE /reservations/ticket/{ticket_id}`.
    async fn cancel_ticket(&self, token: &str, ticket_id: &TicketId)
    -> AppResult<MessageResponse>;
}

/// Trip search and management.
#[async_trait]
pub trait TripService: Send + Sync + 'static {
    /// `GET /trips`.
    async fn list_trips(&self, token: &str) -> AppResult<Vec<Trip>>;

    /// `GET /trips/search`.
    async fn search_trips(&self, token: &str, query: &TripSearchQuery) -> AppResult<Vec<Trip>>;

    /// `POST /trips`.
    async fn create_trip(&self, token: &str, draft: &TripDraft) -> AppResult<MessageResponse>;

    /// `PUT /trips/{id}`.
    async fn update_trip(
        &self,
        token: &str,
        id: &TripId,
        draft: &TripDraft,
    ) -> AppResult<MessageResponse>;

    /// `DELETE /trips/{id}`.
    async fn delete_trip(&self, token: &str, id: &TripId) -> AppResult<MessageResponse>;
}

/// Bus management.
#[async_trait]
pub trait BusService: Send + Sync + 'static {
    /// `GET /buses`.
    async fn list_buses(&self, token: &str) -> AppResult<Vec<Bus>>;

    /// `GET /buses/my`: buses owned by the calling operator.
    async fn my_buses(&self, token: &str) -> AppResult<Vec<Bus>>;

    /// `POST /buses`.
    async fn create_bus(&self, token: &str, draft: &BusDraft) -> AppResult<MessageResponse>;

    /// `PUT /buses/{id}`.
    async fn update_bus(&self, token: &str, id: &BusId, draft: &BusDraft)
    -> AppResult<MessageResponse>;

    /// `DELETE /buses/{id}`.
    async fn delete_bus(&self, token: &str, id: &BusId) -> AppResult<MessageResponse>;
}

/// Route management. Listing is public.
#[async_trait]
pub trait RouteService: Send + Sync + 'static {
    /// `GET /routes`; the token is sent when present.
    async fn list_routes(&self, token: Option<&str>) -> AppResult<Vec<Route>>;

    /// `POST /routes`.
    async fn create_route(&self, token: &str, draft: &RouteDraft) -> AppResult<MessageResponse>;

    /// `PUT /routes/{id}`.
    async fn update_route(
        &self,
        token: &str,
        id: &RouteId,
        draft: &RouteDraft,
    ) -> AppResult<MessageResponse>;

    /// `DELETE /routes/{id}`.
    async fn delete_route(&self, token: &str, id: &RouteId) -> AppResult<MessageResponse>;
}

/// Accounts and authentication.
#[async_trait]
pub trait UserService: Send + Sync + 'static {
    /// `POST /users/login`.
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse>;

    /// `POST /users/register`.
    async fn register(&self, form: &Registration) -> AppResult<MessageResponse>;

    /// `GET /users/me`.
    async fn me(&self, token: &str) -> AppResult<User>;

    /// `GET /users` (admin).
    async fn list_users(&self, token: &str) -> AppResult<Vec<User>>;

    /// `PUT /users/{id}` (admin).
    async fn update_user(
        &self,
        token: &str,
        id: &UserId,
        update: &UserUpdate,
    ) -> AppResult<MessageResponse>;

    /// `DELETE /users/{id}` (admin).
    async fn delete_user(&self, token: &str, id: &UserId) -> AppResult<MessageResponse>;
}

/// Every backend service in one bound.
pub trait ApiClient:
    ReservationService + TripService + BusService + RouteService + UserService
{
}

impl<T> ApiClient for T where
    T: ReservationService + TripService + BusService + RouteService + UserService
{
}
