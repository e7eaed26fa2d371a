//! reqwest-based implementation of every service trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use ntc_core::config::api::ApiConfig;
use ntc_core::error::{AppError, ErrorKind};
use ntc_core::result::AppResult;
use ntc_core::types::{BusId, RouteId, TicketId, TripId, UserId};
use ntc_entity::{
    Bus, BusDraft, Credentials, LoginResponse, MessageResponse, NewReservation, Registration,
    Reservation, ReservationReceipt, Route, RouteDraft, Trip, TripDetails, TripDraft,
    TripSearchQuery, User, UserUpdate,
};

use crate::api::{BusService, ReservationService, RouteService, TripService, UserService};

/// HTTP client for the reservation backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    /// Shared connection pool.
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl HttpApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid API base URL '{}'", config.base_url),
                e,
            )
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an API path such as `/trips`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> AppResult<T> {
        self.execute(self.request(Method::GET, path, token)).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> AppResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(method, path, token).json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str, token: &str) -> AppResult<T> {
        self.execute(self.request(Method::DELETE, path, Some(token)))
            .await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let request = builder.build().map_err(transport_error)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        debug!(%method, %path, "Sending API request");

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "API request could not be completed");
            transport_error(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = error_from_status(status, &body);
            warn!(
                %method,
                %path,
                status = status.as_u16(),
                kind = %err.kind,
                "API request rejected"
            );
            return Err(err);
        }

        debug!(%method, %path, status = status.as_u16(), bytes = body.len(), "API request succeeded");
        decode_body(&body)
    }
}

/// Map a non-success response to an [`AppError`].
///
/// The body's `error` field, or `message` when `error` is absent, becomes
/// the error's remote message.
pub fn error_from_status(status: StatusCode, body: &[u8]) -> AppError {
    let kind = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::ServiceUnavailable,
    };

    let err = AppError::new(kind, format!("Backend responded with {status}"));

    let remote = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.as_str())
                .or_else(|| v.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        });

    match remote {
        Some(message) => err.with_remote_message(message),
        None => err,
    }
}

/// Decode a success body. An empty body decodes as `{}` so that endpoints
/// answering `204 No Content` still yield their all-optional response type.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let payload: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    serde_json::from_slice(payload).map_err(|e| {
        AppError::with_source(
            ErrorKind::ServiceUnavailable,
            "Malformed response from the reservation service",
            e,
        )
    })
}

fn transport_error(err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        "Request to the reservation service timed out"
    } else {
        "Failed to reach the reservation service"
    };
    AppError::with_source(ErrorKind::ServiceUnavailable, message, err)
}

#[async_trait]
impl ReservationService for HttpApiClient {
    async fn trip_details(&self, token: &str, trip_id: &TripId) -> AppResult<TripDetails> {
        self.get(&format!("/trips/{trip_id}"), Some(token)).await
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &NewReservation,
    ) -> AppResult<ReservationReceipt> {
        self.send_json(Method::POST, "/reservations", Some(token), request)
            .await
    }

    async fn list_reservations(&self, token: &str) -> AppResult<Vec<Reservation>> {
        self.get("/reservations", Some(token)).await
    }

    async fn my_reservations(&self, token: &str) -> AppResult<Vec<Reservation>> {
        self.get("/reservations/my", Some(token)).await
    }

    async fn cancel_ticket(
        &self,
        token: &str,
        ticket_id: &TicketId,
    ) -> AppResult<MessageResponse> {
        self.delete(&format!("/reservations/ticket/{ticket_id}"), token)
            .await
    }
}

#[async_trait]
impl TripService for HttpApiClient {
    async fn list_trips(&self, token: &str) -> AppResult<Vec<Trip>> {
        self.get("/trips", Some(token)).await
    }

    async fn search_trips(&self, token: &str, query: &TripSearchQuery) -> AppResult<Vec<Trip>> {
        let url = Url::parse_with_params(&self.url("/trips/search"), &query.to_params())
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid search URL", e))?;
        self.execute(self.http.get(url).bearer_auth(token)).await
    }

    async fn create_trip(&self, token: &str, draft: &TripDraft) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, "/trips", Some(token), draft)
            .await
    }

    async fn update_trip(
        &self,
        token: &str,
        id: &TripId,
        draft: &TripDraft,
    ) -> AppResult<MessageResponse> {
        self.send_json(Method::PUT, &format!("/trips/{id}"), Some(token), draft)
            .await
    }

    async fn delete_trip(&self, token: &str, id: &TripId) -> AppResult<MessageResponse> {
        self.delete(&format!("/trips/{id}"), token).await
    }
}

#[async_trait]
impl BusService for HttpApiClient {
    async fn list_buses(&self, token: &str) -> AppResult<Vec<Bus>> {
        self.get("/buses", Some(token)).await
    }

    async fn my_buses(&self, token: &str) -> AppResult<Vec<Bus>> {
        self.get("/buses/my", Some(token)).await
    }

    async fn create_bus(&self, token: &str, draft: &BusDraft) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, "/buses", Some(token), draft)
            .await
    }

    async fn update_bus(
        &self,
        token: &str,
        id: &BusId,
        draft: &BusDraft,
    ) -> AppResult<MessageResponse> {
        self.send_json(Method::PUT, &format!("/buses/{id}"), Some(token), draft)
            .await
    }

    async fn delete_bus(&self, token: &str, id: &BusId) -> AppResult<MessageResponse> {
        self.delete(&format!("/buses/{id}"), token).await
    }
}

#[async_trait]
impl RouteService for HttpApiClient {
    async fn list_routes(&self, token: Option<&str>) -> AppResult<Vec<Route>> {
        self.get("/routes", token).await
    }

    async fn create_route(&self, token: &str, draft: &RouteDraft) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, "/routes", Some(token), draft)
            .await
    }

    async fn update_route(
        &self,
        token: &str,
        id: &RouteId,
        draft: &RouteDraft,
    ) -> AppResult<MessageResponse> {
        self.send_json(Method::PUT, &format!("/routes/{id}"), Some(token), draft)
            .await
    }

    async fn delete_route(&self, token: &str, id: &RouteId) -> AppResult<MessageResponse> {
        self.delete(&format!("/routes/{id}"), token).await
    }
}

#[async_trait]
impl UserService for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        self.send_json(Method::POST, "/users/login", None, credentials)
            .await
    }

    async fn register(&self, form: &Registration) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, "/users/register", None, form)
            .await
    }

    async fn me(&self, token: &str) -> AppResult<User> {
        self.get("/users/me", Some(token)).await
    }

    async fn list_users(&self, token: &str) -> AppResult<Vec<User>> {
        self.get("/users", Some(token)).await
    }

    async fn update_user(
        &self,
        token: &str,
        id: &UserId,
        update: &UserUpdate,
    ) -> AppResult<MessageResponse> {
        self.send_json(Method::PUT, &format!("/users/{id}"), Some(token), update)
            .await
    }

    async fn delete_user(&self, token: &str, id: &UserId) -> AppResult<MessageResponse> {
        self.delete(&format!("/users/{id}"), token).await
    }
}
