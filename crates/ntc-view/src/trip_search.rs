//! Trip search, the home screen.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use ntc_client::{RouteService, TripService};
use ntc_core::error::{AppError, ErrorKind};
use ntc_core::result::AppResult;
use ntc_entity::{Trip, TripSearchQuery};

use crate::context::ViewContext;

const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields.";
const SEARCH_BUSY_MESSAGE: &str = "A search is already in progress.";

/// Distinct origins and destinations offered by the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteChoices {
    /// Sorted origins.
    pub start_points: Vec<String>,
    /// Sorted destinations.
    pub end_points: Vec<String>,
}

/// View model of the trip search screen.
pub struct TripSearch {
    trips: Arc<dyn TripService>,
    routes: Arc<dyn RouteService>,
    ctx: ViewContext,
    searching: AtomicBool,
    results: Mutex<Vec<Trip>>,
}

impl TripSearch {
    pub fn new(
        trips: Arc<dyn TripService>,
        routes: Arc<dyn RouteService>,
        ctx: ViewContext,
    ) -> Self {
        Self {
            trips,
            routes,
            ctx,
            searching: AtomicBool::new(false),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Build the origin and destination choices from the route list.
    pub async fn load_routes(&self) -> AppResult<RouteChoices> {
        let token = self.ctx.session.token();
        let routes = self
            .routes
            .list_routes(token.as_deref())
            .await
            .map_err(|err| self.ctx.fail(err, "Failed to fetch routes."))?;

        let start: BTreeSet<String> = routes.iter().map(|r| r.start_point.clone()).collect();
        let end: BTreeSet<String> = routes.iter().map(|r| r.end_point.clone()).collect();
        Ok(RouteChoices {
            start_points: start.into_iter().collect(),
            end_points: end.into_iter().collect(),
        })
    }

    /// Whether a search is in flight.
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Results of the last successful search.
    pub fn results(&self) -> Vec<Trip> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Search trips from `start` to `end` on `date` (`YYYY-MM-DD`).
    pub async fn search(&self, start: &str, end: &str, date: &str) -> AppResult<Vec<Trip>> {
        let Some(_flag) = SearchFlag::raise(&self.searching) else {
            return Err(self.ctx.reject(AppError::busy(SEARCH_BUSY_MESSAGE)));
        };

        let query = parse_query(start, end, date).map_err(|err| self.ctx.reject(err))?;
        let token = self.ctx.require_token()?;

        debug!(
            start = %query.start_point,
            end = %query.end_point,
            date = %query.date,
            "Searching trips"
        );
        match self.trips.search_trips(&token, &query).await {
            Ok(trips) => {
                info!(count = trips.len(), "Trip search finished");
                *self.results.lock().unwrap_or_else(PoisonError::into_inner) = trips.clone();
                Ok(trips)
            }
            Err(err) => {
                self.ctx.notifier.error(search_failure_message(err.kind));
                if err.is(ErrorKind::Unauthorized) {
                    self.ctx.navigator.redirect_to_login();
                }
                Err(err)
            }
        }
    }
}

fn parse_query(start: &str, end: &str, date: &str) -> AppResult<TripSearchQuery> {
    let (start, end, date) = (start.trim(), end.trim(), date.trim());
    if start.is_empty() || end.is_empty() || date.is_empty() {
        return Err(AppError::validation(MISSING_FIELDS_MESSAGE));
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date '{date}', expected YYYY-MM-DD.")))?;
    Ok(TripSearchQuery {
        start_point: start.to_string(),
        end_point: end.to_string(),
        date,
    })
}

fn search_failure_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "No trips found for the selected route and date.",
        ErrorKind::Unauthorized | ErrorKind::Forbidden => "Unauthorized. Please log in again.",
        ErrorKind::ServiceUnavailable => "Server error. Please try again later.",
        _ => "An unexpected error occurred. Please try again.",
    }
}

/// Holds the searching flag while alive.
struct SearchFlag<'a>(&'a AtomicBool);

impl<'a> SearchFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SearchFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
