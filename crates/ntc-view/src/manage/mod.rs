//! Management screens: one view model per backend resource.
//!
//! Every screen keeps the last fetched list, filters it locally, and
//! reloads it after a successful change.

pub mod buses;
pub mod reservations;
pub mod routes;
pub mod trips;
pub mod users;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};
use validator::Validate;

use ntc_core::error::AppError;
use ntc_core::result::AppResult;
use ntc_entity::MessageResponse;

use crate::context::ViewContext;

pub use buses::BusesView;
pub use reservations::ReservationsView;
pub use routes::RoutesView;
pub use trips::TripsView;
pub use users::UsersView;

/// Items that can be matched by a free-text filter.
pub trait Searchable {
    /// Whether any searchable field contains `needle`, which is already
    /// lowercase.
    fn matches(&self, needle: &str) -> bool;
}

/// Case-insensitive substring match on an optional field.
pub(crate) fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

/// Items matching `term`; a blank term matches everything.
pub fn filter<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.matches(&needle))
        .collect()
}

/// A change made from a management screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create.
    Add,
    /// Modify.
    Update,
    /// Remove.
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Validate a draft, notifying the user when it is rejected.
pub(crate) fn check_draft<D: Validate>(ctx: &ViewContext, draft: &D) -> AppResult<()> {
    draft
        .validate()
        .map_err(|errors| ctx.reject(AppError::from(errors)))
}

/// Notify the outcome of a change to `resource` (capitalised, singular).
pub(crate) fn report(
    ctx: &ViewContext,
    resource: &str,
    action: Action,
    result: AppResult<MessageResponse>,
) -> AppResult<()> {
    match result {
        Ok(_) => {
            info!(resource, action = action.verb(), "Change applied");
            ctx.notifier
                .info(&format!("{resource} {} successfully!", action.past()));
            Ok(())
        }
        Err(err) => {
            let fallback = format!("Failed to {} {}.", action.verb(), resource.to_lowercase());
            Err(ctx.fail(err, &fallback))
        }
    }
}

/// Log a reload failure after a successful change; the reload has
/// already notified the user.
pub(crate) fn log_reload(result: AppResult<()>) {
    if let Err(err) = result {
        debug!(error = %err, "Reload after change failed");
    }
}

/// The last fetched list of a screen.
#[derive(Debug)]
pub(crate) struct Catalog<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> Catalog<T> {
    pub(crate) fn replace(&self, items: Vec<T>) {
        *self.lock() = items;
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Searchable> Catalog<T> {
    pub(crate) fn filtered(&self, term: &str) -> Vec<T> {
        filter(&self.lock(), term).into_iter().cloned().collect()
    }
}
