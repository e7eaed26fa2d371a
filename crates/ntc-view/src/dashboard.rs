//! Role-dependent dashboard.
//!
//! Commuters see their tickets. Admins see every reservation and every
//! bus. Operators see their own fleet and the route list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use ntc_client::ApiClient;
use ntc_core::error::AppError;
use ntc_core::result::AppResult;
use ntc_core::types::{BusId, TicketId, UserRole};
use ntc_entity::{Bus, BusDraft, Reservation, Route, User, group_by_ticket};

use crate::context::ViewContext;
use crate::manage::buses::fetch_buses;
use crate::manage::{Action, check_draft, report};

const PROFILE_FAILED_MESSAGE: &str = "Failed to load your profile. Please log in again.";
const DATA_FAILED_MESSAGE: &str = "Failed to load dashboard data.";

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardData {
    /// Signed-in user.
    pub user: Option<User>,
    /// Reservations grouped by ticket.
    pub reservations: Vec<Reservation>,
    /// Buses (admin: all, operator: own).
    pub buses: Vec<Bus>,
    /// Routes (operator).
    pub routes: Vec<Route>,
}

impl DashboardData {
    /// Role of the loaded user.
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// View model of the dashboard screen.
pub struct Dashboard {
    api: Arc<dyn ApiClient>,
    ctx: ViewContext,
    data: Mutex<DashboardData>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn ApiClient>, ctx: ViewContext) -> Self {
        Self {
            api,
            ctx,
            data: Mutex::new(DashboardData::default()),
        }
    }

    /// The last loaded data.
    pub fn data(&self) -> DashboardData {
        self.lock().clone()
    }

    /// Fetch the profile, then the data for its role.
    pub async fn load(&self) -> AppResult<DashboardData> {
        let token = self.ctx.require_token()?;

        let user = match self.api.me(&token).await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Failed to load profile");
                self.ctx.notifier.error(PROFILE_FAILED_MESSAGE);
                self.ctx.navigator.redirect_to_login();
                return Err(err);
            }
        };

        let api = self.api.as_ref();
        let mut data = DashboardData::default();
        let fetched = match user.role {
            UserRole::Commuter => api
                .my_reservations(&token)
                .await
                .map(|rows| data.reservations = group_by_ticket(rows)),
            UserRole::Admin => {
                tokio::try_join!(api.list_reservations(&token), api.list_buses(&token)).map(
                    |(rows, buses)| {
                        data.reservations = group_by_ticket(rows);
                        data.buses = buses;
                    },
                )
            }
            UserRole::Operator => {
                let routes = api.list_routes(Some(token.as_str()));
                tokio::try_join!(api.my_buses(&token), routes).map(|(buses, routes)| {
                    data.buses = buses;
                    data.routes = routes;
                })
            }
        };
        fetched.map_err(|err| self.ctx.fail(err, DATA_FAILED_MESSAGE))?;

        info!(
            role = %user.role,
            reservations = data.reservations.len(),
            buses = data.buses.len(),
            routes = data.routes.len(),
            "Dashboard loaded"
        );
        data.user = Some(user);
        *self.lock() = data.clone();
        Ok(data)
    }

    /// Cancel one of the commuter's tickets, then refresh the list.
    ///
    /// Only tickets still `booked` can be cancelled.
    pub async fn cancel_ticket(&self, ticket_id: &TicketId) -> AppResult<()> {
        let cancellable = self
            .lock()
            .reservations
            .iter()
            .find(|r| &r.ticket_id == ticket_id)
            .map(Reservation::is_cancellable);
        match cancellable {
            Some(true) => {}
            Some(false) => {
                return Err(self.ctx.reject(AppError::validation(format!(
                    "Ticket {ticket_id} is not booked and cannot be cancelled."
                ))));
            }
            None => {
                return Err(self
                    .ctx
                    .reject(AppError::not_found(format!("Ticket {ticket_id} not found."))));
            }
        }

        let token = self.ctx.require_token()?;
        let response = self
            .api
            .cancel_ticket(&token, ticket_id)
            .await
            .map_err(|err| self.ctx.fail(err, "Failed to cancel ticket."))?;
        info!(ticket_id = %ticket_id, "Ticket cancelled");
        self.ctx.succeed(
            response.message.as_deref(),
            "Ticket cancelled successfully!",
        );

        match self.api.my_reservations(&token).await {
            Ok(rows) => self.lock().reservations = group_by_ticket(rows),
            Err(err) => {
                self.ctx.fail(err, "Failed to refresh reservations.");
            }
        }
        Ok(())
    }

    pub async fn add_bus(&self, draft: &BusDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.api.create_bus(&token, draft).await;
        report(&self.ctx, "Bus", Action::Add, result)?;
        self.refresh_buses(&token).await;
        Ok(())
    }

    pub async fn update_bus(&self, id: &BusId, draft: &BusDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.api.update_bus(&token, id, draft).await;
        report(&self.ctx, "Bus", Action::Update, result)?;
        self.refresh_buses(&token).await;
        Ok(())
    }

    pub async fn delete_bus(&self, id: &BusId) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.api.delete_bus(&token, id).await;
        report(&self.ctx, "Bus", Action::Delete, result)?;
        self.refresh_buses(&token).await;
        Ok(())
    }

    async fn refresh_buses(&self, token: &str) {
        let role = self.lock().role().or_else(|| self.ctx.session.role());
        match fetch_buses(self.api.as_ref(), token, role).await {
            Ok(buses) => self.lock().buses = buses,
            Err(err) => {
                debug!(error = %err, "Bus refresh failed");
                self.ctx.fail(err, "Failed to fetch buses.");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
