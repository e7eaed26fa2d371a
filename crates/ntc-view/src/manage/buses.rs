//! Bus management.

use std::sync::Arc;

use ntc_client::BusService;
use ntc_core::result::AppResult;
use ntc_core::types::{BusId, UserRole};
use ntc_entity::{Bus, BusDraft};

use super::{Action, Catalog, Searchable, check_draft, contains, log_reload, report};
use crate::context::ViewContext;

const RESOURCE: &str = "Bus";

impl Searchable for Bus {
    fn matches(&self, needle: &str) -> bool {
        contains(Some(self.bus_number.as_str()), needle)
            || contains(self.owner_name(), needle)
            || contains(self.bus_permission_number.as_deref(), needle)
    }
}

/// Fetch the buses visible to `role`: every bus for admins, the caller's
/// own fleet otherwise.
pub(crate) async fn fetch_buses<S: BusService + ?Sized>(
    service: &S,
    token: &str,
    role: Option<UserRole>,
) -> AppResult<Vec<Bus>> {
    if role.is_some_and(|r| r.is_admin()) {
        service.list_buses(token).await
    } else {
        service.my_buses(token).await
    }
}

/// View model of the bus management screen.
pub struct BusesView {
    service: Arc<dyn BusService>,
    ctx: ViewContext,
    items: Catalog<Bus>,
}

impl BusesView {
    pub fn new(service: Arc<dyn BusService>, ctx: ViewContext) -> Self {
        Self {
            service,
            ctx,
            items: Catalog::default(),
        }
    }

    /// Fetch the bus list.
    pub async fn load(&self) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let role = self.ctx.session.role();
        match fetch_buses(self.service.as_ref(), &token, role).await {
            Ok(buses) => {
                self.items.replace(buses);
                Ok(())
            }
            Err(err) => Err(self.ctx.fail(err, "Failed to fetch buses.")),
        }
    }

    pub fn items(&self) -> Vec<Bus> {
        self.items.snapshot()
    }

    /// Buses whose number, owner, or permit contains `term`.
    pub fn filtered(&self, term: &str) -> Vec<Bus> {
        self.items.filtered(term)
    }

    pub async fn create(&self, draft: &BusDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.create_bus(&token, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Add, result)).await
    }

    pub async fn update(&self, id: &BusId, draft: &BusDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.update_bus(&token, id, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Update, result)).await
    }

    pub async fn delete(&self, id: &BusId) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.delete_bus(&token, id).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Delete, result)).await
    }

    async fn finish(&self, outcome: AppResult<()>) -> AppResult<()> {
        outcome?;
        log_reload(self.load().await);
        Ok(())
    }
}
