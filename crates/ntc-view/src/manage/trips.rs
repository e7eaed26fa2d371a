//! Trip management.

use std::sync::Arc;

use ntc_client::TripService;
use ntc_core::result::AppResult;
use ntc_core::types::TripId;
use ntc_entity::{Trip, TripDraft};

use super::{Action, Catalog, Searchable, check_draft, contains, log_reload, report};
use crate::context::ViewContext;

const RESOURCE: &str = "Trip";

impl Searchable for Trip {
    fn matches(&self, needle: &str) -> bool {
        let route = self.route();
        contains(route.map(|r| r.start_point.as_str()), needle)
            || contains(route.map(|r| r.end_point.as_str()), needle)
            || contains(self.bus_number(), needle)
    }
}

/// View model of the trip management screen.
pub struct TripsView {
    service: Arc<dyn TripService>,
    ctx: ViewContext,
    items: Catalog<Trip>,
}

impl TripsView {
    pub fn new(service: Arc<dyn TripService>, ctx: ViewContext) -> Self {
        Self {
            service,
            ctx,
            items: Catalog::default(),
        }
    }

    pub async fn load(&self) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        match self.service.list_trips(&token).await {
            Ok(trips) => {
                self.items.replace(trips);
                Ok(())
            }
            Err(err) => Err(self.ctx.fail(err, "Failed to fetch trips.")),
        }
    }

    pub fn items(&self) -> Vec<Trip> {
        self.items.snapshot()
    }

    /// Trips whose route endpoints or bus number contain `term`.
    pub fn filtered(&self, term: &str) -> Vec<Trip> {
        self.items.filtered(term)
    }

    /// Schedule a trip. Arrival must be after departure.
    pub async fn create(&self, draft: &TripDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.create_trip(&token, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Add, result)).await
    }

    pub async fn update(&self, id: &TripId, draft: &TripDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.update_trip(&token, id, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Update, result)).await
    }

    pub async fn delete(&self, id: &TripId) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.delete_trip(&token, id).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Delete, result)).await
    }

    async fn finish(&self, outcome: AppResult<()>) -> AppResult<()> {
        outcome?;
        log_reload(self.load().await);
        Ok(())
    }
}
