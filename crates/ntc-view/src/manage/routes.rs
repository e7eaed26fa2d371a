//! Route management.

use std::sync::Arc;

use ntc_client::RouteService;
use ntc_core::result::AppResult;
use ntc_core::types::RouteId;
use ntc_entity::{Route, RouteDraft};

use super::{Action, Catalog, Searchable, check_draft, contains, log_reload, report};
use crate::context::ViewContext;

const RESOURCE: &str = "Route";

impl Searchable for Route {
    fn matches(&self, needle: &str) -> bool {
        contains(Some(self.start_point.as_str()), needle)
            || contains(Some(self.end_point.as_str()), needle)
    }
}

/// View model of the route management screen.
pub struct RoutesView {
    service: Arc<dyn RouteService>,
    ctx: ViewContext,
    items: Catalog<Route>,
}

impl RoutesView {
    pub fn new(service: Arc<dyn RouteService>, ctx: ViewContext) -> Self {
        Self {
            service,
            ctx,
            items: Catalog::default(),
        }
    }

    /// Fetch the route list. Listing does not need a session.
    pub async fn load(&self) -> AppResult<()> {
        let token = self.ctx.session.token();
        match self.service.list_routes(token.as_deref()).await {
            Ok(routes) => {
                self.items.replace(routes);
                Ok(())
            }
            Err(err) => Err(self.ctx.fail(err, "Failed to fetch routes.")),
        }
    }

    pub fn items(&self) -> Vec<Route> {
        self.items.snapshot()
    }

    pub fn filtered(&self, term: &str) -> Vec<Route> {
        self.items.filtered(term)
    }

    pub async fn create(&self, draft: &RouteDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.create_route(&token, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Add, result)).await
    }

    pub async fn update(&self, id: &RouteId, draft: &RouteDraft) -> AppResult<()> {
        check_draft(&self.ctx, draft)?;
        let token = self.ctx.require_token()?;
        let result = self.service.update_route(&token, id, draft).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Update, result)).await
    }

    pub async fn delete(&self, id: &RouteId) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.delete_route(&token, id).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Delete, result)).await
    }

    async fn finish(&self, outcome: AppResult<()>) -> AppResult<()> {
        outcome?;
        log_reload(self.load().await);
        Ok(())
    }
}
