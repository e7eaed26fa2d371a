//! User management (admin).

use std::sync::Arc;

use ntc_client::UserService;
use ntc_core::result::AppResult;
use ntc_core::types::UserId;
use ntc_entity::{Registration, User, UserUpdate};

use super::{Action, Catalog, Searchable, check_draft, contains, log_reload, report};
use crate::context::ViewContext;

const RESOURCE: &str = "User";

impl Searchable for User {
    fn matches(&self, needle: &str) -> bool {
        contains(Some(self.name.as_str()), needle)
            || contains(Some(self.email.as_str()), needle)
            || contains(Some(self.role.as_str()), needle)
    }
}

/// View model of the user management screen.
pub struct UsersView {
    service: Arc<dyn UserService>,
    ctx: ViewContext,
    items: Catalog<User>,
}

impl UsersView {
    pub fn new(service: Arc<dyn UserService>, ctx: ViewContext) -> Self {
        Self {
            service,
            ctx,
            items: Catalog::default(),
        }
    }

    pub async fn load(&self) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        match self.service.list_users(&token).await {
            Ok(users) => {
                self.items.replace(users);
                Ok(())
            }
            Err(err) => Err(self.ctx.fail(err, "Failed to fetch users.")),
        }
    }

    pub fn items(&self) -> Vec<User> {
        self.items.snapshot()
    }

    /// Users whose name, email, or role contains `term`.
    pub fn filtered(&self, term: &str) -> Vec<User> {
        self.items.filtered(term)
    }

    /// Create an account through the public registration endpoint.
    pub async fn create(&self, form: &Registration) -> AppResult<()> {
        check_draft(&self.ctx, form)?;
        let result = self.service.register(form).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Add, result)).await
    }

    pub async fn update(&self, id: &UserId, update: &UserUpdate) -> AppResult<()> {
        check_draft(&self.ctx, update)?;
        let token = self.ctx.require_token()?;
        let result = self.service.update_user(&token, id, update).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Update, result)).await
    }

    pub async fn delete(&self, id: &UserId) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.delete_user(&token, id).await;
        self.finish(report(&self.ctx, RESOURCE, Action::Delete, result)).await
    }

    async fn finish(&self, outcome: AppResult<()>) -> AppResult<()> {
        outcome?;
        log_reload(self.load().await);
        Ok(())
    }
}
