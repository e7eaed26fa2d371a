//! Reservation listing (admin, or the caller's own).

use std::sync::Arc;

use ntc_client::ReservationService;
use ntc_core::result::AppResult;
use ntc_entity::Reservation;

use super::{Catalog, Searchable, contains};
use crate::context::ViewContext;

impl Searchable for Reservation {
    fn matches(&self, needle: &str) -> bool {
        contains(Some(self.ticket_id.as_str()), needle) || contains(self.user_name(), needle)
    }
}

/// View model of the reservation management screen. Read-only.
pub struct ReservationsView {
    service: Arc<dyn ReservationService>,
    ctx: ViewContext,
    items: Catalog<Reservation>,
}

impl ReservationsView {
    pub fn new(service: Arc<dyn ReservationService>, ctx: ViewContext) -> Self {
        Self {
            service,
            ctx,
            items: Catalog::default(),
        }
    }

    /// Fetch every reservation.
    pub async fn load(&self) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.list_reservations(&token).await;
        self.store(result)
    }

    /// Fetch only the caller's reservations.
    pub async fn load_mine(&self) -> AppResult<()> {
        let token = self.ctx.require_token()?;
        let result = self.service.my_reservations(&token).await;
        self.store(result)
    }

    pub fn items(&self) -> Vec<Reservation> {
        self.items.snapshot()
    }

    /// Reservations whose ticket id or passenger name contains `term`.
    pub fn filtered(&self, term: &str) -> Vec<Reservation> {
        self.items.filtered(term)
    }

    fn store(&self, result: AppResult<Vec<Reservation>>) -> AppResult<()> {
        match result {
            Ok(rows) => {
                self.items.replace(rows);
                Ok(())
            }
            Err(err) => Err(self.ctx.fail(err, "Failed to fetch reservations.")),
        }
    }
}
