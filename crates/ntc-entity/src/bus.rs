//! Bus model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ntc_core::types::{BusId, RouteId};

use crate::reference::Ref;
use crate::route::Route;
use crate::user::UserSummary;

/// A bus with a fixed seating capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Bus id.
    #[serde(rename = "_id")]
    pub id: BusId,
    /// Registration / fleet number shown to passengers.
    pub bus_number: String,
    /// Number of seats, numbered `1..=capacity`.
    pub capacity: u32,
    /// Route the bus is assigned to.
    #[serde(default)]
    pub route_id: Option<Ref<Route>>,
    /// Operator that owns the bus.
    #[serde(default)]
    pub bus_owner: Option<Ref<UserSummary>>,
    /// Government permit number.
    #[serde(default)]
    pub bus_permission_number: Option<String>,
}

impl Bus {
    /// Assigned route label, or a placeholder.
    pub fn route_label(&self) -> String {
        match self.route_id.as_ref() {
            Some(Ref::Populated(route)) => route.label(),
            Some(Ref::Id(id)) => id.clone(),
            None => "No Route Assigned".to_string(),
        }
    }

    /// Owner's display name, if the owner is populated.
    pub fn owner_name(&self) -> Option<&str> {
        self.bus_owner
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|o| o.name.as_deref())
    }
}

/// Body for creating or updating a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BusDraft {
    /// Registration / fleet number.
    #[validate(length(min = 1, message = "bus number is required"))]
    pub bus_number: String,
    /// Number of seats.
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: u32,
    /// Assigned route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<RouteId>,
    /// Owner reference, as accepted by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_owner: Option<String>,
    /// Government permit number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_permission_number: Option<String>,
}
