//! Route model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ntc_core::types::RouteId;

/// A route between two points, with its distance and fare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route id.
    #[serde(rename = "_id")]
    pub id: RouteId,
    /// Origin.
    pub start_point: String,
    /// Destination.
    pub end_point: String,
    /// Distance in kilometres.
    #[serde(default)]
    pub distance: f64,
    /// Fare per seat.
    #[serde(default)]
    pub fare: f64,
}

impl Route {
    /// `"Colombo - Kandy"` style label.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_point, self.end_point)
    }
}

/// Body for creating or updating a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RouteDraft {
    /// Origin.
    #[validate(length(min = 1, message = "start point is required"))]
    pub start_point: String,
    /// Destination.
    #[validate(length(min = 1, message = "end point is required"))]
    pub end_point: String,
    /// Distance in kilometres.
    #[validate(range(exclusive_min = 0.0, message = "distance must be positive"))]
    pub distance: f64,
    /// Fare per seat.
    #[validate(range(min = 0.0, message = "fare must not be negative"))]
    pub fare: f64,
}

impl From<&Route> for RouteDraft {
    fn from(route: &Route) -> Self {
        Self {
            start_point: route.start_point.clone(),
            end_point: route.end_point.clone(),
            distance: route.distance,
            fare: route.fare,
        }
    }
}
