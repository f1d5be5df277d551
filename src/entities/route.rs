use serde::{Deserialize, Serialize};

use crate::entities::{FuelStation, TripPlan};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutePlan {
    pub map_url: String,
    pub fuel_stops: Vec<FuelStation>,
    pub total_fuel_cost: f64,
}

impl RoutePlan {
    pub fn new(map_url: String, plan: &TripPlan) -> Self {
        RoutePlan {
            map_url,
            fuel_stops: plan.stations(),
            total_fuel_cost: plan.total_cost,
        }
    }
}
