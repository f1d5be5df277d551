use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, FuelStation};

/// A refuel at `station`, chosen from the route point `trigger`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    pub station: FuelStation,
    pub trigger: Coordinates,
    pub gallons: f64,
    pub cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub stops: Vec<FuelStop>,
    pub total_cost: f64,
}

impl TripPlan {
    pub fn stations(&self) -> Vec<FuelStation> {
        self.stops.iter().map(|stop| stop.station.clone()).collect()
    }
}
