//! Greedy fuel-stop planning along a route.
//!
//! The vehicle leaves with a full tank. After every segment, if the range left
//! has dropped to the safety buffer or below, the cheapest station within one
//! tank of the segment's start is added as a stop and the tank is refilled
//! according to the [`RefuelPolicy`]. Reaching the destination with fuel left
//! ends the trip without a stop. When no station is in reach, planning only
//! fails if the rest of the route does not fit in the range left.

mod distance;
mod refuel;

pub use distance::{DistanceModel, Geodesic, METERS_PER_MILE};
pub use refuel::{FullTank, Refill, RefuelPolicy, TopUp};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Coordinates, FuelStation, FuelStop, TripPlan, Waypoint};

pub const DEFAULT_MAX_RANGE: f64 = 500.0;
pub const DEFAULT_FUEL_EFFICIENCY: f64 = 10.0;
pub const DEFAULT_SAFETY_BUFFER: f64 = 100.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error("invalid planning parameters: {0}")]
    InvalidParameters(String),
    #[error("no fuel station within {max_range} miles of ({lat}, {lng})")]
    RangeExhausted { lat: f64, lng: f64, max_range: f64 },
}

/// Vehicle model. Distances are in miles, efficiency in miles per gallon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningParameters {
    pub max_range: f64,
    pub fuel_efficiency: f64,
    pub safety_buffer: f64,
}

impl Default for PlanningParameters {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_MAX_RANGE,
            fuel_efficiency: DEFAULT_FUEL_EFFICIENCY,
            safety_buffer: DEFAULT_SAFETY_BUFFER,
        }
    }
}

impl PlanningParameters {
    pub fn new(max_range: f64, fuel_efficiency: f64) -> Self {
        Self {
            max_range,
            fuel_efficiency,
            safety_buffer: DEFAULT_SAFETY_BUFFER,
        }
    }

    pub fn with_safety_buffer(mut self, safety_buffer: f64) -> Self {
        self.safety_buffer = safety_buffer;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(PlanError::InvalidParameters(format!(
                "max range must be positive, got {}",
                self.max_range
            )));
        }

        if !(self.fuel_efficiency.is_finite() && self.fuel_efficiency > 0.0) {
            return Err(PlanError::InvalidParameters(format!(
                "fuel efficiency must be positive, got {}",
                self.fuel_efficiency
            )));
        }

        // a buffer at or above the tank size would force a stop after every segment
        if !(self.safety_buffer.is_finite()
            && self.safety_buffer >= 0.0
            && self.safety_buffer < self.max_range)
        {
            return Err(PlanError::InvalidParameters(format!(
                "safety buffer must be in [0, {}), got {}",
                self.max_range, self.safety_buffer
            )));
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Planner<D = Geodesic, R = FullTank> {
    params: PlanningParameters,
    distance: D,
    policy: R,
}

impl Planner {
    pub fn new(params: PlanningParameters) -> Result<Self, PlanError> {
        Planner::with_models(params, Geodesic, FullTank)
    }
}

impl<D: DistanceModel, R: RefuelPolicy> Planner<D, R> {
    pub fn with_models(params: PlanningParameters, distance: D, policy: R) -> Result<Self, PlanError> {
        params.validate()?;

        Ok(Self {
            params,
            distance,
            policy,
        })
    }

    #[tracing::instrument(name = "Planner::plan", skip_all, fields(waypoints = route.len(), stations = stations.len()))]
    pub fn plan(&self, route: &[Waypoint], stations: &[FuelStation]) -> Result<TripPlan, PlanError> {
        validate_route(route)?;

        let max_range = self.params.max_range;
        let final_segment = route.len() - 2;

        let legs: Vec<f64> = route
            .windows(2)
            .map(|segment| self.distance.distance(segment[0], segment[1]))
            .collect();

        let mut to_go: f64 = legs.iter().sum();
        let mut remaining_range = max_range;
        let mut plan = TripPlan::default();

        for (i, (segment, leg)) in route.windows(2).zip(&legs).enumerate() {
            let start = segment[0];
            remaining_range -= leg;
            to_go -= leg;

            // arrived with fuel to spare
            if i == final_segment && remaining_range >= 0.0 {
                break;
            }

            if remaining_range > self.params.safety_buffer {
                continue;
            }

            let station = match self.cheapest_reachable(start, stations) {
                Some(station) => station,
                None if remaining_range >= 0.0 && to_go <= remaining_range => {
                    tracing::warn!(
                        "no station near ({}, {}), continuing on {:.1} miles for the last {:.1}",
                        start.lat,
                        start.lng,
                        remaining_range,
                        to_go
                    );
                    continue;
                }
                None => {
                    return Err(PlanError::RangeExhausted {
                        lat: start.lat,
                        lng: start.lng,
                        max_range,
                    })
                }
            };

            let refill = self.policy.refill(&self.params, remaining_range);
            let cost = refill.gallons * station.retail_price;

            tracing::info!(
                "refuelling at {} for {:.2} ({:.1} miles left)",
                station.name,
                cost,
                remaining_range
            );

            plan.stops.push(FuelStop {
                station: station.clone(),
                trigger: start,
                gallons: refill.gallons,
                cost,
            });
            plan.total_cost += cost;
            remaining_range = refill.range_after;
        }

        Ok(plan)
    }

    /// Cheapest station within one tank of `point`. Equal prices go to the
    /// station listed first.
    pub fn cheapest_reachable<'a>(
        &self,
        point: Coordinates,
        stations: &'a [FuelStation],
    ) -> Option<&'a FuelStation> {
        stations
            .iter()
            .filter(|station| self.is_reachable(point, station))
            .min_by(|a, b| a.retail_price.total_cmp(&b.retail_price))
    }

    pub fn is_reachable(&self, point: Coordinates, station: &FuelStation) -> bool {
        self.distance.distance(point, station.coordinates()) <= self.params.max_range
    }
}

/// Plans with geodesic distances and full-tank refills.
pub fn plan(
    route: &[Waypoint],
    stations: &[FuelStation],
    params: &PlanningParameters,
) -> Result<TripPlan, PlanError> {
    Planner::new(*params)?.plan(route, stations)
}

fn validate_route(route: &[Waypoint]) -> Result<(), PlanError> {
    if route.len() < 2 {
        return Err(PlanError::InvalidRoute(format!(
            "a route needs at least 2 waypoints, got {}",
            route.len()
        )));
    }

    if let Some(point) = route.iter().find(|point| !point.is_valid()) {
        return Err(PlanError::InvalidRoute(format!(
            "waypoint ({}, {}) is out of bounds",
            point.lat, point.lng
        )));
    }

    Ok(())
}
