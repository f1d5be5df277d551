use async_trait::async_trait;

use crate::entities::{FuelStation, RoutePlan};
use crate::error::Error;

#[async_trait]
pub trait RouteAPI {
    async fn plan_route(&self, start: String, end: String) -> Result<RoutePlan, Error>;
}

#[async_trait]
pub trait StationAPI {
    /// Stores the station unless an identical one exists. Returns whether a row was created.
    async fn create_station(&self, station: FuelStation) -> Result<bool, Error>;
    async fn list_stations(&self) -> Result<Vec<FuelStation>, Error>;
}

pub trait API: RouteAPI + StationAPI {}
