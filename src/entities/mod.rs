mod location;
mod plan;
mod route;
mod station;

pub use location::{Coordinates, Waypoint};
pub use plan::{FuelStop, TripPlan};
pub use route::RoutePlan;
pub use station::FuelStation;
