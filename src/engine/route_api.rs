use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{RouteAPI, StationAPI},
    entities::RoutePlan,
    error::Error,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_route(&self, start: String, end: String) -> Result<RoutePlan, Error> {
        let route = self.maps.find_route(&start, &end).await?;
        let stations = self.list_stations().await?;

        tracing::info!(
            "planning {} waypoints against {} stations",
            route.len(),
            stations.len()
        );

        let plan = self.planner.plan(&route, &stations)?;
        let map_url = self.maps.static_map_url(&route, &plan.stops)?;

        Ok(RoutePlan::new(map_url, &plan))
    }
}
