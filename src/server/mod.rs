mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::routes;

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/route", get(routes::plan))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(Arc::new(api));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RouteAPI, StationAPI};
    use crate::entities::{Coordinates, FuelStation, RoutePlan};
    use crate::planner::PlanError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StubAPI;

    #[async_trait]
    impl RouteAPI for StubAPI {
        async fn plan_route(&self, start: String, end: String) -> Result<RoutePlan, Error> {
            if end == "Atlantis" {
                return Err(PlanError::RangeExhausted {
                    lat: 25.0,
                    lng: -71.0,
                    max_range: 500.0,
                }
                .into());
            }

            Ok(RoutePlan {
                map_url: format!("https://maps.example.com/{}/{}", start, end),
                fuel_stops: vec![FuelStation::new(
                    "B",
                    "1 Main St",
                    Coordinates::new(0.0, 1.01),
                    2.5,
                )],
                total_fuel_cost: 37.5,
            })
        }
    }

    #[async_trait]
    impl StationAPI for StubAPI {
        async fn create_station(&self, _station: FuelStation) -> Result<bool, Error> {
            Ok(true)
        }

        async fn list_stations(&self) -> Result<Vec<FuelStation>, Error> {
            Ok(vec![])
        }
    }

    impl API for StubAPI {}

    async fn request(uri: &str) -> (StatusCode, Value) {
        let response = router(Arc::new(StubAPI))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn route_plan_is_returned() {
        let (status, body) = tokio_test::block_on(request("/route?start=Austin&end=Dallas"));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "map_url": "https://maps.example.com/Austin/Dallas",
                "fuel_stops": [{
                    "name": "B",
                    "address": "1 Main St",
                    "latitude": 0.0,
                    "longitude": 1.01,
                    "retail_price": 2.5
                }],
                "total_fuel_cost": 37.5
            })
        );
    }

    #[test]
    fn start_and_end_are_required() {
        for uri in ["/route", "/route?start=Austin", "/route?start=Austin&end=%20"] {
            let (status, body) = tokio_test::block_on(request(uri));

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Start and end locations are required.");
        }
    }

    #[test]
    fn planning_failures_are_bad_requests() {
        let (status, body) = tokio_test::block_on(request("/route?start=Miami&end=Atlantis"));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 104);
    }
}
