use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, FuelStop, Waypoint},
    error::{invalid_input_error, unexpected_error, upstream_error, Error},
};

const STATIC_MAP_SIZE: &str = "800x600";
const ROUTE_STYLE: &str = "color:0x0000ff|weight:5";

#[derive(Clone)]
pub struct GoogleMaps {
    api_base: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leg {
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Directions {
    pub legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    #[serde(default = "Vec::new")]
    routes: Vec<T>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

impl GoogleMaps {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.maps_api_base.clone(), config.maps_api_key.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("https://{}/maps/api/{}", self.api_base, path)
    }

    /// Driving route from `start` to `end`: the start of every step, then the
    /// end of the last one.
    #[tracing::instrument(skip(self))]
    pub async fn find_route(&self, start: &str, end: &str) -> Result<Vec<Waypoint>, Error> {
        let res = self
            .client
            .get(self.endpoint("directions/json"))
            .query(&[("origin", start)])
            .query(&[("destination", end)])
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<Directions> = res.json().await?;

        waypoints(data)
    }

    /// `None` when Google has no match for the address.
    #[tracing::instrument(skip(self))]
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, Error> {
        let res = self
            .client
            .get(self.endpoint("geocode/json"))
            .query(&[("address", address)])
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<GeocodeResult> = res.json().await?;

        first_location(data)
    }

    pub fn static_map_url(&self, route: &[Waypoint], stops: &[FuelStop]) -> Result<String, Error> {
        let path = route
            .iter()
            .map(|&point| String::from(point))
            .collect::<Vec<_>>()
            .join("|");

        let markers = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| format!("label:{}|{}", i + 1, String::from(stop.station.coordinates())))
            .collect::<Vec<_>>()
            .join("|");

        let url = reqwest::Url::parse_with_params(
            &self.endpoint("staticmap"),
            &[
                ("size", STATIC_MAP_SIZE.to_string()),
                ("path", format!("{}|{}", ROUTE_STYLE, path)),
                ("markers", markers),
                ("key", self.api_key.clone()),
            ],
        )
        .map_err(|_| unexpected_error())?;

        Ok(url.to_string())
    }
}

fn check_status(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

fn waypoints(data: Response<Directions>) -> Result<Vec<Waypoint>, Error> {
    match data.status.as_str() {
        "OK" => {}
        "NOT_FOUND" | "ZERO_RESULTS" => return Err(invalid_input_error()),
        status => {
            tracing::warn!("directions request failed with status {}", status);
            return Err(upstream_error());
        }
    }

    let steps = data
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .map(|leg| leg.steps)
        .unwrap_or_default();

    let last = steps.last().ok_or_else(|| invalid_input_error())?.end_location;

    let mut points: Vec<Waypoint> = steps.iter().map(|step| step.start_location).collect();
    points.push(last);

    Ok(points)
}

fn first_location(data: Response<GeocodeResult>) -> Result<Option<Coordinates>, Error> {
    match data.status.as_str() {
        "OK" => Ok(data
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)),
        "ZERO_RESULTS" => Ok(None),
        status => {
            tracing::warn!("geocode request failed with status {}", status);
            Err(upstream_error())
        }
    }
}

#[test]
fn waypoints_follow_steps() {
    use serde_json::json;

    let data: Response<Directions> = serde_json::from_value(json!({
        "status": "OK",
        "routes": [{
            "legs": [{
                "steps": [
                    { "start_location": { "lat": 1.0, "lng": 2.0 }, "end_location": { "lat": 3.0, "lng": 4.0 } },
                    { "start_location": { "lat": 3.0, "lng": 4.0 }, "end_location": { "lat": 5.0, "lng": 6.0 } }
                ]
            }]
        }]
    }))
    .unwrap();

    let points = waypoints(data).unwrap();

    assert_eq!(
        points,
        vec![
            Coordinates::new(1.0, 2.0),
            Coordinates::new(3.0, 4.0),
            Coordinates::new(5.0, 6.0),
        ]
    );
}

#[test]
fn unroutable_directions_are_invalid_input() {
    use serde_json::json;

    let data: Response<Directions> =
        serde_json::from_value(json!({ "status": "ZERO_RESULTS", "routes": [] })).unwrap();
    assert_eq!(waypoints(data).unwrap_err().code, 101);

    let data: Response<Directions> =
        serde_json::from_value(json!({ "status": "OK", "routes": [{ "legs": [{ "steps": [] }] }] }))
            .unwrap();
    assert_eq!(waypoints(data).unwrap_err().code, 101);

    let data: Response<Directions> =
        serde_json::from_value(json!({ "status": "REQUEST_DENIED" })).unwrap();
    assert_eq!(waypoints(data).unwrap_err().code, 4);
}

#[test]
fn geocode_results() {
    use serde_json::json;

    let data: Response<GeocodeResult> = serde_json::from_value(json!({
        "status": "OK",
        "results": [
            { "geometry": { "location": { "lat": 35.1, "lng": -97.4 } } },
            { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } }
        ]
    }))
    .unwrap();
    assert_eq!(first_location(data).unwrap(), Some(Coordinates::new(35.1, -97.4)));

    let data: Response<GeocodeResult> =
        serde_json::from_value(json!({ "status": "ZERO_RESULTS", "results": [] })).unwrap();
    assert_eq!(first_location(data).unwrap(), None);

    let data: Response<GeocodeResult> =
        serde_json::from_value(json!({ "status": "OVER_QUERY_LIMIT" })).unwrap();
    assert!(first_location(data).is_err());
}

#[test]
fn status_codes() {
    assert!(check_status(200).is_ok());
    assert_eq!(check_status(403).unwrap_err().code, 101);
    assert_eq!(check_status(503).unwrap_err().code, 4);
}

#[test]
fn static_map_marks_stops_in_order() {
    use crate::entities::FuelStation;
    use std::collections::HashMap;

    let maps = GoogleMaps::new("maps.example.com", "secret");
    let route = vec![Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.5)];
    let station = FuelStation::new("B", "1 Main St", Coordinates::new(0.0, 1.01), 2.5);
    let stops = vec![
        FuelStop {
            station: station.clone(),
            trigger: route[0],
            gallons: 15.0,
            cost: 37.5,
        },
        FuelStop {
            station,
            trigger: route[0],
            gallons: 15.0,
            cost: 37.5,
        },
    ];

    let url = reqwest::Url::parse(&maps.static_map_url(&route, &stops).unwrap()).unwrap();
    assert_eq!(url.host_str(), Some("maps.example.com"));
    assert_eq!(url.path(), "/maps/api/staticmap");

    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(query["size"], "800x600");
    assert_eq!(query["path"], "color:0x0000ff|weight:5|0,0|0,1.5");
    assert_eq!(query["markers"], "label:1|0,1.01|label:2|0,1.01");
    assert_eq!(query["key"], "secret");
}
