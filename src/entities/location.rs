use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees, shaped like the Google Maps `location` object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One coordinate along a planned route.
pub type Waypoint = Coordinates;

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

#[test]
fn coordinate_bounds() {
    assert!(Coordinates::new(90.0, -180.0).is_valid());
    assert!(!Coordinates::new(90.5, 0.0).is_valid());
    assert!(!Coordinates::new(0.0, 180.1).is_valid());
    assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
}

#[test]
fn point_is_lng_lat() {
    let point: Point<f64> = Coordinates::new(10.0, 20.0).into();
    assert_eq!(point.x(), 20.0);
    assert_eq!(point.y(), 10.0);
}
