use geo::{GeodesicDistance, Point};

use crate::entities::Coordinates;

pub const METERS_PER_MILE: f64 = 1609.344;

/// Distance between two coordinates, in miles.
pub trait DistanceModel {
    fn distance(&self, a: Coordinates, b: Coordinates) -> f64;
}

/// Shortest path on the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Geodesic;

impl DistanceModel for Geodesic {
    fn distance(&self, a: Coordinates, b: Coordinates) -> f64 {
        let a: Point<f64> = a.into();
        let b: Point<f64> = b.into();

        a.geodesic_distance(&b) / METERS_PER_MILE
    }
}

#[test]
fn one_degree_along_the_equator() {
    let d = Geodesic.distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
    assert!((d - 69.17).abs() < 0.01, "got {}", d);
}

#[test]
fn geodesic_is_symmetric() {
    let a = Coordinates::new(40.7128, -74.0060);
    let b = Coordinates::new(34.0522, -118.2437);

    let there = Geodesic.distance(a, b);
    let back = Geodesic.distance(b, a);

    assert!((there - back).abs() < 1e-6);
    assert!(there > 2400.0 && there < 2500.0, "got {}", there);
    assert_eq!(Geodesic.distance(a, a), 0.0);
}
