//! Geodesic (WGS84 ellipsoid) point projection and distance, in kilometres.

use geo::{Destination, Distance, Geodesic, Point};

const METERS_PER_KM: f64 = 1000.0;

/// The point reached by travelling `distance_km` from `origin` along the
/// geodesic starting at `bearing` degrees clockwise from north.
#[inline]
pub fn destination(origin: Point<f64>, bearing: f64, distance_km: f64) -> Point<f64> {
    Geodesic.destination(origin, bearing, distance_km * METERS_PER_KM)
}

/// Geodesic distance between two lon/lat points.
#[inline]
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Geodesic.distance(a, b) / METERS_PER_KM
}
