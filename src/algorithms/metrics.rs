//! Great-circle route metrics
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. See [Wikipedia](https://en.wikipedia.org/wiki/Haversine_formula).
//!
//! **Distances are returned in kilometers** unless the function name says
//! otherwise.

use crate::core::{Coordinate, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};

/// Summary of a route as shown next to the map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStats {
    /// Total travel distance in meters
    pub distance_m: f64,
    /// Number of waypoints, zero for routes that cannot be travelled
    pub points: usize,
}

/// Great-circle distance between two points in kilometers
///
/// Altitude is not taken into account.
pub fn haversine_km(start: &Coordinate, end: &Coordinate) -> f64 {
    let d_lat = (end.latitude - start.latitude).to_radians();
    let d_lon = (end.longitude - start.longitude).to_radians();
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + (d_lon / 2.0).sin() * (d_lon / 2.0).sin() * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points in meters
pub fn distance_m(start: &Coordinate, end: &Coordinate) -> f64 {
    haversine_km(start, end) * 1000.0
}

/// Sum of consecutive great-circle distances in kilometers
///
/// Zero for empty and single-point routes.
pub fn total_distance(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}

pub fn route_stats(points: &[Coordinate]) -> RouteStats {
    if points.len() < 2 {
        return RouteStats::default();
    }
    RouteStats {
        distance_m: total_distance(points) * 1000.0,
        points: points.len(),
    }
}

/// Densify a route so no two consecutive points are more than `max_spacing_km` apart
///
/// Long segments are split into equal linear steps in degree space; the
/// input waypoints are all kept. Routes with fewer than two points, or a
/// non-positive spacing, are returned unchanged.
pub fn interpolate_route(points: &[Coordinate], max_spacing_km: f64) -> Vec<Coordinate> {
    if points.len() < 2 || max_spacing_km.is_nan() || max_spacing_km <= 0.0 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let distance = haversine_km(&start, &end);

        if distance > max_spacing_km {
            let segments = (distance / max_spacing_km).ceil() as usize;
            for step in 1..segments {
                let ratio = step as f64 / segments as f64;
                result.push(Coordinate::new(
                    start.latitude + (end.latitude - start.latitude) * ratio,
                    start.longitude + (end.longitude - start.longitude) * ratio,
                ));
            }
        }
        result.push(end);
    }

    result
}
