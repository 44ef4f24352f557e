//! Input validation for routes and stored names
//!
//! The transformer and metrics accept any `f64`; these checks run at the
//! boundaries where bad input should fail a single call instead.

use crate::core::Coordinate;
use crate::validation::error::{GeoError, GeoResult};

/// Minimum number of points a runnable or storable route must have
pub const MIN_ROUTE_POINTS: usize = 2;

/// Check that a coordinate is finite and inside the valid degree ranges
pub fn validate_coordinate(point: &Coordinate) -> GeoResult<()> {
    if !point.is_finite() {
        return Err(GeoError::invalid_input(
            "coordinate",
            format!("non-finite value ({}, {})", point.latitude, point.longitude),
        ));
    }
    if !(-90.0..=90.0).contains(&point.latitude) {
        return Err(GeoError::invalid_input(
            "latitude",
            format!("{} outside [-90, 90]", point.latitude),
        ));
    }
    if !(-180.0..=180.0).contains(&point.longitude) {
        return Err(GeoError::invalid_input(
            "longitude",
            format!("{} outside [-180, 180]", point.longitude),
        ));
    }
    Ok(())
}

/// Check that a route is long enough to travel and that every point is valid
pub fn validate_route(points: &[Coordinate]) -> GeoResult<()> {
    if points.len() < MIN_ROUTE_POINTS {
        return Err(GeoError::invalid_input(
            "route",
            format!(
                "at least {} points required, got {}",
                MIN_ROUTE_POINTS,
                points.len()
            ),
        ));
    }
    points.iter().try_for_each(validate_coordinate)
}

/// Check a route name used as a storage key
pub fn validate_route_name(name: &str) -> GeoResult<()> {
    if name.trim().is_empty() {
        return Err(GeoError::invalid_input("name", "route name must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinate() {
        assert!(validate_coordinate(&Coordinate::new(31.23, 121.47)).is_ok());
        assert!(validate_coordinate(&Coordinate::new(91.0, 0.0)).is_err());
        assert!(validate_coordinate(&Coordinate::new(0.0, -180.5)).is_err());
        assert!(validate_coordinate(&Coordinate::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_validate_route() {
        let short = vec![Coordinate::new(31.0, 121.0)];
        assert!(matches!(
            validate_route(&short),
            Err(GeoError::InvalidInput { .. })
        ));

        let ok = vec![Coordinate::new(31.0, 121.0), Coordinate::new(31.1, 121.1)];
        assert!(validate_route(&ok).is_ok());

        let bad = vec![Coordinate::new(31.0, 121.0), Coordinate::new(100.0, 121.1)];
        assert!(validate_route(&bad).is_err());
    }

    #[test]
    fn test_validate_route_name() {
        assert!(validate_route_name("morning loop").is_ok());
        assert!(validate_route_name("   ").is_err());
        assert!(validate_route_name("").is_err());
    }
}
