//! Geodetic constants and animation parameters

use std::f64::consts::PI;

/// Semi-major axis of the Krasovsky 1940 ellipsoid used by the encrypted system (m)
pub const KRASOVSKY_SEMI_MAJOR_AXIS: f64 = 6378245.0;

/// Eccentricity squared of the Krasovsky 1940 ellipsoid
pub const KRASOVSKY_ECCENTRICITY_SQUARED: f64 = 0.00669342162296594323;

/// Angular scale used by the commercial offset correction terms
pub const COMMERCIAL_X_PI: f64 = PI * 3000.0 / 180.0;

/// Fixed latitude offset of the commercial system (degrees)
pub const COMMERCIAL_LAT_OFFSET: f64 = 0.006;

/// Fixed longitude offset of the commercial system (degrees)
pub const COMMERCIAL_LON_OFFSET: f64 = 0.0065;

/// Bounding region inside which the encryption perturbation applies (degrees)
pub const REGION_MIN_LONGITUDE: f64 = 72.004;
pub const REGION_MAX_LONGITUDE: f64 = 137.8347;
pub const REGION_MIN_LATITUDE: f64 = 0.8293;
pub const REGION_MAX_LATITUDE: f64 = 55.8271;

/// Mean Earth radius for great-circle distances (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fraction of the remaining gap closed per animation tick
pub const DEFAULT_LERP_FACTOR: f64 = 0.15;

/// Minimum spacing between effective animation ticks (ms), caps updates near 60 Hz
pub const DEFAULT_MIN_TICK_INTERVAL_MS: u64 = 16;

/// L1 distance (degrees) below which the animated position snaps to its target
pub const DEFAULT_SETTLE_EPSILON: f64 = 1e-7;

/// Spacing used when densifying a route for the simulated runner (km)
pub const DEFAULT_ROUTE_SPACING_KM: f64 = 0.005;
