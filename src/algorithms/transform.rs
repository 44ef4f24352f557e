//! Conversions between the raw, encrypted and commercial reference systems
//!
//! All functions here are pure and deterministic:
//! - `to_encrypted` applies the published GCJ-02 perturbation inside the
//!   applicable region and is the identity outside it
//! - `to_raw` is a single-pass *approximate* inverse of `to_encrypted`
//! - `to_commercial` / `from_commercial` apply the BD-09 polar offset
//! - `convert` routes any pair of systems through the encrypted system
//!
//! # Asymmetry
//!
//! `to_raw(to_encrypted(p))` is **not** `p`. The perturbation is evaluated
//! at the encrypted point and reflected, which leaves a residual of roughly
//! 1e-6 to 1e-4 degrees depending on location (largest near the coast where
//! the perturbation gradient is steep). This matches what every map client
//! using these systems does and must not be "fixed" in `to_raw`. Callers
//! that need a tighter inverse use [`to_raw_refined`].
//!
//! Points just inside the region edge can be pushed outside it by
//! `to_encrypted`; `to_raw` then returns them unchanged and the whole
//! forward offset (up to ~0.01 degrees) remains. The region box is inclusive.
//!
//! NaN and out-of-range inputs are propagated, never rejected.

use crate::core::{
    Coordinate, ReferenceSystem, COMMERCIAL_LAT_OFFSET, COMMERCIAL_LON_OFFSET, COMMERCIAL_X_PI,
    KRASOVSKY_ECCENTRICITY_SQUARED, KRASOVSKY_SEMI_MAJOR_AXIS, REGION_MAX_LATITUDE,
    REGION_MAX_LONGITUDE, REGION_MIN_LATITUDE, REGION_MIN_LONGITUDE,
};
use std::f64::consts::PI;

/// Fixed-point passes used by [`to_raw_refined`] by default
pub const DEFAULT_REFINEMENT_ITERATIONS: u32 = 3;

/// True when the point lies outside the region where encryption applies
pub fn is_out_of_region(point: &Coordinate) -> bool {
    point.longitude < REGION_MIN_LONGITUDE
        || point.longitude > REGION_MAX_LONGITUDE
        || point.latitude < REGION_MIN_LATITUDE
        || point.latitude > REGION_MAX_LATITUDE
}

/// Raw (WGS84) -> encrypted (GCJ-02)
pub fn to_encrypted(raw: Coordinate) -> Coordinate {
    if is_out_of_region(&raw) {
        return raw;
    }
    let (d_lat, d_lon) = perturbation(&raw);
    Coordinate::new(raw.latitude + d_lat, raw.longitude + d_lon)
}

/// Encrypted (GCJ-02) -> raw (WGS84), single-pass approximation
///
/// Evaluates the forward perturbation as though `encrypted` were raw and
/// reflects it: `2p - (p + delta(p))`. See the module docs for the error.
pub fn to_raw(encrypted: Coordinate) -> Coordinate {
    if is_out_of_region(&encrypted) {
        return encrypted;
    }
    let (d_lat, d_lon) = perturbation(&encrypted);
    let shifted_lat = encrypted.latitude + d_lat;
    let shifted_lon = encrypted.longitude + d_lon;
    Coordinate::new(
        encrypted.latitude * 2.0 - shifted_lat,
        encrypted.longitude * 2.0 - shifted_lon,
    )
}

/// Encrypted -> raw with additional fixed-point refinement passes
///
/// Starts from [`to_raw`] and repeatedly corrects by the forward residual
/// `to_encrypted(guess) - encrypted`. One pass equals `to_raw`; three passes
/// bring the residual below 1e-8 degrees across the region.
pub fn to_raw_refined(encrypted: Coordinate, iterations: u32) -> Coordinate {
    if is_out_of_region(&encrypted) {
        return encrypted;
    }
    let mut guess = to_raw(encrypted);
    for _ in 1..iterations {
        let forward = to_encrypted(guess);
        guess = Coordinate::new(
            guess.latitude - (forward.latitude - encrypted.latitude),
            guess.longitude - (forward.longitude - encrypted.longitude),
        );
    }
    guess
}

/// Encrypted (GCJ-02) -> commercial (BD-09)
pub fn to_commercial(encrypted: Coordinate) -> Coordinate {
    let x = encrypted.longitude;
    let y = encrypted.latitude;
    let z = (x * x + y * y).sqrt() + 0.00002 * (y * COMMERCIAL_X_PI).sin();
    let theta = y.atan2(x) + 0.000003 * (x * COMMERCIAL_X_PI).cos();
    Coordinate::new(
        z * theta.sin() + COMMERCIAL_LAT_OFFSET,
        z * theta.cos() + COMMERCIAL_LON_OFFSET,
    )
}

/// Commercial (BD-09) -> encrypted (GCJ-02)
pub fn from_commercial(commercial: Coordinate) -> Coordinate {
    let x = commercial.longitude - COMMERCIAL_LON_OFFSET;
    let y = commercial.latitude - COMMERCIAL_LAT_OFFSET;
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * COMMERCIAL_X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * COMMERCIAL_X_PI).cos();
    Coordinate::new(z * theta.sin(), z * theta.cos())
}

/// Convert a point between any two systems, pivoting through the encrypted system
pub fn convert(point: Coordinate, from: ReferenceSystem, to: ReferenceSystem) -> Coordinate {
    if from == to {
        return point;
    }

    let encrypted = match from {
        ReferenceSystem::Raw => to_encrypted(point),
        ReferenceSystem::Encrypted => point,
        ReferenceSystem::Commercial => from_commercial(point),
    };

    match to {
        ReferenceSystem::Raw => to_raw(encrypted),
        ReferenceSystem::Encrypted => encrypted,
        ReferenceSystem::Commercial => to_commercial(encrypted),
    }
}

/// Element-wise [`convert`]; output has the same length and order as the input
pub fn convert_all(
    points: &[Coordinate],
    from: ReferenceSystem,
    to: ReferenceSystem,
) -> Vec<Coordinate> {
    points.iter().map(|&p| convert(p, from, to)).collect()
}

/// Convert a batch from any system to raw coordinates
pub fn to_raw_from(points: &[Coordinate], from: ReferenceSystem) -> Vec<Coordinate> {
    convert_all(points, from, ReferenceSystem::Raw)
}

/// Forward GCJ-02 offset (degrees) for a point treated as raw
fn perturbation(point: &Coordinate) -> (f64, f64) {
    let a = KRASOVSKY_SEMI_MAJOR_AXIS;
    let ee = KRASOVSKY_ECCENTRICITY_SQUARED;

    let x = point.longitude - 105.0;
    let y = point.latitude - 35.0;
    let d_lat = transform_lat(x, y);
    let d_lon = transform_lon(x, y);

    let rad_lat = point.latitude / 180.0 * PI;
    let magic = 1.0 - ee * rad_lat.sin() * rad_lat.sin();
    let sqrt_magic = magic.sqrt();

    let d_lat = (d_lat * 180.0) / ((a * (1.0 - ee)) / (magic * sqrt_magic) * PI);
    let d_lon = (d_lon * 180.0) / (a / sqrt_magic * rad_lat.cos() * PI);
    (d_lat, d_lon)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lon(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}
