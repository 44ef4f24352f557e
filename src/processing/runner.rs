//! Simulated runner walking a route at a configured pace
//!
//! Produces the stream of raw positions that a [`PositionAnimator`] smooths
//! for display. The runner is a caller-driven stepper: the host advances it
//! by a time delta (typically `update_interval_ms`) from whatever timer it
//! owns. Apart from the route variation drift, drawn from an RNG the caller
//! may seed, the walk is deterministic.
//!
//! [`PositionAnimator`]: crate::processing::animator::PositionAnimator

use crate::algorithms::metrics::{distance_m, interpolate_route};
use crate::api::formatting::format_coordinate;
use crate::core::{Coordinate, DEFAULT_ROUTE_SPACING_KM};
use crate::validation::data::validate_route;
use crate::validation::error::{GeoError, GeoResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segments shorter than this are skipped (meters)
const MIN_SEGMENT_M: f64 = 0.1;

/// Slowest pace the speed oscillation may reach (km/h)
const MIN_SPEED_KMH: f64 = 0.5;

/// Meters per degree of latitude used for the variation offset
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Running time between new variation drift targets (ms)
const VARIATION_RETARGET_MS: u64 = 3000;

/// Weight of the previous offset when blending toward a new drift target
const VARIATION_SMOOTHING: f64 = 0.7;

pub const MAX_SPEED_KMH: f64 = 30.0;
pub const MIN_UPDATE_INTERVAL_MS: u64 = 100;

/// Finest route densification accepted (km)
pub const MIN_ROUTE_SPACING_KM: f64 = 0.001;

/// Pace and repetition settings for a simulated run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base speed (km/h)
    pub speed_kmh: f64,
    /// Peak-to-peak speed oscillation (km/h)
    pub speed_variation_kmh: f64,
    /// Number of laps, 0 runs forever
    pub loop_count: u32,
    /// Suggested interval between `advance` calls (ms)
    pub update_interval_ms: u64,
    /// Maximum spacing of the densified route (km)
    pub route_spacing_km: f64,
    /// Largest sideways drift from the route per axis (m), 0 disables it
    #[serde(default = "default_route_variation_m")]
    pub route_variation_m: f64,
}

fn default_route_variation_m() -> f64 {
    3.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 8.0,
            speed_variation_kmh: 1.0,
            loop_count: 1,
            update_interval_ms: 1000,
            route_spacing_km: DEFAULT_ROUTE_SPACING_KM,
            route_variation_m: default_route_variation_m(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> GeoResult<()> {
        if !(self.speed_kmh > 0.0 && self.speed_kmh <= MAX_SPEED_KMH) {
            return Err(GeoError::invalid_input(
                "speed_kmh",
                format!("{} not in (0, {}] km/h", self.speed_kmh, MAX_SPEED_KMH),
            ));
        }
        if !(self.speed_variation_kmh >= 0.0) {
            return Err(GeoError::invalid_input(
                "speed_variation_kmh",
                format!("{} must be non-negative", self.speed_variation_kmh),
            ));
        }
        if self.update_interval_ms < MIN_UPDATE_INTERVAL_MS {
            return Err(GeoError::invalid_input(
                "update_interval_ms",
                format!("{} below {} ms", self.update_interval_ms, MIN_UPDATE_INTERVAL_MS),
            ));
        }
        if !(self.route_spacing_km >= MIN_ROUTE_SPACING_KM) {
            return Err(GeoError::invalid_input(
                "route_spacing_km",
                format!("{} below {} km", self.route_spacing_km, MIN_ROUTE_SPACING_KM),
            ));
        }
        if !(self.route_variation_m >= 0.0 && self.route_variation_m.is_finite()) {
            return Err(GeoError::invalid_input(
                "route_variation_m",
                format!("{} must be a non-negative distance", self.route_variation_m),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Progress of the current run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub status: RunStatus,
    /// Distance travelled across all laps (m)
    pub total_distance_m: f64,
    pub current_speed_kmh: f64,
    /// Running time, paused time excluded (ms)
    pub elapsed_ms: u64,
    pub current_loop: u32,
    pub loop_count: u32,
    /// Index of the segment start in the densified route
    pub point_index: usize,
    pub total_points: usize,
    /// Latest raw position
    pub position: Option<Coordinate>,
}

pub struct RouteRunner {
    config: RunConfig,
    /// Densified route in raw coordinates
    route: Vec<Coordinate>,
    status: RunStatus,
    point_index: usize,
    /// Fraction of the current segment already covered
    progress: f64,
    current_loop: u32,
    total_distance_m: f64,
    elapsed_ms: u64,
    current_speed_kmh: f64,
    position: Option<Coordinate>,
    completed: bool,
    rng: StdRng,
    /// Current drift from the route as (north, east) meters
    offset_m: (f64, f64),
    last_offset_update_ms: u64,
}

impl RouteRunner {
    pub fn new(config: RunConfig) -> GeoResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Runner whose route variation is reproducible for a given seed
    pub fn with_seed(config: RunConfig, seed: u64) -> GeoResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: RunConfig, rng: StdRng) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            route: Vec::new(),
            status: RunStatus::Idle,
            point_index: 0,
            progress: 0.0,
            current_loop: 0,
            total_distance_m: 0.0,
            elapsed_ms: 0,
            current_speed_kmh: 0.0,
            position: None,
            completed: false,
            rng,
            offset_m: (0.0, 0.0),
            last_offset_update_ms: 0,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Replace the pace settings; takes effect on the next `advance`
    pub fn set_config(&mut self, config: RunConfig) -> GeoResult<()> {
        config.validate()?;
        self.config = config;
        info!(
            "Run config updated: speed={:.1}km/h, variation=±{:.1}km/h, laps={}",
            config.speed_kmh, config.speed_variation_kmh, config.loop_count
        );
        Ok(())
    }

    /// Set the route to run, in raw coordinates
    ///
    /// The route is densified to `route_spacing_km`. Returns the number of
    /// points after densification.
    pub fn set_route(&mut self, points: &[Coordinate]) -> GeoResult<usize> {
        if self.status != RunStatus::Idle {
            return Err(GeoError::invalid_state("change the route", self.status));
        }
        validate_route(points)?;

        self.route = interpolate_route(points, self.config.route_spacing_km);
        debug!(
            "Route set: {} waypoints, {} after interpolation",
            points.len(),
            self.route.len()
        );
        Ok(self.route.len())
    }

    pub fn route(&self) -> &[Coordinate] {
        &self.route
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// True once the final lap has been finished
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn start(&mut self) -> GeoResult<()> {
        if self.route.len() < 2 {
            return Err(GeoError::invalid_input("route", "set a route before starting"));
        }
        if self.status == RunStatus::Running {
            return Err(GeoError::invalid_state("start", self.status));
        }

        self.status = RunStatus::Running;
        self.point_index = 0;
        self.progress = 0.0;
        self.current_loop = 1;
        self.total_distance_m = 0.0;
        self.elapsed_ms = 0;
        self.current_speed_kmh = self.config.speed_kmh;
        self.position = Some(self.route[0]);
        self.completed = false;
        self.offset_m = (0.0, 0.0);
        self.last_offset_update_ms = 0;

        info!(
            "Run started at {:.1}km/h over {} points",
            self.config.speed_kmh,
            self.route.len()
        );
        Ok(())
    }

    pub fn pause(&mut self) -> GeoResult<()> {
        if self.status != RunStatus::Running {
            return Err(GeoError::invalid_state("pause", self.status));
        }
        self.status = RunStatus::Paused;
        info!("Run paused");
        Ok(())
    }

    pub fn resume(&mut self) -> GeoResult<()> {
        if self.status != RunStatus::Paused {
            return Err(GeoError::invalid_state("resume", self.status));
        }
        self.status = RunStatus::Running;
        info!("Run resumed");
        Ok(())
    }

    /// Stop the run; stats stay readable until the next `start`
    pub fn stop(&mut self) {
        self.status = RunStatus::Idle;
        info!("Run stopped after {:.0}m", self.total_distance_m);
    }

    /// Move along the route by `dt_ms` of running time
    ///
    /// Returns the new raw position, or `None` when not running.
    pub fn advance(&mut self, dt_ms: u64) -> Option<Coordinate> {
        if self.status != RunStatus::Running {
            return None;
        }
        let last = self.route.len() - 1;

        if self.point_index >= last {
            // Previous advance finished a lap with more to go
            self.point_index = 0;
            self.progress = 0.0;
            self.current_loop += 1;
            info!("Starting lap {}", self.current_loop);
        }

        self.elapsed_ms += dt_ms;
        self.current_speed_kmh = self.speed_at(self.elapsed_ms);

        let mut remaining_m = self.current_speed_kmh / 3.6 * (dt_ms as f64 / 1000.0);
        while remaining_m > 0.0 && self.point_index < last {
            let segment_m = distance_m(&self.route[self.point_index], &self.route[self.point_index + 1]);
            if segment_m < MIN_SEGMENT_M {
                self.point_index += 1;
                self.progress = 0.0;
                continue;
            }

            let left_m = segment_m * (1.0 - self.progress);
            if remaining_m >= left_m {
                remaining_m -= left_m;
                self.total_distance_m += left_m;
                self.point_index += 1;
                self.progress = 0.0;
            } else {
                self.progress += remaining_m / segment_m;
                self.total_distance_m += remaining_m;
                remaining_m = 0.0;
            }
        }

        let on_route = if self.point_index >= last {
            self.route[last]
        } else {
            let start = self.route[self.point_index];
            let end = self.route[self.point_index + 1];
            Coordinate::new(
                start.latitude + (end.latitude - start.latitude) * self.progress,
                start.longitude + (end.longitude - start.longitude) * self.progress,
            )
        };
        let position = self.apply_variation(on_route);
        self.position = Some(position);

        if self.point_index >= last
            && self.config.loop_count > 0
            && self.current_loop >= self.config.loop_count
        {
            self.status = RunStatus::Idle;
            self.completed = true;
            info!(
                "Run complete: {:.0}m over {} laps, finished at {}",
                self.total_distance_m,
                self.current_loop,
                format_coordinate(&position)
            );
        }

        Some(position)
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            status: self.status,
            total_distance_m: self.total_distance_m,
            current_speed_kmh: self.current_speed_kmh,
            elapsed_ms: self.elapsed_ms,
            current_loop: self.current_loop,
            loop_count: self.config.loop_count,
            point_index: self.point_index,
            total_points: self.route.len(),
            position: self.position,
        }
    }

    /// Current drift from the route as (north, east) meters
    pub fn route_offset_m(&self) -> (f64, f64) {
        self.offset_m
    }

    /// Shift a route point by the slowly drifting variation offset
    ///
    /// Every `VARIATION_RETARGET_MS` of running time a random target within
    /// `route_variation_m` per axis is drawn and blended in, so the offset
    /// never leaves that square.
    fn apply_variation(&mut self, point: Coordinate) -> Coordinate {
        let variation = self.config.route_variation_m;
        if variation <= 0.0 {
            return point;
        }

        if self.elapsed_ms - self.last_offset_update_ms >= VARIATION_RETARGET_MS {
            let target_north = self.rng.gen_range(-variation..=variation);
            let target_east = self.rng.gen_range(-variation..=variation);
            self.offset_m = (
                self.offset_m.0 * VARIATION_SMOOTHING + target_north * (1.0 - VARIATION_SMOOTHING),
                self.offset_m.1 * VARIATION_SMOOTHING + target_east * (1.0 - VARIATION_SMOOTHING),
            );
            self.last_offset_update_ms = self.elapsed_ms;
        }

        let (north_m, east_m) = self.offset_m;
        Coordinate::new(
            point.latitude + north_m / METERS_PER_DEGREE,
            point.longitude + east_m / (METERS_PER_DEGREE * point.latitude.to_radians().cos()),
        )
    }

    /// Smoothly oscillating pace, never below `MIN_SPEED_KMH`
    fn speed_at(&self, elapsed_ms: u64) -> f64 {
        let mut speed = self.config.speed_kmh;
        if self.config.speed_variation_kmh > 0.0 {
            let elapsed_s = elapsed_ms as f64 / 1000.0;
            speed += (elapsed_s * 0.5).sin() * self.config.speed_variation_kmh * 0.5;
        }
        speed.max(MIN_SPEED_KMH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::metrics::total_distance;

    fn steady_config(loop_count: u32) -> RunConfig {
        RunConfig {
            speed_kmh: 8.0,
            speed_variation_kmh: 0.0,
            loop_count,
            route_variation_m: 0.0,
            ..RunConfig::default()
        }
    }

    // ~111 m due north
    fn short_route() -> Vec<Coordinate> {
        vec![Coordinate::new(39.915, 116.404), Coordinate::new(39.916, 116.404)]
    }

    #[test]
    fn test_config_validation() {
        assert!(RunConfig::default().validate().is_ok());

        let too_fast = RunConfig { speed_kmh: 31.0, ..RunConfig::default() };
        assert!(RouteRunner::new(too_fast).is_err());

        let stopped = RunConfig { speed_kmh: 0.0, ..RunConfig::default() };
        assert!(stopped.validate().is_err());

        let hasty = RunConfig { update_interval_ms: 50, ..RunConfig::default() };
        assert!(matches!(hasty.validate(), Err(GeoError::InvalidInput { .. })));

        let wobbly = RunConfig { route_variation_m: -1.0, ..RunConfig::default() };
        assert!(wobbly.validate().is_err());
    }

    #[test]
    fn test_tiny_route_spacing_rejected() {
        let tiny = RunConfig { route_spacing_km: 1e-9, ..RunConfig::default() };
        assert!(matches!(
            tiny.validate(),
            Err(GeoError::InvalidInput { ref field, .. }) if field == "route_spacing_km"
        ));
        assert!(RouteRunner::new(tiny).is_err());

        let nan = RunConfig { route_spacing_km: f64::NAN, ..RunConfig::default() };
        assert!(nan.validate().is_err());

        let finest = RunConfig { route_spacing_km: MIN_ROUTE_SPACING_KM, ..RunConfig::default() };
        assert!(finest.validate().is_ok());
    }

    #[test]
    fn test_set_route_requires_two_points() {
        let mut runner = RouteRunner::new(RunConfig::default()).unwrap();
        assert!(runner.set_route(&short_route()[..1]).is_err());
        assert!(runner.start().is_err());

        let dense = runner.set_route(&short_route()).unwrap();
        assert_eq!(dense, runner.route().len());
        assert!(dense > 2);
    }

    #[test]
    fn test_state_transitions() {
        let mut runner = RouteRunner::new(steady_config(1)).unwrap();
        runner.set_route(&short_route()).unwrap();

        assert!(runner.pause().is_err());
        assert!(runner.resume().is_err());

        runner.start().unwrap();
        assert_eq!(runner.status(), RunStatus::Running);
        assert!(matches!(runner.start(), Err(GeoError::InvalidState { .. })));
        assert!(runner.set_route(&short_route()).is_err());

        runner.pause().unwrap();
        assert_eq!(runner.advance(1000), None);
        runner.resume().unwrap();

        runner.stop();
        assert_eq!(runner.status(), RunStatus::Idle);
        assert_eq!(runner.advance(1000), None);
    }

    #[test]
    fn test_advance_moves_at_configured_speed() {
        let mut runner = RouteRunner::new(steady_config(1)).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();

        let mut previous = runner.stats().position.unwrap();
        for _ in 0..10 {
            let position = runner.advance(1000).unwrap();
            assert!(position.latitude > previous.latitude);
            previous = position;
        }

        let stats = runner.stats();
        // 8 km/h for 10 s
        assert!((stats.total_distance_m - 80.0 / 3.6).abs() < 1e-6);
        assert_eq!(stats.elapsed_ms, 10_000);
        assert_eq!(stats.current_speed_kmh, 8.0);
        let travelled = distance_m(&short_route()[0], &previous);
        assert!((travelled - stats.total_distance_m).abs() < 1e-3);
    }

    #[test]
    fn test_run_completes_after_last_lap() {
        let mut runner = RouteRunner::new(steady_config(1)).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();

        // 60 s at 8 km/h is ~133 m, past the end of the route
        let end = runner.advance(60_000).unwrap();
        assert_eq!(end, short_route()[1]);
        assert!(runner.is_complete());
        assert_eq!(runner.status(), RunStatus::Idle);
        assert_eq!(runner.advance(1000), None);

        let route_m = total_distance(&short_route()) * 1000.0;
        assert!((runner.stats().total_distance_m - route_m).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_laps() {
        let mut runner = RouteRunner::new(steady_config(2)).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();

        runner.advance(60_000).unwrap();
        assert_eq!(runner.status(), RunStatus::Running);
        assert_eq!(runner.stats().current_loop, 1);

        runner.advance(60_000).unwrap();
        assert_eq!(runner.stats().current_loop, 2);
        assert!(runner.is_complete());

        let route_m = total_distance(&short_route()) * 1000.0;
        assert!((runner.stats().total_distance_m - 2.0 * route_m).abs() < 1e-6);
    }

    #[test]
    fn test_endless_run_keeps_looping() {
        let mut runner = RouteRunner::new(steady_config(0)).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();
        for _ in 0..5 {
            assert!(runner.advance(60_000).is_some());
        }
        assert_eq!(runner.status(), RunStatus::Running);
        assert_eq!(runner.stats().current_loop, 5);
        assert!(!runner.is_complete());
    }

    #[test]
    fn test_speed_variation_stays_bounded() {
        let config = RunConfig {
            speed_kmh: 1.0,
            speed_variation_kmh: 4.0,
            loop_count: 0,
            ..RunConfig::default()
        };
        let mut runner = RouteRunner::new(config).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();

        for _ in 0..30 {
            runner.advance(1000);
            let speed = runner.stats().current_speed_kmh;
            assert!(speed >= 0.5 && speed <= 3.0, "speed {} out of range", speed);
        }
    }

    #[test]
    fn test_stats_serialization() {
        let mut runner = RouteRunner::new(steady_config(1)).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();
        runner.advance(1000);

        let json = serde_json::to_value(runner.stats()).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["current_loop"], 1);
        assert!(json["position"]["latitude"].as_f64().unwrap() > 39.915);
    }

    #[test]
    fn test_route_variation_stays_within_bounds() {
        let config = RunConfig {
            speed_variation_kmh: 0.0,
            loop_count: 0,
            route_variation_m: 3.0,
            ..RunConfig::default()
        };
        let mut runner = RouteRunner::with_seed(config, 7).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();

        let mut drifted = false;
        for _ in 0..120 {
            runner.advance(1000).unwrap();
            let (north_m, east_m) = runner.route_offset_m();
            assert!(north_m.abs() <= 3.0 && east_m.abs() <= 3.0);
            drifted |= north_m != 0.0 || east_m != 0.0;

            // The route runs due north, so longitude drift is the whole east offset
            let position = runner.stats().position.unwrap();
            let east_shift_m = (position.longitude - 116.404)
                * METERS_PER_DEGREE
                * position.latitude.to_radians().cos();
            assert!((east_shift_m - east_m).abs() < 1e-4);
        }
        assert!(drifted);
    }

    #[test]
    fn test_route_variation_is_reproducible() {
        let config = RunConfig { loop_count: 0, ..RunConfig::default() };
        let mut a = RouteRunner::with_seed(config, 42).unwrap();
        let mut b = RouteRunner::with_seed(config, 42).unwrap();
        for runner in [&mut a, &mut b] {
            runner.set_route(&short_route()).unwrap();
            runner.start().unwrap();
        }
        for _ in 0..20 {
            assert_eq!(a.advance(1000), b.advance(1000));
        }
    }

    #[test]
    fn test_zero_variation_stays_on_route() {
        let mut runner = RouteRunner::with_seed(steady_config(0), 1).unwrap();
        runner.set_route(&short_route()).unwrap();
        runner.start().unwrap();
        for _ in 0..20 {
            let position = runner.advance(1000).unwrap();
            assert_eq!(position.longitude, 116.404);
        }
        assert_eq!(runner.route_offset_m(), (0.0, 0.0));
    }
}
