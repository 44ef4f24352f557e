use crate::core::{
    Coordinate, DEFAULT_LERP_FACTOR, DEFAULT_MIN_TICK_INTERVAL_MS, DEFAULT_SETTLE_EPSILON,
};
use crate::validation::error::{GeoError, GeoResult};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Tuning for [`PositionAnimator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// Fraction of the remaining gap closed per effective tick (0, 1]
    pub lerp_factor: f64,
    /// Ticks closer together than this are ignored (milliseconds)
    pub min_tick_interval_ms: u64,
    /// L1 distance in degrees at which the position snaps to the target
    pub settle_epsilon: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            lerp_factor: DEFAULT_LERP_FACTOR,
            min_tick_interval_ms: DEFAULT_MIN_TICK_INTERVAL_MS,
            settle_epsilon: DEFAULT_SETTLE_EPSILON,
        }
    }
}

impl AnimatorConfig {
    /// Reject settings under which the marker could never settle
    pub fn validate(&self) -> GeoResult<()> {
        if !(self.lerp_factor > 0.0 && self.lerp_factor <= 1.0) {
            return Err(GeoError::invalid_input(
                "lerp_factor",
                format!("{} not in (0, 1]", self.lerp_factor),
            ));
        }
        if self.min_tick_interval_ms == 0 {
            return Err(GeoError::invalid_input(
                "min_tick_interval_ms",
                "tick interval must be positive",
            ));
        }
        if !(self.settle_epsilon > 0.0) {
            return Err(GeoError::invalid_input(
                "settle_epsilon",
                format!("{} must be positive", self.settle_epsilon),
            ));
        }
        Ok(())
    }
}

/// Snapshot of the animator's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub target: Option<Coordinate>,
    pub current: Option<Coordinate>,
    pub settled: bool,
}

/// Frame-rate independent smoothing of a marker toward the latest position fix
///
/// Two states: idle (no position yet) and tracking. The first target snaps
/// immediately; later targets are approached by exponential smoothing, one
/// step per effective [`tick`](Self::tick). The animator owns no timer: the
/// caller ticks it from a render loop or a fixed timer and stops once
/// [`needs_tick`](Self::needs_tick) is false.
///
/// Every mutation takes `&mut self`; share across threads behind your own lock.
#[derive(Debug, Clone)]
pub struct PositionAnimator {
    config: AnimatorConfig,
    /// Latest position fix, stored as (latitude, longitude)
    target: Option<Vector2<f64>>,
    /// Position last handed to the renderer
    current: Option<Vector2<f64>>,
    settled: bool,
    /// First fix has been taken but not yet returned by a tick
    first_fix_pending: bool,
    last_tick_ms: Option<u64>,
}

impl Default for PositionAnimator {
    fn default() -> Self {
        Self::from_valid_config(AnimatorConfig::default())
    }
}

impl PositionAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnimatorConfig) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AnimatorConfig) -> Self {
        Self {
            config,
            target: None,
            current: None,
            settled: false,
            first_fix_pending: false,
            last_tick_ms: None,
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Push a new position fix
    ///
    /// When idle, the marker jumps straight to `point` (no animation on the
    /// first fix). When tracking, only the target moves; `current` changes
    /// exclusively through `tick`.
    pub fn set_target(&mut self, point: Coordinate) {
        let target = to_vector(&point);
        self.target = Some(target);

        match self.current {
            None => {
                self.current = Some(target);
                self.settled = true;
                self.first_fix_pending = true;
            }
            Some(current) => {
                self.settled = current == target;
            }
        }
    }

    /// Advance the animation to `now_ms`
    ///
    /// Returns the position to draw, or `None` when nothing changed: idle,
    /// already settled, or called within `min_tick_interval_ms` of the last
    /// effective tick.
    pub fn tick(&mut self, now_ms: u64) -> Option<Coordinate> {
        let (current, target) = match (self.current, self.target) {
            (Some(current), Some(target)) => (current, target),
            _ => return None,
        };

        if self.first_fix_pending {
            self.first_fix_pending = false;
            self.last_tick_ms = Some(now_ms);
            return Some(to_coordinate(&current));
        }

        if self.settled {
            return None;
        }

        if let Some(last) = self.last_tick_ms {
            if now_ms.saturating_sub(last) < self.config.min_tick_interval_ms {
                return None;
            }
        }
        self.last_tick_ms = Some(now_ms);

        let next = current + (target - current) * self.config.lerp_factor;

        if (target - next).lp_norm(1) < self.config.settle_epsilon {
            self.current = Some(target);
            self.settled = true;
            return Some(to_coordinate(&target));
        }

        self.current = Some(next);
        Some(to_coordinate(&next))
    }

    /// Drop both positions and return to idle
    ///
    /// Callers holding a recurring tick request should cancel it; an idle
    /// animator never produces output.
    pub fn reset(&mut self) {
        self.target = None;
        self.current = None;
        self.settled = false;
        self.first_fix_pending = false;
        self.last_tick_ms = None;
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Whether the caller should keep scheduling ticks
    pub fn needs_tick(&self) -> bool {
        !self.is_idle() && (!self.settled || self.first_fix_pending)
    }

    pub fn current(&self) -> Option<Coordinate> {
        self.current.as_ref().map(to_coordinate)
    }

    pub fn target(&self) -> Option<Coordinate> {
        self.target.as_ref().map(to_coordinate)
    }

    pub fn state(&self) -> AnimationState {
        AnimationState {
            target: self.target(),
            current: self.current(),
            settled: self.settled,
        }
    }
}

fn to_vector(point: &Coordinate) -> Vector2<f64> {
    Vector2::new(point.latitude, point.longitude)
}

fn to_coordinate(v: &Vector2<f64>) -> Coordinate {
    Coordinate::new(v.x, v.y)
}
