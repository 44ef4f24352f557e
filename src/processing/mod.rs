//! Position streams: the simulated runner and the display animator

pub mod animator;
pub mod runner;

pub use animator::PositionAnimator;
pub use runner::RouteRunner;
