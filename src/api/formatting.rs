//! Human-readable and JSON output for distances, durations and run progress

use crate::algorithms::transform::convert;
use crate::core::{Coordinate, ReferenceSystem};
use crate::processing::runner::RunStats;
use serde::Serialize;

/// Render a distance given in kilometers
///
/// Below 1 km the value is shown as whole meters, otherwise as kilometers
/// with two decimals.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.2} km", km)
    }
}

/// Render elapsed milliseconds as `H:MM:SS` (one hour or more) or `M:SS`
pub fn format_duration(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes % 60, seconds % 60)
    } else {
        format!("{}:{:02}", minutes, seconds % 60)
    }
}

/// Render a coordinate as `lat, lon` with six decimals (~0.1 m)
pub fn format_coordinate(point: &Coordinate) -> String {
    format!("{:.6}, {:.6}", point.latitude, point.longitude)
}

/// Run progress prepared for display in a given reference system
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: String,
    pub distance: String,
    pub elapsed: String,
    pub speed_kmh: f64,
    pub lap: String,
    pub progress: String,
    pub system: ReferenceSystem,
    pub position: Option<Coordinate>,
}

/// Formats [`RunStats`] for status lines and JSON consumers
pub struct RunReportFormatter {
    /// System the runner's raw positions are shown in
    display_system: ReferenceSystem,
}

impl Default for RunReportFormatter {
    fn default() -> Self {
        Self {
            display_system: ReferenceSystem::Encrypted,
        }
    }
}

impl RunReportFormatter {
    pub fn new(display_system: ReferenceSystem) -> Self {
        Self { display_system }
    }

    pub fn report(&self, stats: &RunStats) -> RunReport {
        let lap = if stats.loop_count == 0 {
            format!("{}/∞", stats.current_loop)
        } else {
            format!("{}/{}", stats.current_loop, stats.loop_count)
        };

        RunReport {
            status: stats.status.to_string(),
            distance: format_distance(stats.total_distance_m / 1000.0),
            elapsed: format_duration(stats.elapsed_ms),
            speed_kmh: (stats.current_speed_kmh * 10.0).round() / 10.0,
            lap,
            progress: format!("{}/{}", stats.point_index, stats.total_points),
            system: self.display_system,
            position: stats
                .position
                .map(|p| convert(p, ReferenceSystem::Raw, self.display_system)),
        }
    }

    /// One-line status text
    pub fn format_text(&self, stats: &RunStats) -> String {
        let report = self.report(stats);
        let position = report
            .position
            .as_ref()
            .map(format_coordinate)
            .unwrap_or_else(|| "-".to_string());

        format!(
            "[{}] {} in {} at {:.1} km/h, lap {}, point {} ({} {})",
            report.status,
            report.distance,
            report.elapsed,
            report.speed_kmh,
            report.lap,
            report.progress,
            report.system,
            position
        )
    }

    pub fn format_json(&self, stats: &RunStats) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.report(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::runner::RunStatus;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(1.5), "1.50 km");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.0424), "42 m");
        assert_eq!(format_distance(12.345), "12.35 km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661000), "1:01:01");
        assert_eq!(format_duration(65000), "1:05");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(999), "0:00");
        assert_eq!(format_duration(3600000), "1:00:00");
        assert_eq!(format_duration(36_000_000 + 59_000), "10:00:59");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(&Coordinate::new(39.915, 116.404)), "39.915000, 116.404000");
    }

    fn sample_stats() -> RunStats {
        RunStats {
            status: RunStatus::Running,
            total_distance_m: 1500.0,
            current_speed_kmh: 8.04,
            elapsed_ms: 65000,
            current_loop: 1,
            loop_count: 2,
            point_index: 10,
            total_points: 40,
            position: Some(Coordinate::new(39.915, 116.404)),
        }
    }

    #[test]
    fn test_run_report() {
        let formatter = RunReportFormatter::new(ReferenceSystem::Raw);
        let report = formatter.report(&sample_stats());
        assert_eq!(report.status, "running");
        assert_eq!(report.distance, "1.50 km");
        assert_eq!(report.elapsed, "1:05");
        assert_eq!(report.speed_kmh, 8.0);
        assert_eq!(report.lap, "1/2");
        assert_eq!(report.position, Some(Coordinate::new(39.915, 116.404)));

        let text = formatter.format_text(&sample_stats());
        assert!(text.starts_with("[running] 1.50 km in 1:05"));
        assert!(text.contains("WGS84 39.915000, 116.404000"));
    }

    #[test]
    fn test_run_report_converts_position() {
        let formatter = RunReportFormatter::default();
        let report = formatter.report(&sample_stats());
        assert_eq!(report.system, ReferenceSystem::Encrypted);
        let shown = report.position.unwrap();
        assert!((shown.latitude - 39.91640428150164).abs() < 1e-9);

        let json = formatter.format_json(&sample_stats()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["system"], "GCJ02");
        assert_eq!(value["lap"], "1/2");
        assert!(value["position"]["latitude"].is_number());
    }

    #[test]
    fn test_run_report_without_position() {
        let mut stats = sample_stats();
        stats.position = None;
        stats.loop_count = 0;
        let formatter = RunReportFormatter::default();
        assert_eq!(formatter.report(&stats).lap, "1/∞");
        assert!(formatter.format_text(&stats).ends_with("(GCJ02 -)"));
    }
}
