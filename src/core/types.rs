//! Core data types shared across the crate

use crate::validation::error::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic position in decimal degrees
///
/// The reference system is not part of the value; callers track it
/// alongside the coordinate (see [`ReferenceSystem`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Manhattan distance in degrees, used as the animation convergence metric
    pub fn l1_distance(&self, other: &Coordinate) -> f64 {
        (self.latitude - other.latitude).abs() + (self.longitude - other.longitude).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

/// Ordered travel path; insertion order is travel order
pub type Route = Vec<Coordinate>;

/// The three coordinate reference systems handled by the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceSystem {
    /// Unencrypted satellite coordinates (WGS84)
    #[serde(rename = "WGS84")]
    Raw,
    /// State-mandated obfuscated coordinates (GCJ-02)
    #[serde(rename = "GCJ02")]
    Encrypted,
    /// Vendor offset layered on top of the encrypted system (BD-09)
    #[serde(rename = "BD09")]
    Commercial,
}

impl ReferenceSystem {
    pub const ALL: [ReferenceSystem; 3] = [
        ReferenceSystem::Raw,
        ReferenceSystem::Encrypted,
        ReferenceSystem::Commercial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceSystem::Raw => "WGS84",
            ReferenceSystem::Encrypted => "GCJ02",
            ReferenceSystem::Commercial => "BD09",
        }
    }
}

impl fmt::Display for ReferenceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceSystem {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs84" | "raw" | "gps" => Ok(ReferenceSystem::Raw),
            "gcj02" | "encrypted" | "gaode" | "amap" => Ok(ReferenceSystem::Encrypted),
            "bd09" | "commercial" | "baidu" => Ok(ReferenceSystem::Commercial),
            _ => Err(GeoError::UnknownReferenceSystem { name: s.to_string() }),
        }
    }
}
