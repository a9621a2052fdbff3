//! Core trail types for trailfinder.
//!
//! This module defines the catalog records and their elevation samples, in
//! the JSON shape the key-value store holds them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How demanding a trail is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Gentle, family friendly.
    Easy,
    /// Some sustained climbing.
    Moderate,
    /// Long, steep or exposed.
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Moderate, Self::Hard];

    /// The lowercase name used in storage and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "moderate" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            _ => Err(Error::UnknownDifficulty {
                value: s.to_string(),
            }),
        }
    }
}

/// A single elevation sample along a trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationPoint {
    /// Distance along the trail in kilometres.
    pub km: f64,
    /// Elevation in metres.
    pub m: f64,
}

impl ElevationPoint {
    /// Create a sample.
    #[must_use]
    pub const fn new(km: f64, m: f64) -> Self {
        Self { km, m }
    }
}

/// A catalog record describing one hiking route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    /// Stable identifier, never reassigned.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Park, range or region.
    pub location: String,
    /// Total distance in kilometres.
    pub distance_km: f64,
    /// Difficulty grade.
    pub difficulty: Difficulty,
    /// Rating between 0 and 5.
    pub rating: f64,
    /// Cumulative elevation gain in metres.
    pub elevation_gain_m: f64,
    /// Highest point in metres, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_point_m: Option<f64>,
    /// Lowest point in metres, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_point_m: Option<f64>,
    /// Typical duration in hours.
    pub duration_hours: f64,
    /// Free-text description.
    pub description: String,
    /// Short selling points, in display order.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Elevation samples, in no guaranteed order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_profile: Option<Vec<ElevationPoint>>,
}

impl Trail {
    /// Both altitude bounds, when the record carries them.
    #[must_use]
    pub fn altitude_bounds(&self) -> Option<(f64, f64)> {
        Some((self.lowest_point_m?, self.highest_point_m?))
    }

    /// Elevation samples, or an empty slice when the record has none.
    #[must_use]
    pub fn profile(&self) -> &[ElevationPoint] {
        self.elevation_profile.as_deref().unwrap_or_default()
    }

    /// Whether the record has enough samples to chart.
    #[must_use]
    pub fn has_chartable_profile(&self) -> bool {
        self.profile().len() > 1
    }
}
