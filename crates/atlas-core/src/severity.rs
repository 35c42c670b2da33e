//! Severity classification by cases per one million population

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bounds (exclusive) of the first four buckets
pub const LOW_MAX: f64 = 1_000.0;
pub const MODERATE_MAX: f64 = 10_000.0;
pub const HIGH_MAX: f64 = 50_000.0;
pub const VERY_HIGH_MAX: f64 = 100_000.0;

/// Marker color for features whose bucket is unknown
pub const FALLBACK_COLOR: &str = "#888";

/// Severity bucket, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    VeryHigh,
    Severe,
}

impl Severity {
    /// All buckets in ascending order
    pub const ALL: [Severity; 5] = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::VeryHigh,
        Severity::Severe,
    ];

    /// Wire name used in feature properties and layer filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "veryHigh",
            Self::Severe => "severe",
        }
    }

    /// Parse a wire name ignoring ASCII case, for typed input
    pub fn parse_ignore_case(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownBucket(name.to_string()))
    }

    /// Fixed display color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#2DC937",
            Self::Moderate => "#99C140",
            Self::High => "#E7B416",
            Self::VeryHigh => "#DB7B2B",
            Self::Severe => "#CC3232",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| CoreError::UnknownBucket(s.to_string()))
    }
}

/// Classify a cases-per-million figure.
///
/// Absent and non-finite values count as 0.
pub fn classify(cases_per_million: Option<f64>) -> Severity {
    let cpm = match cases_per_million {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };

    if cpm < LOW_MAX {
        Severity::Low
    } else if cpm < MODERATE_MAX {
        Severity::Moderate
    } else if cpm < HIGH_MAX {
        Severity::High
    } else if cpm < VERY_HIGH_MAX {
        Severity::VeryHigh
    } else {
        Severity::Severe
    }
}
