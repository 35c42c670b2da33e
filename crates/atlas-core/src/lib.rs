//! Outbreak Atlas Core
//!
//! Domain types shared by the feed, renderer and interaction crates:
//! - Severity buckets derived from cases per one million population
//! - Country records as delivered by the disease.sh feed
//! - Point features and the ordered feature collection drawn on the map
//! - The active filter set and country search
//! - Locale-style number and timestamp formatting for popups and panels
//!
//! # Severity Buckets
//!
//! | Cases / 1M | Bucket | Color |
//! |------------|--------|-------|
//! | < 1,000 | low | `#2DC937` |
//! | < 10,000 | moderate | `#99C140` |
//! | < 50,000 | high | `#E7B416` |
//! | < 100,000 | veryHigh | `#DB7B2B` |
//! | >= 100,000 | severe | `#CC3232` |

use thiserror::Error;

pub mod feature;
pub mod filter;
pub mod format;
pub mod record;
pub mod search;
pub mod severity;

pub use feature::{latest_update, CountryCollection, CountryFeature};
pub use filter::ActiveFilterSet;
pub use record::{CountryInfo, CountryRecord, LocationId};
pub use search::{find_country, normalize_query};
pub use severity::{classify, Severity, FALLBACK_COLOR};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown severity bucket: {0}")]
    UnknownBucket(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Longitude/latitude pair in GeoJSON axis order
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]` as used by GeoJSON and map style documents
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}
