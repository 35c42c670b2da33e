//! Map features built from country records

use crate::record::CountryRecord;
use crate::severity::{classify, Severity};
use crate::LngLat;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One point marker per country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryFeature {
    /// Location id, or the country name when the feed has none
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub cases: Option<f64>,
    pub active: Option<f64>,
    pub recovered: Option<f64>,
    pub deaths: Option<f64>,
    /// Epoch milliseconds
    pub updated: Option<i64>,
    /// Cases per one million, absent treated as 0
    pub cpm: f64,
    pub severity: Severity,
    pub flag: Option<String>,
}

impl CountryFeature {
    /// Build a feature, or `None` when either coordinate is missing
    pub fn from_record(record: &CountryRecord) -> Option<Self> {
        let (lat, lon) = record.coordinates()?;
        let info = record.country_info.as_ref()?;

        let name = record
            .country
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let id = info
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| name.clone());
        let cpm = record.cases_per_one_million.filter(|v| v.is_finite()).unwrap_or(0.0);

        Some(Self {
            id,
            name,
            lat,
            lon,
            cases: record.cases,
            active: record.active,
            recovered: record.recovered,
            deaths: record.deaths,
            updated: record.updated,
            cpm,
            severity: classify(Some(cpm)),
            flag: info.flag.clone(),
        })
    }

    pub fn position(&self) -> LngLat {
        LngLat::new(self.lon, self.lat)
    }

    /// GeoJSON Point feature with every attribute as a property
    pub fn to_geojson(&self) -> geojson::Feature {
        let properties = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        };

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                self.lon, self.lat,
            ]))),
            id: Some(geojson::feature::Id::String(self.id.clone())),
            properties,
            foreign_members: None,
        }
    }
}

/// Ordered feature collection, rebuilt in full on every load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryCollection {
    pub features: Vec<CountryFeature>,
}

impl CountryCollection {
    /// Transform a record snapshot, dropping records without coordinates
    pub fn from_records(records: &[CountryRecord]) -> Self {
        let features: Vec<CountryFeature> =
            records.iter().filter_map(CountryFeature::from_record).collect();

        let skipped = records.len() - features.len();
        if skipped > 0 {
            debug!("Dropped {} records without coordinates", skipped);
        }
        info!(
            "Built {} features ({} skipped for missing coords)",
            features.len(),
            skipped
        );

        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryFeature> {
        self.features.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CountryFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features.iter().map(CountryFeature::to_geojson).collect(),
            foreign_members: None,
        }
    }
}

/// Most recent `updated` timestamp across a snapshot
pub fn latest_update(records: &[CountryRecord]) -> Option<DateTime<Utc>> {
    let max_ms = records.iter().filter_map(|r| r.updated).max()?;
    if max_ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(max_ms).single()
}
