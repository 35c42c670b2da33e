//! Detail panel and popup content for a selected country

use atlas_core::format::{format_coord, format_count, format_timestamp_ms, PLACEHOLDER};
use atlas_core::CountryFeature;
use atlas_render::Popup;
use serde::Serialize;

/// Side panel fields, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPanel {
    /// Feature id the panel was built from
    pub id: String,
    pub name: String,
    pub lat: String,
    pub lon: String,
    pub cases: String,
    pub cpm: String,
    pub active: String,
    pub recovered: String,
    pub deaths: String,
    pub updated: String,
}

impl DetailPanel {
    pub fn from_feature(feature: &CountryFeature) -> Self {
        let name = if feature.name.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            feature.name.clone()
        };

        Self {
            id: feature.id.clone(),
            name,
            lat: format_coord(Some(feature.lat), 4),
            lon: format_coord(Some(feature.lon), 4),
            cases: format_count(feature.cases),
            cpm: format_count(Some(feature.cpm)),
            active: format_count(feature.active),
            recovered: format_count(feature.recovered),
            deaths: format_count(feature.deaths),
            updated: format_timestamp_ms(feature.updated),
        }
    }
}

pub fn popup_for(feature: &CountryFeature) -> Popup {
    let rows = vec![
        ("Total cases", format_count(feature.cases)),
        ("Cases / 1M", format_count(Some(feature.cpm))),
        ("Active", format_count(feature.active)),
        ("Recovered", format_count(feature.recovered)),
        ("Deaths", format_count(feature.deaths)),
        (
            "Lat, Lon",
            format!(
                "{}, {}",
                format_coord(Some(feature.lat), 2),
                format_coord(Some(feature.lon), 2)
            ),
        ),
        ("Severity", feature.severity.to_string()),
    ];

    Popup {
        anchor: feature.position(),
        title: feature.name.clone(),
        flag: feature.flag.clone(),
        rows: rows
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect(),
    }
}
