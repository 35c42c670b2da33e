//! Country records from the disease.sh `/v3/covid-19/countries` feed
//!
//! Every field tolerates absence or `null`. Elements with wrong-typed fields
//! are skipped by the feed parser; records without coordinates are dropped
//! when features are built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location identifier (`countryInfo._id`), numeric in the live feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Nested location block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(rename = "_id", default)]
    pub id: Option<LocationId>,
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
    #[serde(default)]
    pub flag: Option<String>,
}

/// One element of the feed array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub cases: Option<f64>,
    #[serde(default)]
    pub active: Option<f64>,
    #[serde(default)]
    pub recovered: Option<f64>,
    #[serde(default)]
    pub deaths: Option<f64>,
    /// Epoch milliseconds
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub cases_per_one_million: Option<f64>,
    #[serde(default)]
    pub country_info: Option<CountryInfo>,
}

impl CountryRecord {
    /// `(lat, lon)` when both coordinates are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let info = self.country_info.as_ref()?;
        Some((info.lat?, info.long?))
    }
}
