//! Country Feed Loader
//!
//! Fetches the latest per-country snapshot and turns it into the feature
//! collection drawn on the map.
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = DiseaseShClient::new(FeedConfig::default())?;
//! let snapshot = atlas_feed::load(&client).await?;
//! println!("{} markers", snapshot.collection.len());
//! ```
//!
//! A load is all-or-nothing: it either returns a complete [`Snapshot`] or a
//! [`FetchError`], and never touches state the caller already holds.

use atlas_core::{format, latest_update, CountryCollection, CountryRecord};
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;
use tracing::info;

pub mod client;

pub use client::{parse_records, DiseaseShClient, FeedConfig, DEFAULT_ENDPOINT};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Feed returned status: {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Anything that can deliver the raw country records
pub trait CountrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<CountryRecord>>> + Send;
}

/// One successful load: raw records plus everything derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<CountryRecord>,
    pub collection: CountryCollection,
    pub latest: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        let collection = CountryCollection::from_records(&records);
        let latest = latest_update(&records);
        Self {
            records,
            collection,
            latest,
        }
    }

    /// `Last data update: ...` text, absent when no record carries a timestamp
    pub fn last_updated_label(&self) -> Option<String> {
        format::last_updated_label(self.latest)
    }
}

/// Fetch from `source` and build a fresh snapshot
pub async fn load<S: CountrySource>(source: &S) -> Result<Snapshot> {
    let records = source.fetch().await?;
    let snapshot = Snapshot::from_records(records);

    info!(
        "Loaded {} features from {} records",
        snapshot.collection.len(),
        snapshot.records.len()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::Severity;

    const FIXTURE: &str = r#"[
        {"country": "Testland", "cases": 500, "casesPerOneMillion": 75000, "updated": 1700000000000,
         "countryInfo": {"lat": 10, "long": 20}},
        {"country": "France", "cases": 40138560, "casesPerOneMillion": 612013, "updated": 1700000500000,
         "countryInfo": {"_id": 250, "lat": 46, "long": 2, "flag": "https://disease.sh/assets/img/flags/fr.png"}},
        {"country": "MS Zaandam", "cases": 9, "updated": 1700000900000,
         "countryInfo": {"_id": null, "lat": null, "long": null}},
        {"country": "Germany", "cases": 38437756, "casesPerOneMillion": 458212,
         "countryInfo": {"_id": 276, "lat": 51, "long": 9}}
    ]"#;

    struct StubSource(std::result::Result<&'static str, FetchError>);

    impl CountrySource for StubSource {
        fn fetch(&self) -> impl Future<Output = Result<Vec<CountryRecord>>> + Send {
            let outcome = self.0.clone();
            async move { parse_records(outcome?.as_bytes()) }
        }
    }

    #[tokio::test]
    async fn test_load_keeps_records_with_coordinates() {
        let snapshot = load(&StubSource(Ok(FIXTURE))).await.unwrap();

        assert_eq!(snapshot.records.len(), 4);
        assert_eq!(snapshot.collection.len(), 3);
        for feature in snapshot.collection.iter() {
            let record = snapshot
                .records
                .iter()
                .find(|r| r.country.as_deref() == Some(feature.name.as_str()))
                .unwrap();
            assert_eq!(
                feature.severity,
                atlas_core::classify(Some(record.cases_per_one_million.unwrap_or(0.0)))
            );
        }
    }

    #[tokio::test]
    async fn test_single_record_scenario() {
        let json = r#"[{"country":"Testland","casesPerOneMillion":75000,"cases":500,"countryInfo":{"lat":10,"long":20}}]"#;
        let snapshot = load(&StubSource(Ok(json))).await.unwrap();

        assert_eq!(snapshot.collection.len(), 1);
        let feature = &snapshot.collection.features[0];
        // 75,000 per million sits in [50,000, 100,000)
        assert_eq!(feature.severity, Severity::VeryHigh);
        assert_eq!(feature.cases, Some(500.0));
        assert!(snapshot.last_updated_label().is_none());
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let source = StubSource(Ok(FIXTURE));
        let first = load(&source).await.unwrap();
        let second = load(&source).await.unwrap();
        assert_eq!(first.collection, second.collection);
    }

    #[tokio::test]
    async fn test_last_updated_uses_all_records() {
        let snapshot = load(&StubSource(Ok(FIXTURE))).await.unwrap();
        // MS Zaandam has no coordinates but the newest timestamp
        assert_eq!(snapshot.latest.unwrap().timestamp_millis(), 1_700_000_900_000);
        assert!(snapshot
            .last_updated_label()
            .unwrap()
            .starts_with("Last data update: "));
    }

    #[tokio::test]
    async fn test_load_propagates_fetch_errors() {
        let err = load(&StubSource(Err(FetchError::Status(503))))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Status(503));

        let err = load(&StubSource(Ok(r#"{"message": "oops"}"#)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
