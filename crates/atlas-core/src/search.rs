//! Country name search

use crate::feature::CountryFeature;

/// Trim and case-fold a search query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Resolve a query to a feature.
///
/// Exact case-insensitive name match wins; otherwise the first feature in
/// collection order whose name contains the query. Empty queries match nothing.
pub fn find_country<'a>(features: &'a [CountryFeature], query: &str) -> Option<&'a CountryFeature> {
    let q = normalize_query(query);
    if q.is_empty() {
        return None;
    }

    features
        .iter()
        .find(|f| f.name.to_lowercase() == q)
        .or_else(|| features.iter().find(|f| f.name.to_lowercase().contains(&q)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    fn feature(name: &str) -> CountryFeature {
        CountryFeature {
            id: name.to_string(),
            name: name.to_string(),
            lat: 0.0,
            lon: 0.0,
            cases: None,
            active: None,
            recovered: None,
            deaths: None,
            updated: None,
            cpm: 0.0,
            severity: Severity::Low,
            flag: None,
        }
    }

    fn sample() -> Vec<CountryFeature> {
        vec![
            feature("Nigeria"),
            feature("Niger"),
            feature("Germany"),
            feature("France"),
        ]
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let features = sample();
        assert_eq!(find_country(&features, "FRANCE").unwrap().name, "France");
        assert_eq!(find_country(&features, "  france ").unwrap().name, "France");
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let features = sample();
        // "Nigeria" comes first and contains "niger"
        assert_eq!(find_country(&features, "niger").unwrap().name, "Niger");
    }

    #[test]
    fn test_substring_fallback_takes_first_in_order() {
        let europe = vec![feature("France"), feature("Germany")];
        assert_eq!(find_country(&europe, "ger").unwrap().name, "Germany");

        let features = sample();
        assert_eq!(find_country(&features, "ger").unwrap().name, "Nigeria");
        assert_eq!(find_country(&features, "germ").unwrap().name, "Germany");
    }

    #[test]
    fn test_no_match() {
        let features = sample();
        assert!(find_country(&features, "zzz_nonexistent").is_none());
        assert!(find_country(&features, "   ").is_none());
        assert!(find_country(&[], "france").is_none());
    }
}
