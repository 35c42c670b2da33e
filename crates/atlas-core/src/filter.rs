//! Active filter set: which severity buckets are visible

use crate::feature::CountryFeature;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilterSet {
    buckets: BTreeSet<Severity>,
}

impl ActiveFilterSet {
    /// Every bucket visible
    pub fn all() -> Self {
        Self {
            buckets: Severity::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            buckets: BTreeSet::new(),
        }
    }

    /// Apply a checkbox toggle. Returns true when the set changed.
    pub fn set(&mut self, bucket: Severity, checked: bool) -> bool {
        if checked {
            self.buckets.insert(bucket)
        } else {
            self.buckets.remove(&bucket)
        }
    }

    pub fn contains(&self, bucket: Severity) -> bool {
        self.buckets.contains(&bucket)
    }

    pub fn matches(&self, feature: &CountryFeature) -> bool {
        self.contains(feature.severity)
    }

    /// Visible buckets in ascending severity
    pub fn iter(&self) -> impl Iterator<Item = Severity> + '_ {
        self.buckets.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for ActiveFilterSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Severity> for ActiveFilterSet {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}
