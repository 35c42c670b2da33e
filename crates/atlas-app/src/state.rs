//! Explicit application state
//!
//! Constructed once at startup and mutated only by [`App`](crate::App).

use crate::detail::DetailPanel;
use crate::event::LoadTicket;
use atlas_core::{ActiveFilterSet, CountryCollection, CountryRecord, Severity};
use atlas_feed::Snapshot;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Authoritative raw snapshot from the last applied load
    pub records: Vec<CountryRecord>,
    pub collection: CountryCollection,
    /// Survives refreshes
    pub filters: ActiveFilterSet,
    pub detail: Option<DetailPanel>,
    pub last_updated: Option<String>,
    /// Set once the first load has been applied and layers exist
    pub loaded: bool,
    last_issued: u64,
    last_settled: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next load ticket; it supersedes every earlier one
    pub fn issue_ticket(&mut self) -> LoadTicket {
        self.last_issued += 1;
        LoadTicket(self.last_issued)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.last_issued
    }

    /// Mark the current load as finished, applied or failed
    pub fn settle(&mut self, ticket: LoadTicket) {
        if self.is_current(ticket) {
            self.last_settled = ticket.0;
        }
    }

    /// Whether the newest load is still in flight
    pub fn is_loading(&self) -> bool {
        self.last_settled != self.last_issued
    }

    /// Replace the snapshot wholesale
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.last_updated = snapshot.last_updated_label();
        self.records = snapshot.records;
        self.collection = snapshot.collection;
        self.loaded = true;
    }

    pub fn visible_count(&self) -> usize {
        self.collection.iter().filter(|f| self.filters.matches(f)).count()
    }

    /// Features the marker layer currently draws
    pub fn visible_markers(&self) -> Vec<MarkerSummary> {
        self.collection
            .iter()
            .filter(|f| self.filters.matches(f))
            .map(|f| MarkerSummary {
                id: f.id.clone(),
                name: f.name.clone(),
                severity: f.severity,
            })
            .collect()
    }

    pub fn report(&self) -> StatusReport {
        StatusReport {
            loaded: self.loaded,
            loading: self.is_loading(),
            records: self.records.len(),
            features: self.collection.len(),
            visible: self.visible_count(),
            filters: self.filters.iter().collect(),
            last_updated: self.last_updated.clone(),
            detail: self.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSummary {
    pub id: String,
    pub name: String,
    pub severity: Severity,
}

/// Read-only summary for front-ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub loaded: bool,
    pub loading: bool,
    pub records: usize,
    pub features: usize,
    pub visible: usize,
    pub filters: Vec<Severity>,
    pub last_updated: Option<String>,
    pub detail: Option<DetailPanel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_newest_ticket_is_current() {
        let mut state = AppState::new();
        let first = state.issue_ticket();
        assert!(state.is_current(first));

        let second = state.issue_ticket();
        assert!(second > first);
        assert!(!state.is_current(first));
        assert!(state.is_current(second));

        state.settle(first);
        assert!(state.is_loading());
        state.settle(second);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_new_state_shows_all_buckets() {
        let state = AppState::new();
        assert!(!state.loaded);
        assert_eq!(state.report().filters, Severity::ALL.to_vec());
    }
}
