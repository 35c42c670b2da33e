//! Event dispatch
//!
//! | Event | Transition |
//! |-------|------------|
//! | `MarkerClick` | popup + detail panel for a visible feature, else close the popup |
//! | `MarkerHover` | cursor only, pointer over visible features |
//! | `FilterChange` | add/remove bucket, re-apply filter to both layers |
//! | `SearchSubmit` | fly-to + popup + detail, or one `SearchNotFound` notice |
//! | `RefreshClick` | issue a new load ticket |
//! | load finished | newest ticket: new snapshot, filter, last-updated text; or one `LoadFailure` |

use crate::detail::{popup_for, DetailPanel};
use crate::event::{LoadTicket, UiEvent};
use crate::notify::{Notice, Notifier};
use crate::state::AppState;
use atlas_core::{find_country, CountryFeature, Severity};
use atlas_feed::{FetchError, Snapshot};
use atlas_render::{Cursor, MapRenderer};
use tracing::{debug, error, info, warn};

/// What happened to a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued; the result was dropped
    Stale,
}

pub struct App<R: MapRenderer, N: Notifier> {
    state: AppState,
    renderer: R,
    notifier: N,
    search_zoom: f64,
}

impl<R: MapRenderer, N: Notifier> App<R, N> {
    pub fn new(renderer: R, notifier: N, search_zoom: f64) -> Self {
        Self {
            state: AppState::new(),
            renderer,
            notifier,
            search_zoom,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Dispatch one UI event. Returns a ticket when a load must be started.
    pub fn handle(&mut self, event: UiEvent) -> Option<LoadTicket> {
        match event {
            UiEvent::MarkerClick { id } => {
                self.marker_click(&id);
                None
            }
            UiEvent::MarkerHover { id } => {
                self.marker_hover(id.as_deref());
                None
            }
            UiEvent::FilterChange { bucket, checked } => {
                self.filter_change(bucket, checked);
                None
            }
            UiEvent::SearchSubmit { query } => {
                self.search(&query);
                None
            }
            UiEvent::RefreshClick => {
                info!("Refresh requested");
                Some(self.begin_load())
            }
        }
    }

    /// Issue a ticket for a new load (initial or refresh)
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = self.state.issue_ticket();
        debug!("Issued load {:?}", ticket);
        ticket
    }

    /// Apply or drop the result of a load
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Snapshot, FetchError>,
    ) -> LoadOutcome {
        if !self.state.is_current(ticket) {
            debug!("Dropping result of superseded load {:?}", ticket);
            return LoadOutcome::Stale;
        }
        self.state.settle(ticket);

        match result {
            Ok(snapshot) => {
                self.state.replace_snapshot(snapshot);
                self.renderer.set_data(&self.state.collection);
                self.renderer.apply_filter(&self.state.filters);
                if let Some(label) = &self.state.last_updated {
                    self.notifier.show_last_updated(label);
                }
                info!(
                    "Applied load {:?}: {} features, {} visible",
                    ticket,
                    self.state.collection.len(),
                    self.state.visible_count()
                );
                LoadOutcome::Applied
            }
            Err(e) => {
                error!("Load {:?} failed: {}", ticket, e);
                self.notifier.notify(Notice::load_failure(!self.state.loaded));
                LoadOutcome::Failed
            }
        }
    }

    /// A feature that is currently drawn, i.e. loaded and not filtered out
    fn visible(&self, id: &str) -> Option<&CountryFeature> {
        self.state
            .collection
            .get(id)
            .filter(|f| self.state.filters.matches(f))
    }

    fn marker_click(&mut self, id: &str) {
        let Some(feature) = self.visible(id).cloned() else {
            // Clicking where no marker is drawn dismisses the popup
            debug!("Click on no visible marker ({})", id);
            self.renderer.close_popup();
            return;
        };
        self.select(&feature);
    }

    fn marker_hover(&mut self, id: Option<&str>) {
        if !self.renderer.has_layers() {
            return;
        }
        let cursor = match id {
            Some(id) if self.visible(id).is_some() => Cursor::Pointer,
            _ => Cursor::Default,
        };
        self.renderer.set_cursor(cursor);
    }

    fn filter_change(&mut self, bucket: Severity, checked: bool) {
        if self.state.filters.set(bucket, checked) {
            debug!(
                "Filter {} {}",
                bucket,
                if checked { "on" } else { "off" }
            );
        }
        self.renderer.apply_filter(&self.state.filters);
    }

    fn search(&mut self, query: &str) {
        if atlas_core::normalize_query(query).is_empty() {
            return;
        }

        match find_country(&self.state.collection.features, query).cloned() {
            Some(feature) => {
                info!("Search {:?} resolved to {}", query, feature.name);
                self.renderer.fly_to(feature.position(), self.search_zoom);
                self.select(&feature);
            }
            None => {
                warn!("Search {:?} matched no country", query);
                self.notifier.notify(Notice::search_not_found());
            }
        }
    }

    fn select(&mut self, feature: &CountryFeature) {
        self.renderer.show_popup(popup_for(feature));
        let detail = DetailPanel::from_feature(feature);
        self.notifier.show_detail(&detail);
        self.state.detail = Some(detail);
    }
}
