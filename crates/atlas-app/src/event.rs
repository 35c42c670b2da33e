//! Named UI events and session messages

use crate::state::{MarkerSummary, StatusReport};
use atlas_core::Severity;
use atlas_feed::{FetchError, Snapshot};
use tokio::sync::oneshot;

/// Identity of one issued load; only the newest is ever applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// User gestures
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Marker clicked, by feature id
    MarkerClick { id: String },
    /// Pointer entered (`Some`) or left (`None`) a marker
    MarkerHover { id: Option<String> },
    /// Severity checkbox toggled
    FilterChange { bucket: Severity, checked: bool },
    /// Search button or Enter
    SearchSubmit { query: String },
    /// Refresh button
    RefreshClick,
}

/// Everything the session loop reacts to
#[derive(Debug)]
pub enum AppEvent {
    Ui(UiEvent),
    LoadFinished {
        ticket: LoadTicket,
        result: Result<Snapshot, FetchError>,
    },
    Status(oneshot::Sender<StatusReport>),
    Markers(oneshot::Sender<Vec<MarkerSummary>>),
    Shutdown,
}

impl From<UiEvent> for AppEvent {
    fn from(event: UiEvent) -> Self {
        AppEvent::Ui(event)
    }
}
