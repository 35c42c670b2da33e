//! Outbreak Atlas Interaction Layer
//!
//! Wires user gestures to state transitions:
//! - [`AppState`]: raw snapshot, feature collection, active filter set, selected detail
//! - [`UiEvent`]: marker click/hover, filter toggle, search submit, refresh
//! - [`App`]: synchronous dispatch against a [`MapRenderer`](atlas_render::MapRenderer)
//! - [`Session`]: async loop that runs loads and feeds their results back in
//!
//! Overlapping refreshes are resolved by [`LoadTicket`]: only the result of
//! the most recently issued load is applied.

pub mod app;
pub mod config;
pub mod detail;
pub mod event;
pub mod notify;
pub mod session;
pub mod state;

pub use app::{App, LoadOutcome};
pub use config::{AtlasConfig, ConfigError};
pub use detail::{popup_for, DetailPanel};
pub use event::{AppEvent, LoadTicket, UiEvent};
pub use notify::{LogNotifier, Notice, NoticeKind, Notifier};
pub use session::{Session, SessionHandle};
pub use state::{AppState, MarkerSummary, StatusReport};
