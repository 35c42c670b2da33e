//! Map Renderer
//!
//! The map itself is drawn by an external mapping engine. This crate fixes
//! the contract with that engine:
//! - [`MapRenderer`]: data replacement, severity filter, fly-to, popup, cursor
//! - [`style`]: circle and label layer configuration
//! - [`LayerStack`]: retained in-process renderer that evaluates the contract
//!   and exports the equivalent style document

use atlas_core::{ActiveFilterSet, CountryCollection, LngLat};
use serde::{Deserialize, Serialize};

pub mod camera;
pub mod stack;
pub mod style;

pub use camera::{Camera, ViewportConfig};
pub use stack::{LayerStack, RenderedMarker};

/// Pointer cursor over the map canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Transient popup anchored at a map position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub anchor: LngLat,
    pub title: String,
    pub flag: Option<String>,
    /// `(label, value)` lines in display order
    pub rows: Vec<(String, String)>,
}

impl Popup {
    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Operations the interaction layer needs from a map engine
pub trait MapRenderer {
    /// Replace the marker source, creating layers on first use
    fn set_data(&mut self, collection: &CountryCollection);

    /// Show only features whose bucket is in `filters`, on every layer
    fn apply_filter(&mut self, filters: &ActiveFilterSet);

    /// Animate the view to `target`
    fn fly_to(&mut self, target: LngLat, zoom: f64);

    fn show_popup(&mut self, popup: Popup);

    fn close_popup(&mut self);

    fn set_cursor(&mut self, cursor: Cursor);

    /// Whether marker layers exist yet
    fn has_layers(&self) -> bool;
}
