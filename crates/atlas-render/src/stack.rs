//! In-process layer stack
//!
//! Holds one GeoJSON source and the circle + label layers drawn from it,
//! and answers which markers each layer currently draws.

use crate::camera::{Camera, ViewportConfig};
use crate::style::{self, CIRCLE_LAYER_ID, LABEL_LAYER_ID, LABEL_MIN_ZOOM, SOURCE_ID};
use crate::{Cursor, MapRenderer, Popup};
use atlas_core::{ActiveFilterSet, CountryCollection, CountryFeature, LngLat};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerKind {
    Circle,
    Label,
}

#[derive(Debug, Clone)]
struct Layer {
    id: &'static str,
    kind: LayerKind,
    min_zoom: Option<f64>,
    filter: Option<ActiveFilterSet>,
}

impl Layer {
    fn shows(&self, feature: &CountryFeature, zoom: f64) -> bool {
        if self.min_zoom.is_some_and(|min| zoom < min) {
            return false;
        }
        self.filter.as_ref().map_or(true, |f| f.matches(feature))
    }
}

/// One marker or label as a layer draws it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMarker {
    pub id: String,
    pub position: LngLat,
    pub color: &'static str,
    pub radius: f64,
    /// Text for label layers
    pub label: Option<String>,
}

pub struct LayerStack {
    viewport: ViewportConfig,
    camera: Camera,
    source: Option<CountryCollection>,
    layers: Vec<Layer>,
    popup: Option<Popup>,
    cursor: Cursor,
    source_generation: u64,
}

impl LayerStack {
    pub fn new(viewport: ViewportConfig) -> Self {
        let camera = Camera::new(&viewport);
        Self {
            viewport,
            camera,
            source: None,
            layers: Vec::new(),
            popup: None,
            cursor: Cursor::Default,
            source_generation: 0,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Advance camera animation
    pub fn tick(&mut self, dt: Duration) {
        self.camera.tick(dt);
    }

    /// Jump to the end of any running flight
    pub fn finish_flight(&mut self) {
        self.camera.finish();
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// How many times the source has been (re)created
    pub fn source_generation(&self) -> u64 {
        self.source_generation
    }

    pub fn source(&self) -> Option<&CountryCollection> {
        self.source.as_ref()
    }

    /// Features currently drawn by `layer_id`, in source order
    pub fn rendered(&self, layer_id: &str) -> Vec<RenderedMarker> {
        let layer = self.layers.iter().find(|l| l.id == layer_id);
        let (Some(layer), Some(source)) = (layer, self.source.as_ref()) else {
            return Vec::new();
        };
        let zoom = self.camera.zoom();

        source
            .iter()
            .filter(|f| layer.shows(f, zoom))
            .map(|f| RenderedMarker {
                id: f.id.clone(),
                position: f.position(),
                color: style::marker_color(Some(f.severity)),
                radius: style::circle_radius(f.cases),
                label: (layer.kind == LayerKind::Label).then(|| f.name.clone()),
            })
            .collect()
    }

    pub fn rendered_markers(&self) -> Vec<RenderedMarker> {
        self.rendered(CIRCLE_LAYER_ID)
    }

    pub fn rendered_labels(&self) -> Vec<RenderedMarker> {
        self.rendered(LABEL_LAYER_ID)
    }

    fn ensure_layers(&mut self) {
        if !self.layers.is_empty() {
            return;
        }
        self.layers.push(Layer {
            id: CIRCLE_LAYER_ID,
            kind: LayerKind::Circle,
            min_zoom: None,
            filter: None,
        });
        self.layers.push(Layer {
            id: LABEL_LAYER_ID,
            kind: LayerKind::Label,
            min_zoom: Some(LABEL_MIN_ZOOM),
            filter: None,
        });
    }

    /// Map style document equivalent to the current stack
    pub fn style_document(&self) -> Value {
        let data = self
            .source
            .as_ref()
            .map(|c| serde_json::to_value(c.to_geojson()).unwrap_or(Value::Null))
            .unwrap_or_else(|| json!({"type": "FeatureCollection", "features": []}));

        let layers: Vec<Value> = self
            .layers
            .iter()
            .map(|layer| {
                let filter = layer.filter.as_ref().map(style::filter_expression);
                match layer.kind {
                    LayerKind::Circle => style::circle_layer(filter),
                    LayerKind::Label => style::label_layer(filter),
                }
            })
            .collect();

        let mut sources = serde_json::Map::new();
        sources.insert(SOURCE_ID.to_string(), json!({"type": "geojson", "data": data}));

        json!({
            "version": 8,
            "name": "Outbreak Atlas",
            "basemap": self.viewport.style_url,
            "accessToken": self.viewport.access_token,
            "center": self.viewport.center,
            "zoom": self.viewport.zoom,
            "attributionControl": false,
            "controls": [
                {"type": "navigation", "position": "top-right", "visualizePitch": true},
                {"type": "fullscreen", "position": "top-right"},
                {"type": "scale", "position": "bottom-left", "maxWidth": 120, "unit": "metric"},
                {"type": "attribution", "compact": true}
            ],
            "sources": sources,
            "layers": layers
        })
    }
}

impl MapRenderer for LayerStack {
    fn set_data(&mut self, collection: &CountryCollection) {
        if self.source.take().is_some() {
            debug!("Removing source {}", SOURCE_ID);
        }
        self.source = Some(collection.clone());
        self.source_generation += 1;
        self.ensure_layers();
        debug!(
            "Source {} recreated with {} features",
            SOURCE_ID,
            collection.len()
        );
    }

    fn apply_filter(&mut self, filters: &ActiveFilterSet) {
        for layer in self.layers.iter_mut() {
            layer.filter = Some(filters.clone());
        }
    }

    fn fly_to(&mut self, target: LngLat, zoom: f64) {
        self.camera.fly_to(target, zoom);
    }

    fn show_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn has_layers(&self) -> bool {
        !self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::{CountryInfo, CountryRecord, Severity};
    use proptest::prelude::*;

    fn record(name: &str, cpm: f64, cases: f64) -> CountryRecord {
        CountryRecord {
            country: Some(name.to_string()),
            cases: Some(cases),
            cases_per_one_million: Some(cpm),
            country_info: Some(CountryInfo {
                lat: Some(10.0),
                long: Some(20.0),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// One feature per bucket
    fn sample() -> CountryCollection {
        CountryCollection::from_records(&[
            record("Lowland", 10.0, 100.0),
            record("Midland", 5_000.0, 60_000.0),
            record("Highland", 20_000.0, 300_000.0),
            record("Peakland", 75_000.0, 2_000_000.0),
            record("Summitland", 400_000.0, 30_000_000.0),
        ])
    }

    #[test]
    fn test_nothing_rendered_before_data() {
        let stack = LayerStack::new(ViewportConfig::default());
        assert!(!stack.has_layers());
        assert!(stack.rendered_markers().is_empty());
    }

    #[test]
    fn test_set_data_replaces_source() {
        let mut stack = LayerStack::new(ViewportConfig::default());
        stack.set_data(&sample());
        assert!(stack.has_layers());
        assert_eq!(stack.rendered_markers().len(), 5);

        let smaller = CountryCollection::from_records(&[record("Solo", 1.0, 1.0)]);
        stack.set_data(&smaller);
        assert_eq!(stack.source_generation(), 2);
        let markers = stack.rendered_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "Solo");
    }

    #[test]
    fn test_marker_encoding() {
        let mut stack = LayerStack::new(ViewportConfig::default());
        stack.set_data(&CountryCollection::from_records(&[record("Testland", 75_000.0, 500.0)]));

        let marker = &stack.rendered_markers()[0];
        assert_eq!(marker.color, Severity::VeryHigh.color());
        assert!(marker.radius >= 3.0 && marker.radius < 3.1);
        assert_eq!(marker.position, LngLat::new(20.0, 10.0));
    }

    #[test]
    fn test_labels_need_min_zoom() {
        let mut stack = LayerStack::new(ViewportConfig::default());
        stack.set_data(&sample());
        assert!(stack.rendered_labels().is_empty());

        stack.fly_to(LngLat::new(20.0, 10.0), 4.2);
        stack.tick(Duration::from_secs(10));
        let labels = stack.rendered_labels();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0].label.as_deref(), Some("Lowland"));
    }

    #[test]
    fn test_style_document_carries_filter() {
        let mut stack = LayerStack::new(ViewportConfig::default());
        stack.set_data(&sample());
        stack.apply_filter(&[Severity::Severe].into_iter().collect());

        let doc = stack.style_document();
        assert_eq!(doc["sources"][SOURCE_ID]["data"]["features"].as_array().unwrap().len(), 5);
        let layers = doc["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        for layer in layers {
            assert_eq!(
                layer["filter"],
                json!(["in", ["get", "severity"], ["literal", ["severe"]]])
            );
        }
        assert_eq!(doc["basemap"], "mapbox://styles/mapbox/dark-v11");
    }

    fn bucket_subset() -> impl Strategy<Value = Vec<Severity>> {
        proptest::sample::subsequence(Severity::ALL.to_vec(), 0..=5)
    }

    proptest! {
        #[test]
        fn filter_shows_exactly_active_buckets(subset in bucket_subset()) {
            let collection = sample();
            let mut stack = LayerStack::new(ViewportConfig::default());
            stack.set_data(&collection);
            stack.fly_to(LngLat::new(0.0, 0.0), 5.0);
            stack.tick(Duration::from_secs(10));

            let filters: ActiveFilterSet = subset.iter().copied().collect();
            stack.apply_filter(&filters);

            for rendered in [stack.rendered_markers(), stack.rendered_labels()] {
                prop_assert_eq!(rendered.len(), subset.len());
                for marker in &rendered {
                    let feature = collection.get(&marker.id).unwrap();
                    prop_assert!(filters.contains(feature.severity));
                }
            }
        }
    }
}
