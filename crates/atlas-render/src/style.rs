//! Marker and label layer style
//!
//! Values mirror Mapbox GL style-spec expressions so the same configuration
//! drives both the in-process [`LayerStack`](crate::LayerStack) and an
//! exported style document.

use atlas_core::{ActiveFilterSet, Severity, FALLBACK_COLOR};
use serde_json::{json, Value};

pub const SOURCE_ID: &str = "countries";
pub const CIRCLE_LAYER_ID: &str = "country-circles";
pub const LABEL_LAYER_ID: &str = "country-labels";

/// `(total cases, radius px)` breakpoints, linear between stops, clamped outside
pub const RADIUS_STOPS: [(f64, f64); 6] = [
    (0.0, 3.0),
    (50_000.0, 8.0),
    (200_000.0, 12.0),
    (1_000_000.0, 18.0),
    (5_000_000.0, 24.0),
    (20_000_000.0, 28.0),
];

pub const CIRCLE_OPACITY: f64 = 0.8;
pub const CIRCLE_STROKE_COLOR: &str = "#0b1220";
pub const CIRCLE_STROKE_WIDTH: f64 = 1.2;

/// Labels appear from this zoom level up
pub const LABEL_MIN_ZOOM: f64 = 3.0;
pub const LABEL_TEXT_SIZE: f64 = 10.0;
pub const LABEL_TEXT_OFFSET: [f64; 2] = [0.0, 1.1];
pub const LABEL_TEXT_COLOR: &str = "#d1d5db";
pub const LABEL_HALO_COLOR: &str = "#0b1220";
pub const LABEL_HALO_WIDTH: f64 = 1.0;

/// Circle fill for a bucket
pub fn marker_color(severity: Option<Severity>) -> &'static str {
    severity.map(|s| s.color()).unwrap_or(FALLBACK_COLOR)
}

/// Circle radius for a total case count; absent counts take the smallest radius
pub fn circle_radius(cases: Option<f64>) -> f64 {
    let cases = cases.filter(|c| c.is_finite()).unwrap_or(0.0);

    let (first_in, first_out) = RADIUS_STOPS[0];
    if cases <= first_in {
        return first_out;
    }

    for pair in RADIUS_STOPS.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if cases <= x1 {
            let t = (cases - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }

    RADIUS_STOPS[RADIUS_STOPS.len() - 1].1
}

/// `["in", ["get", "severity"], ["literal", [...]]]`
pub fn filter_expression(filters: &ActiveFilterSet) -> Value {
    let buckets: Vec<&str> = filters.iter().map(|b| b.as_str()).collect();
    json!(["in", ["get", "severity"], ["literal", buckets]])
}

/// `circle-color` match expression
pub fn color_expression() -> Value {
    let mut expr = vec![json!("match"), json!(["get", "severity"])];
    for bucket in Severity::ALL {
        expr.push(json!(bucket.as_str()));
        expr.push(json!(bucket.color()));
    }
    expr.push(json!(FALLBACK_COLOR));
    Value::Array(expr)
}

/// `circle-radius` interpolate expression
pub fn radius_expression() -> Value {
    let mut expr = vec![json!("interpolate"), json!(["linear"]), json!(["get", "cases"])];
    for (cases, radius) in RADIUS_STOPS {
        expr.push(json!(cases));
        expr.push(json!(radius));
    }
    Value::Array(expr)
}

pub fn circle_layer(filter: Option<Value>) -> Value {
    let mut layer = json!({
        "id": CIRCLE_LAYER_ID,
        "type": "circle",
        "source": SOURCE_ID,
        "paint": {
            "circle-color": color_expression(),
            "circle-radius": radius_expression(),
            "circle-opacity": CIRCLE_OPACITY,
            "circle-stroke-color": CIRCLE_STROKE_COLOR,
            "circle-stroke-width": CIRCLE_STROKE_WIDTH
        }
    });
    if let Some(filter) = filter {
        layer["filter"] = filter;
    }
    layer
}

pub fn label_layer(filter: Option<Value>) -> Value {
    let mut layer = json!({
        "id": LABEL_LAYER_ID,
        "type": "symbol",
        "source": SOURCE_ID,
        "minzoom": LABEL_MIN_ZOOM,
        "layout": {
            "text-field": ["get", "name"],
            "text-size": LABEL_TEXT_SIZE,
            "text-offset": LABEL_TEXT_OFFSET,
            "text-anchor": "top"
        },
        "paint": {
            "text-color": LABEL_TEXT_COLOR,
            "text-halo-color": LABEL_HALO_COLOR,
            "text-halo-width": LABEL_HALO_WIDTH
        }
    });
    if let Some(filter) = filter {
        layer["filter"] = filter;
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radius_at_stops() {
        for (cases, radius) in RADIUS_STOPS {
            assert!((circle_radius(Some(cases)) - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn test_radius_interpolates_and_clamps() {
        assert!((circle_radius(Some(25_000.0)) - 5.5).abs() < 1e-9);
        assert_eq!(circle_radius(Some(-10.0)), 3.0);
        assert_eq!(circle_radius(None), 3.0);
        assert_eq!(circle_radius(Some(1e9)), 28.0);
        // 500 cases stays in the smallest tier
        assert!(circle_radius(Some(500.0)) < 3.1);
    }

    #[test]
    fn test_marker_color() {
        assert_eq!(marker_color(Some(Severity::High)), "#E7B416");
        assert_eq!(marker_color(None), FALLBACK_COLOR);
    }

    #[test]
    fn test_filter_expression() {
        let filters: ActiveFilterSet = [Severity::Low, Severity::VeryHigh].into_iter().collect();
        assert_eq!(
            filter_expression(&filters),
            json!(["in", ["get", "severity"], ["literal", ["low", "veryHigh"]]])
        );
    }

    #[test]
    fn test_color_expression_has_fallback() {
        let expr = color_expression();
        let items = expr.as_array().unwrap();
        assert_eq!(items.len(), 2 + 10 + 1);
        assert_eq!(items.last().unwrap(), FALLBACK_COLOR);
    }

    #[test]
    fn test_label_layer_min_zoom() {
        let layer = label_layer(None);
        assert_eq!(layer["minzoom"], 3.0);
        assert_eq!(layer["layout"]["text-field"], json!(["get", "name"]));
        assert!(layer.get("filter").is_none());
    }

    proptest! {
        #[test]
        fn radius_is_monotonic(a in 0.0f64..3.0e7, b in 0.0f64..3.0e7) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(circle_radius(Some(lo)) <= circle_radius(Some(hi)));
        }
    }
}
