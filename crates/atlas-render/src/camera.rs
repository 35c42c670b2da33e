//! Viewport defaults and the fly-to camera animation

use atlas_core::LngLat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest and longest fly-to animation
pub const MIN_FLIGHT: Duration = Duration::from_millis(400);
pub const MAX_FLIGHT: Duration = Duration::from_secs(6);

/// Initial map view and search fly-to parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Basemap style (dark theme)
    pub style_url: String,
    /// `[lon, lat]`
    pub center: [f64; 2],
    pub zoom: f64,
    /// Zoom used when search flies to a country
    pub search_zoom: f64,
    pub fly_speed: f64,
    pub fly_curve: f64,
    /// Map provider token, written into exported style documents
    pub access_token: Option<String>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/dark-v11".to_string(),
            center: [20.0, 15.0],
            zoom: 1.2,
            search_zoom: 4.2,
            fly_speed: 0.8,
            fly_curve: 1.1,
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Flight {
    from: LngLat,
    from_zoom: f64,
    to: LngLat,
    to_zoom: f64,
    duration: Duration,
    elapsed: Duration,
}

/// Map camera: center and zoom, optionally mid-flight
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    center: LngLat,
    zoom: f64,
    speed: f64,
    curve: f64,
    flight: Option<Flight>,
}

impl Camera {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            center: LngLat::new(config.center[0], config.center[1]),
            zoom: config.zoom,
            speed: config.fly_speed,
            curve: config.fly_curve,
            flight: None,
        }
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Remaining animation time, zero when idle
    pub fn remaining(&self) -> Duration {
        self.flight
            .as_ref()
            .map(|f| f.duration.saturating_sub(f.elapsed))
            .unwrap_or(Duration::ZERO)
    }

    /// Start a flight from the current view. A new flight replaces one in progress.
    pub fn fly_to(&mut self, target: LngLat, zoom: f64) {
        let duration = flight_duration(
            self.center,
            self.zoom,
            target,
            zoom,
            self.speed,
            self.curve,
        );
        self.flight = Some(Flight {
            from: self.center,
            from_zoom: self.zoom,
            to: target,
            to_zoom: zoom,
            duration,
            elapsed: Duration::ZERO,
        });
    }

    /// Advance the animation
    pub fn tick(&mut self, dt: Duration) {
        let Some(flight) = self.flight.as_mut() else { return };

        flight.elapsed = (flight.elapsed + dt).min(flight.duration);
        let t = if flight.duration.is_zero() {
            1.0
        } else {
            flight.elapsed.as_secs_f64() / flight.duration.as_secs_f64()
        };
        let k = ease_in_out(t);

        self.center = LngLat::new(
            lerp(flight.from.lon, flight.to.lon, k),
            lerp(flight.from.lat, flight.to.lat, k),
        );
        self.zoom = lerp(flight.from_zoom, flight.to_zoom, k);

        if flight.elapsed >= flight.duration {
            self.center = flight.to;
            self.zoom = flight.to_zoom;
            self.flight = None;
        }
    }

    /// Jump to the end of the current flight
    pub fn finish(&mut self) {
        let remaining = self.remaining();
        self.tick(remaining);
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Longer for farther targets and bigger zoom changes, slower with lower speed
fn flight_duration(
    from: LngLat,
    from_zoom: f64,
    to: LngLat,
    to_zoom: f64,
    speed: f64,
    curve: f64,
) -> Duration {
    let distance_deg = (to.lon - from.lon).hypot(to.lat - from.lat);
    let span = distance_deg / 45.0 + (to_zoom - from_zoom).abs() / 4.0;
    let speed = if speed > 0.0 { speed } else { 1.0 };
    let secs = (span * curve.max(0.1) / speed)
        .clamp(MIN_FLIGHT.as_secs_f64(), MAX_FLIGHT.as_secs_f64());
    Duration::from_secs_f64(secs)
}
