//! Web-Mercator placement of device pins on the dashboard map.

use std::f64::consts::PI;

use crate::req::Device;

// world width in px at zoom 0
const TILE_SIZE: f64 = 512.0;
const MAX_SIN_LAT: f64 = 0.9999;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            latitude: -37.909365,
            longitude: 145.134424,
            zoom: 10.0,
        }
    }
}

impl Viewport {
    pub fn zoomed(self, delta: f64) -> Self {
        Self {
            zoom: (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM),
            ..self
        }
    }

    pub fn centered_on(self, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..self
        }
    }
}

fn world_px(latitude: f64, longitude: f64, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * zoom.exp2();
    let x = (longitude + 180.0) / 360.0 * scale;
    let sin_lat = latitude.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;
    (x, y)
}

/// Screen position of a coordinate inside a `width` × `height` view.
pub fn project(latitude: f64, longitude: f64, view: &Viewport, width: f64, height: f64) -> (f64, f64) {
    let (x, y) = world_px(latitude, longitude, view.zoom);
    let (cx, cy) = world_px(view.latitude, view.longitude, view.zoom);
    (x - cx + width / 2.0, y - cy + height / 2.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub device_id: String,
    pub x: f64,
    pub y: f64,
}

/// One pin per mappable device. Pins beyond the board keep their
/// coordinates; the drawing surface clips them.
pub fn pins(devices: &[Device], view: &Viewport, width: f64, height: f64) -> Vec<Pin> {
    devices
        .iter()
        .filter_map(|dev| match (dev.latitude, dev.longitude) {
            (Some(lat), Some(lon)) if dev.is_mappable() => {
                let (x, y) = project(lat, lon, view, width, height);
                Some(Pin {
                    device_id: dev.id.clone(),
                    x,
                    y,
                })
            }
            _ => None,
        })
        .collect()
}
