//! Presentation helpers for sensor metric charts.

use crate::req::{Measure, MetricMeta, MetricValue, Order, Sensor};

/// Samples shown on a latest-values card.
pub const LATEST_BOOLEAN_SAMPLES: u32 = 10;
pub const LATEST_NUMERIC_SAMPLES: u32 = 15;

// a scrolled chart gives each sample 32px, never less than the tooltip needs
const PX_PER_SAMPLE: u32 = 32;
const MIN_SCROLL_WIDTH: u32 = 150;

pub fn format_value(value: &MetricValue, meta: &MetricMeta) -> String {
    if meta.is_boolean {
        return if value.is_truthy() { "Yes" } else { "No" }.to_owned();
    }
    format!("{:.2}{}", value.as_f64(), meta.unit.as_deref().unwrap_or(""))
}

pub fn latest_sample_count(meta: &MetricMeta) -> u32 {
    if meta.is_boolean {
        LATEST_BOOLEAN_SAMPLES
    } else {
        LATEST_NUMERIC_SAMPLES
    }
}

/// Bar height of a boolean sample; "no" keeps a visible stub.
pub fn bar_height(value: &MetricValue) -> f64 {
    if value.is_truthy() {
        1.0
    } else {
        0.1
    }
}

/// Charts always read left to right, oldest first.
pub fn chronological(mut measures: Vec<Measure>, fetched: Order) -> Vec<Measure> {
    if fetched == Order::Desc {
        measures.reverse();
    }
    measures
}

pub fn scroll_width_px(samples: usize) -> u32 {
    let samples = u32::try_from(samples).unwrap_or(u32::MAX);
    PX_PER_SAMPLE.saturating_mul(samples).max(MIN_SCROLL_WIDTH)
}

/// `"id (name)"`, or just the id for unnamed sensors.
pub fn sensor_identifier(sensor: &Sensor) -> String {
    match sensor.name.as_deref() {
        Some(name) if !name.is_empty() => format!("{} ({})", sensor.id, name),
        _ => sensor.id.clone(),
    }
}

/// Metric picked in the dashboard card: the explicit choice, or the only
/// metric a sensor reports.
pub fn select_metric<'a>(metrics: &'a [MetricMeta], selected: Option<&str>) -> Option<&'a MetricMeta> {
    match selected {
        Some(name) => metrics.iter().find(|m| m.name == name),
        None if metrics.len() == 1 => metrics.first(),
        None => None,
    }
}

/// Value axis bounds of a numeric series: the finite extremes padded by a
/// twentieth of the span, or by one unit when every value is the same.
pub fn value_range(measures: &[Measure]) -> Option<(f64, f64)> {
    let (lo, hi) = measures
        .iter()
        .map(|m| m.value.as_f64())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let pad = if hi > lo { (hi - lo) / 20.0 } else { 1.0 };
    Some((lo - pad, hi + pad))
}
