//! Shared helpers for ruler tick intervals and time labels.

use crate::coords::Viewport;

/// Choose a "nice" step (1, 2 or 5 times a power of ten) of at least `seconds`.
pub fn nice_interval(seconds: f64) -> f64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0.0;
    }

    let log10 = seconds.log10().floor();
    let base = 10.0f64.powf(log10);
    let ratio = seconds / base;
    if ratio <= 1.0 {
        base
    } else if ratio <= 2.0 {
        base * 2.0
    } else if ratio <= 5.0 {
        base * 5.0
    } else {
        base * 10.0
    }
}

/// Step for ticks spaced roughly `pixel_interval` apart across `extent` pixels.
pub fn interval_for_extent(viewport: Viewport, extent: f32, pixel_interval: f32) -> f64 {
    if viewport.is_empty() || extent <= 0.0 {
        return 0.0;
    }
    let seconds_per_pixel = viewport.span / extent as f64;
    nice_interval(seconds_per_pixel * pixel_interval as f64)
}

/// Tick times inside the viewport, on multiples of `step`.
pub fn visible_ticks(viewport: Viewport, step: f64) -> Vec<f64> {
    if viewport.is_empty() || !(step > 0.0) {
        return Vec::new();
    }
    let first = (viewport.start / step).ceil() as i64;
    let last = (viewport.end() / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Format `seconds` using the magnitude of `step` to choose a unit.
pub fn format_time_label(seconds: f64, step: f64) -> String {
    if step >= 1.0 {
        let total = seconds.max(0.0).round() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    } else if step >= 0.01 {
        format!("{:.2} s", seconds)
    } else {
        format!("{:.1} ms", seconds * 1_000.0)
    }
}
