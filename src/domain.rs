//! Canonical playhead and viewport state.
//!
//! Every field stays inside `[0, duration]` after every mutation. Inputs are
//! clamped, never rejected; `NaN` inputs are ignored.

use log::{debug, warn};

use crate::coords::{FRAME_GUARD, Viewport};

pub const DEFAULT_ZOOM_MIN: f64 = 0.5;
pub const DEFAULT_ZOOM_MAX: f64 = 4.0;

/// Inclusive zoom level limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    min: f64,
    max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_ZOOM_MIN,
            max: DEFAULT_ZOOM_MAX,
        }
    }
}

impl ZoomBounds {
    /// Reversed limits are swapped; non-positive or non-finite limits fall
    /// back to the defaults.
    pub fn new(min: f64, max: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(min) || !valid(max) {
            return Self::default();
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, max }
    }

    pub fn min(self) -> f64 {
        self.min
    }

    pub fn max(self) -> f64 {
        self.max
    }

    pub fn clamp(self, level: f64) -> f64 {
        level.clamp(self.min, self.max)
    }
}

/// Read-only copy of the domain handed to views each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomainSnapshot {
    pub duration: f64,
    pub current_time: f64,
    pub window_start: f64,
    pub visible_window: f64,
    pub zoom_level: f64,
}

impl DomainSnapshot {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.window_start, self.visible_window)
    }

    /// Playhead position within the window, if it is visible.
    pub fn playhead_fraction(&self) -> Option<f64> {
        let viewport = self.viewport();
        viewport
            .contains(self.current_time)
            .then(|| viewport.fraction_of(self.current_time))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeDomain {
    duration: f64,
    current_time: f64,
    window_start: f64,
    visible_window: f64,
    zoom_level: f64,
    bounds: ZoomBounds,
}

impl Default for TimeDomain {
    fn default() -> Self {
        Self::new(0.0, ZoomBounds::default())
    }
}

impl TimeDomain {
    pub fn new(duration: f64, bounds: ZoomBounds) -> Self {
        let mut domain = Self {
            duration: 0.0,
            current_time: 0.0,
            window_start: 0.0,
            visible_window: 0.0,
            zoom_level: bounds.clamp(1.0),
            bounds,
        };
        domain.set_duration(duration);
        domain
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn window_start(&self) -> f64 {
        self.window_start
    }

    pub fn visible_window(&self) -> f64 {
        self.visible_window
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.window_start, self.visible_window)
    }

    pub fn snapshot(&self) -> DomainSnapshot {
        DomainSnapshot {
            duration: self.duration,
            current_time: self.current_time,
            window_start: self.window_start,
            visible_window: self.visible_window,
            zoom_level: self.zoom_level,
        }
    }

    /// Move the playhead, scrolling the window just enough to reveal it.
    pub fn seek(&mut self, time: f64) {
        if time.is_nan() {
            warn!("ignoring seek to NaN");
            return;
        }
        self.current_time = time.clamp(0.0, self.duration);

        if self.visible_window > 0.0 {
            let window_end = self.window_start + self.visible_window;
            if self.current_time < self.window_start {
                self.window_start = self.current_time;
            } else if self.current_time > window_end {
                self.window_start = self.current_time - self.visible_window;
            }
        }
        self.clamp_window_start();
        debug!(
            "seek {time} -> {} (window {}+{})",
            self.current_time, self.window_start, self.visible_window
        );
    }

    /// Zoom keeping the window centre fixed.
    pub fn set_zoom(&mut self, level: f64) {
        let center = self.window_start + self.visible_window / 2.0;
        self.zoom_around(level, center);
    }

    /// Zoom keeping `anchor` at the same fraction of the window.
    pub fn zoom_around(&mut self, level: f64, anchor: f64) {
        if level.is_nan() {
            warn!("ignoring zoom to NaN");
            return;
        }
        let level = self.bounds.clamp(level);
        self.zoom_level = level;
        if self.duration <= 0.0 {
            return;
        }

        let anchor = if anchor.is_nan() {
            self.window_start + self.visible_window / 2.0
        } else {
            anchor.clamp(0.0, self.duration)
        };
        let fraction = if self.visible_window > 0.0 {
            ((anchor - self.window_start) / self.visible_window).clamp(0.0, 1.0)
        } else {
            0.5
        };

        self.visible_window = self.window_for_zoom(level);
        self.window_start = anchor - fraction * self.visible_window;
        self.clamp_window_start();
        debug!(
            "zoom {level} around {anchor} -> window {}+{}",
            self.window_start, self.visible_window
        );
    }

    /// Multiply the zoom level by `factor`, anchored at `anchor`.
    pub fn zoom_by(&mut self, factor: f64, anchor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            warn!("ignoring zoom factor {factor}");
            return;
        }
        self.zoom_around(self.zoom_level * factor, anchor);
    }

    /// Set the window width directly; the zoom level follows.
    pub fn set_visible_window(&mut self, seconds: f64) {
        if seconds.is_nan() {
            warn!("ignoring visible window of NaN");
            return;
        }
        let center = self.window_start + self.visible_window / 2.0;
        self.fit_window(center, seconds);
    }

    /// Fit the window to `[min(a, b), max(a, b)]`, within the zoom bounds.
    pub fn zoom_to_range(&mut self, a: f64, b: f64) {
        if a.is_nan() || b.is_nan() {
            warn!("ignoring zoom to range {a}..{b}");
            return;
        }
        let start = a.min(b).clamp(0.0, self.duration);
        let end = a.max(b).clamp(0.0, self.duration);
        self.fit_window((start + end) / 2.0, end - start);
    }

    pub fn pan_window(&mut self, delta: f64) {
        if delta.is_nan() {
            warn!("ignoring pan by NaN");
            return;
        }
        self.window_start += delta;
        self.clamp_window_start();
        debug!("pan {delta} -> window start {}", self.window_start);
    }

    /// Absolute pan, as from a scrollbar drag.
    pub fn scroll_to(&mut self, window_start: f64) {
        if window_start.is_nan() {
            warn!("ignoring scroll to NaN");
            return;
        }
        self.window_start = window_start;
        self.clamp_window_start();
    }

    /// Change the track length. Non-positive or non-finite durations become `0`.
    pub fn set_duration(&mut self, duration: f64) {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.duration = duration;
        self.visible_window = self.window_for_zoom(self.zoom_level);
        self.current_time = self.current_time.clamp(0.0, duration);
        self.clamp_window_start();
        debug!(
            "duration {duration}: playhead {}, window {}+{}",
            self.current_time, self.window_start, self.visible_window
        );
    }

    fn min_window(&self) -> f64 {
        FRAME_GUARD.min(self.duration)
    }

    fn window_for_zoom(&self, level: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.duration / level).clamp(self.min_window(), self.duration)
    }

    fn fit_window(&mut self, center: f64, span: f64) {
        if self.duration <= 0.0 {
            return;
        }
        let narrowest = (self.duration / self.bounds.max())
            .max(self.min_window())
            .min(self.duration);
        self.visible_window = span.clamp(narrowest, self.duration);
        self.zoom_level = self.bounds.clamp(self.duration / self.visible_window);
        self.window_start = center - self.visible_window / 2.0;
        self.clamp_window_start();
        debug!(
            "fit window {}+{} (zoom {})",
            self.window_start, self.visible_window, self.zoom_level
        );
    }

    fn clamp_window_start(&mut self) {
        let max_start = (self.duration - self.visible_window).max(0.0);
        self.window_start = self.window_start.clamp(0.0, max_start);
    }
}
