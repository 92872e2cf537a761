//! The single owner of mutable timeline state.
//!
//! Views never touch [`TimeDomain`] or [`RegionSelection`] directly: they
//! send a [`TimelineInput`] (or a click) and read back a [`TimelineSnapshot`].

use log::{debug, warn};

use crate::config::Config;
use crate::domain::{DomainSnapshot, TimeDomain, ZoomBounds};
use crate::region::RegionSelection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineInput {
    Seek(f64),
    SetZoom(f64),
    ZoomAround { level: f64, anchor: f64 },
    ZoomBy { factor: f64, anchor: f64 },
    SetVisibleWindow(f64),
    ZoomToRange(f64, f64),
    PanWindow(f64),
    ScrollTo(f64),
    ToggleRegionPoint(f64),
    ClearRegion,
    ZoomToRegion,
    SetDuration(f64),
}

/// Everything a view needs to render one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimelineSnapshot {
    pub domain: DomainSnapshot,
    pub region: RegionSelection,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineModel {
    domain: TimeDomain,
    region: RegionSelection,
}

impl TimelineModel {
    pub fn new(duration: f64, bounds: ZoomBounds) -> Self {
        Self {
            domain: TimeDomain::new(duration, bounds),
            region: RegionSelection::Empty,
        }
    }

    pub fn with_config(config: &Config, duration: f64) -> Self {
        Self::new(duration, config.zoom_bounds())
    }

    pub fn domain(&self) -> &TimeDomain {
        &self.domain
    }

    pub fn region(&self) -> RegionSelection {
        self.region
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            domain: self.domain.snapshot(),
            region: self.region,
        }
    }

    pub fn apply(&mut self, input: TimelineInput) {
        match input {
            TimelineInput::Seek(time) => self.domain.seek(time),
            TimelineInput::SetZoom(level) => self.domain.set_zoom(level),
            TimelineInput::ZoomAround { level, anchor } => self.domain.zoom_around(level, anchor),
            TimelineInput::ZoomBy { factor, anchor } => self.domain.zoom_by(factor, anchor),
            TimelineInput::SetVisibleWindow(seconds) => self.domain.set_visible_window(seconds),
            TimelineInput::ZoomToRange(a, b) => self.domain.zoom_to_range(a, b),
            TimelineInput::PanWindow(delta) => self.domain.pan_window(delta),
            TimelineInput::ScrollTo(start) => self.domain.scroll_to(start),
            TimelineInput::ToggleRegionPoint(time) => self.toggle_region_point(time),
            TimelineInput::ClearRegion => self.clear_region(),
            TimelineInput::ZoomToRegion => self.zoom_to_region(),
            TimelineInput::SetDuration(duration) => {
                self.domain.set_duration(duration);
                self.region.clamp_to(self.domain.duration());
            }
        }
    }

    /// A plain click seeks; a shift-click extends the region and leaves the
    /// playhead alone.
    pub fn click(&mut self, time: f64, shift: bool) {
        if shift {
            self.toggle_region_point(time);
        } else {
            self.domain.seek(time);
        }
    }

    pub fn toggle_region_point(&mut self, time: f64) {
        if time.is_nan() {
            warn!("ignoring region point at NaN");
            return;
        }
        self.region
            .toggle_point(time.clamp(0.0, self.domain.duration()));
        debug!("region -> {:?}", self.region);
    }

    pub fn clear_region(&mut self) {
        self.region.clear();
        debug!("region cleared");
    }

    /// Fit the window to a bounded region. No-op otherwise.
    pub fn zoom_to_region(&mut self) {
        if let Some((start, end)) = self.region.normalized() {
            self.domain.zoom_to_range(start, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TimelineModel {
        TimelineModel::new(120.0, ZoomBounds::default())
    }

    #[test]
    fn plain_click_seeks_without_touching_region() {
        let mut model = model();
        model.click(12.0, true);
        model.click(40.0, false);
        assert_eq!(model.domain().current_time(), 40.0);
        assert_eq!(model.region(), RegionSelection::Anchored { start: 12.0 });
    }

    #[test]
    fn shift_click_leaves_playhead() {
        let mut model = model();
        model.apply(TimelineInput::Seek(30.0));
        model.click(5.0, true);
        model.click(3.0, true);
        assert_eq!(model.domain().current_time(), 30.0);
        assert_eq!(model.region(), RegionSelection::Bounded { start: 5.0, end: 3.0 });
    }

    #[test]
    fn region_points_are_clamped() {
        let mut model = model();
        model.apply(TimelineInput::ToggleRegionPoint(-4.0));
        model.apply(TimelineInput::ToggleRegionPoint(900.0));
        assert_eq!(model.region().normalized(), Some((0.0, 120.0)));
    }

    #[test]
    fn zoom_to_region_fits_window() {
        let mut model = model();
        model.apply(TimelineInput::ToggleRegionPoint(90.0));
        model.apply(TimelineInput::ToggleRegionPoint(30.0));
        model.apply(TimelineInput::ZoomToRegion);
        let snapshot = model.snapshot().domain;
        assert_eq!(snapshot.window_start, 30.0);
        assert_eq!(snapshot.visible_window, 60.0);
    }

    #[test]
    fn zoom_to_region_without_bounds_is_noop() {
        let mut model = model();
        model.apply(TimelineInput::ToggleRegionPoint(90.0));
        let before = model.snapshot();
        model.apply(TimelineInput::ZoomToRegion);
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn shrinking_duration_clamps_region() {
        let mut model = model();
        model.apply(TimelineInput::ToggleRegionPoint(100.0));
        model.apply(TimelineInput::SetDuration(50.0));
        assert_eq!(model.region(), RegionSelection::Anchored { start: 50.0 });
    }
}
