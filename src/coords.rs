//! Conversions between absolute time, window fractions and pixels.

/// Smallest span used as a divisor, one display frame at 24 fps.
pub const FRAME_GUARD: f64 = 1.0 / 24.0;

/// Map `time` to its fraction of the window `[window_start, window_start + visible_window]`.
///
/// Returns `0.0` for a degenerate window (zero duration). Windows narrower
/// than [`FRAME_GUARD`] are measured against the guard instead.
pub fn time_to_fraction(time: f64, window_start: f64, visible_window: f64) -> f64 {
    if !(visible_window > 0.0) || !time.is_finite() {
        return 0.0;
    }
    (time - window_start) / visible_window.max(FRAME_GUARD)
}

/// Inverse of [`time_to_fraction`].
pub fn fraction_to_time(fraction: f64, window_start: f64, visible_window: f64) -> f64 {
    if !(visible_window > 0.0) || !fraction.is_finite() {
        return window_start;
    }
    window_start + fraction * visible_window.max(FRAME_GUARD)
}

/// Fraction of the whole track, for overview widgets that are not windowed.
pub fn overview_fraction(time: f64, duration: f64) -> f64 {
    time_to_fraction(time, 0.0, duration)
}

pub fn overview_time(fraction: f64, duration: f64) -> f64 {
    fraction_to_time(fraction, 0.0, duration)
}

/// A visible time range `[start, start + span]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub start: f64,
    pub span: f64,
}

impl Viewport {
    pub fn new(start: f64, span: f64) -> Self {
        Self { start, span }
    }

    /// The full `[0, duration]` range.
    pub fn overview(duration: f64) -> Self {
        Self {
            start: 0.0,
            span: duration.max(0.0),
        }
    }

    pub fn end(self) -> f64 {
        self.start + self.span
    }

    pub fn is_empty(self) -> bool {
        !(self.span > 0.0)
    }

    pub fn contains(self, time: f64) -> bool {
        !self.is_empty() && time >= self.start && time <= self.end()
    }

    /// Inclusive overlap test between `[start, end]` and this range.
    pub fn overlaps(self, start: f64, end: f64) -> bool {
        !self.is_empty() && start <= self.end() && end >= self.start
    }

    pub fn fraction_of(self, time: f64) -> f64 {
        time_to_fraction(time, self.start, self.span)
    }

    pub fn time_at(self, fraction: f64) -> f64 {
        fraction_to_time(fraction, self.start, self.span)
    }
}

/// Binds a [`Viewport`] to a container extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapper {
    pub viewport: Viewport,
    pub extent: f32,
}

impl ScreenMapper {
    pub fn new(viewport: Viewport, extent: f32) -> Self {
        Self { viewport, extent }
    }

    pub fn time_to_x(&self, time: f64) -> f32 {
        if self.extent <= 0.0 {
            return 0.0;
        }
        (self.viewport.fraction_of(time) * self.extent as f64) as f32
    }

    /// Fraction of the extent under `x`, clamped to the container.
    pub fn fraction_at(&self, x: f32) -> f64 {
        if self.extent <= 0.0 {
            return 0.0;
        }
        (x / self.extent).clamp(0.0, 1.0) as f64
    }

    pub fn x_to_time(&self, x: f32) -> f64 {
        self.viewport.time_at(self.fraction_at(x))
    }

    pub fn width_of(&self, duration: f64) -> f32 {
        if self.viewport.is_empty() || self.extent <= 0.0 {
            return 0.0;
        }
        (duration / self.viewport.span.max(FRAME_GUARD) * self.extent as f64) as f32
    }
}
