use std::path::Path;

use serde::Deserialize;

use crate::density::DEFAULT_BAR_COUNT;
use crate::domain::{DEFAULT_ZOOM_MAX, DEFAULT_ZOOM_MIN, ZoomBounds};
use crate::error::{Error, Result};
use crate::markers::{
    DEFAULT_LABEL_BAND, DEFAULT_STACK_DELTA, LabelBand, MarkerStyle, ProjectionOptions,
};

/// Tunables for the timeline model, read from a TOML file.
///
/// ```toml
/// bar_count = 200
/// zoom_max = 8.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bar_count: usize,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub label_band_min: f64,
    pub label_band_max: f64,
    pub stack_delta: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bar_count: DEFAULT_BAR_COUNT,
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            label_band_min: DEFAULT_LABEL_BAND.min,
            label_band_max: DEFAULT_LABEL_BAND.max,
            stack_delta: DEFAULT_STACK_DELTA,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bar_count == 0 {
            return Err(Error::InvalidConfig("bar_count must be at least 1".into()));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.zoom_min) || !positive(self.zoom_max) || self.zoom_min > self.zoom_max {
            return Err(Error::InvalidConfig(format!(
                "zoom bounds [{}, {}] must be positive and ordered",
                self.zoom_min, self.zoom_max
            )));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.label_band_min)
            || !unit.contains(&self.label_band_max)
            || self.label_band_min >= self.label_band_max
        {
            return Err(Error::InvalidConfig(format!(
                "label band [{}, {}] must be an ordered sub-range of [0, 1]",
                self.label_band_min, self.label_band_max
            )));
        }
        if !(self.stack_delta.is_finite() && self.stack_delta >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "stack_delta {} must be a non-negative number",
                self.stack_delta
            )));
        }
        Ok(())
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds::new(self.zoom_min, self.zoom_max)
    }

    pub fn projection_options(&self, style: MarkerStyle) -> ProjectionOptions {
        ProjectionOptions {
            style,
            band: LabelBand {
                min: self.label_band_min,
                max: self.label_band_max,
            },
            stack_delta: self.stack_delta,
        }
    }
}
