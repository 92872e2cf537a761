/// Two-gesture time range selection.
///
/// The bounds are stored in click order. Use [`RegionSelection::normalized`]
/// when rendering; `start <= end` is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegionSelection {
    #[default]
    Empty,
    Anchored {
        start: f64,
    },
    Bounded {
        start: f64,
        end: f64,
    },
}

impl RegionSelection {
    /// Anchor on `Empty`, bound on `Anchored`, start over on `Bounded`.
    pub fn toggle_point(&mut self, time: f64) {
        *self = match *self {
            RegionSelection::Empty | RegionSelection::Bounded { .. } => {
                RegionSelection::Anchored { start: time }
            }
            RegionSelection::Anchored { start } => RegionSelection::Bounded { start, end: time },
        };
    }

    pub fn clear(&mut self) {
        *self = RegionSelection::Empty;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RegionSelection::Empty)
    }

    pub fn start(&self) -> Option<f64> {
        match *self {
            RegionSelection::Empty => None,
            RegionSelection::Anchored { start } | RegionSelection::Bounded { start, .. } => {
                Some(start)
            }
        }
    }

    pub fn end(&self) -> Option<f64> {
        match *self {
            RegionSelection::Bounded { end, .. } => Some(end),
            _ => None,
        }
    }

    /// `(min, max)` of a bounded selection.
    pub fn normalized(&self) -> Option<(f64, f64)> {
        match *self {
            RegionSelection::Bounded { start, end } => Some((start.min(end), start.max(end))),
            _ => None,
        }
    }

    /// Pull stored bounds back inside `[0, duration]` after the track shrinks.
    pub fn clamp_to(&mut self, duration: f64) {
        let clamp = |t: f64| t.clamp(0.0, duration.max(0.0));
        *self = match *self {
            RegionSelection::Empty => RegionSelection::Empty,
            RegionSelection::Anchored { start } => RegionSelection::Anchored {
                start: clamp(start),
            },
            RegionSelection::Bounded { start, end } => RegionSelection::Bounded {
                start: clamp(start),
                end: clamp(end),
            },
        };
    }
}
