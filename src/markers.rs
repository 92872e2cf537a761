//! Placement of time-indexed entities inside the current window.

use crate::coords::Viewport;
use crate::entity::{EntityFeed, EntityId, TimedEntity};

/// Fractions outside which a label would clip at the container edge.
pub const DEFAULT_LABEL_BAND: LabelBand = LabelBand {
    min: 0.02,
    max: 0.85,
};

/// Markers closer than this fraction of the window are visually stacked.
pub const DEFAULT_STACK_DELTA: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBand {
    pub min: f64,
    pub max: f64,
}

impl Default for LabelBand {
    fn default() -> Self {
        DEFAULT_LABEL_BAND
    }
}

impl LabelBand {
    pub fn clamp(self, fraction: f64) -> f64 {
        fraction.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// Bare line or bar. Never clamped.
    #[default]
    Tick,
    /// Line plus a text pill whose position is kept inside the label band.
    Pill,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    pub style: MarkerStyle,
    pub band: LabelBand,
    pub stack_delta: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            style: MarkerStyle::Tick,
            band: DEFAULT_LABEL_BAND,
            stack_delta: DEFAULT_STACK_DELTA,
        }
    }
}

impl ProjectionOptions {
    pub fn with_style(self, style: MarkerStyle) -> Self {
        Self { style, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerProjection {
    pub entity_id: EntityId,
    /// Position of the entity in the input list.
    pub position: usize,
    /// Fraction of the visible start of the entity.
    pub screen_fraction: f64,
    /// Fraction of the visible end, for intervals.
    pub end_fraction: Option<f64>,
    /// Clamped label position, for pills.
    pub label_fraction: Option<f64>,
    /// Earlier projections whose label sits within the stack delta.
    pub stack: usize,
}

impl MarkerProjection {
    fn anchor(&self) -> f64 {
        self.label_fraction.unwrap_or(self.screen_fraction)
    }
}

/// Project every visible entity, in input order. Nothing is deduplicated.
pub fn project(
    entities: &[TimedEntity],
    viewport: Viewport,
    options: ProjectionOptions,
) -> Vec<MarkerProjection> {
    if viewport.is_empty() {
        return Vec::new();
    }
    collect(entities.iter().enumerate(), viewport, options)
}

/// Same as [`project`], narrowing candidates through the feed's interval index.
pub fn project_feed(
    feed: &EntityFeed,
    viewport: Viewport,
    options: ProjectionOptions,
) -> Vec<MarkerProjection> {
    if viewport.is_empty() {
        return Vec::new();
    }
    let entities = feed.entities();
    let candidates = feed.index().candidates(viewport.start, viewport.end());
    collect(
        candidates
            .into_iter()
            .map(|position| (position, &entities[position])),
        viewport,
        options,
    )
}

fn collect<'a>(
    entities: impl Iterator<Item = (usize, &'a TimedEntity)>,
    viewport: Viewport,
    options: ProjectionOptions,
) -> Vec<MarkerProjection> {
    let mut projections: Vec<MarkerProjection> = Vec::new();
    for (position, entity) in entities {
        let Some(mut projection) = project_one(position, entity, viewport, options) else {
            continue;
        };
        let anchor = projection.anchor();
        projection.stack = projections
            .iter()
            .filter(|earlier| (earlier.anchor() - anchor).abs() < options.stack_delta)
            .count();
        projections.push(projection);
    }
    projections
}

fn project_one(
    position: usize,
    entity: &TimedEntity,
    viewport: Viewport,
    options: ProjectionOptions,
) -> Option<MarkerProjection> {
    if !entity.span.is_finite() {
        return None;
    }
    let (start, end) = entity.span.bounds();
    if !viewport.overlaps(start, end) {
        return None;
    }

    let screen_fraction = viewport.fraction_of(start.max(viewport.start));
    let end_fraction = (end > start).then(|| viewport.fraction_of(end.min(viewport.end())));
    let label_fraction = match options.style {
        MarkerStyle::Tick => None,
        MarkerStyle::Pill => Some(options.band.clamp(screen_fraction)),
    };

    Some(MarkerProjection {
        entity_id: entity.id,
        position,
        screen_fraction,
        end_fraction,
        label_fraction,
        stack: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn pills() -> ProjectionOptions {
        ProjectionOptions::default().with_style(MarkerStyle::Pill)
    }

    #[test]
    fn filters_to_window() {
        let entities = [
            TimedEntity::point(1, 5.0, EntityKind::Issue, "before"),
            TimedEntity::point(2, 15.0, EntityKind::Issue, "inside"),
            TimedEntity::point(3, 25.0, EntityKind::Issue, "after"),
        ];
        let projections = project(&entities, Viewport::new(10.0, 10.0), Default::default());
        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].entity_id, 2);
        assert_eq!(projections[0].screen_fraction, 0.5);
        assert_eq!(projections[0].label_fraction, None);
    }

    #[test]
    fn intervals_use_overlap() {
        let entities = [TimedEntity::interval(7, 0.0, 12.0, EntityKind::Subtitle, "long")];
        let projections = project(&entities, Viewport::new(10.0, 10.0), Default::default());
        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].screen_fraction, 0.0);
        assert_eq!(projections[0].end_fraction, Some(0.2));
    }

    #[test]
    fn pill_labels_are_clamped_but_ticks_are_not() {
        let entities = [
            TimedEntity::point(1, 10.0, EntityKind::Annotation, "left edge"),
            TimedEntity::point(2, 19.5, EntityKind::Annotation, "right edge"),
        ];
        let viewport = Viewport::new(10.0, 10.0);
        let projections = project(&entities, viewport, pills());
        assert_eq!(projections[0].screen_fraction, 0.0);
        assert_eq!(projections[0].label_fraction, Some(0.02));
        assert_eq!(projections[1].screen_fraction, 0.95);
        assert_eq!(projections[1].label_fraction, Some(0.85));
    }

    #[test]
    fn close_markers_are_kept_in_order_and_stacked() {
        let entities = [
            TimedEntity::point(1, 50.0, EntityKind::Issue, "a"),
            TimedEntity::point(2, 50.1, EntityKind::Issue, "b"),
            TimedEntity::point(3, 50.2, EntityKind::Issue, "c"),
            TimedEntity::point(4, 80.0, EntityKind::Issue, "d"),
        ];
        let projections = project(&entities, Viewport::new(0.0, 100.0), Default::default());
        let ids: Vec<_> = projections.iter().map(|p| p.entity_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let stacks: Vec<_> = projections.iter().map(|p| p.stack).collect();
        assert_eq!(stacks, vec![0, 1, 2, 0]);
    }

    #[test]
    fn malformed_interval_projects_as_point() {
        let entities = [TimedEntity::interval(1, 15.0, 2.0, EntityKind::Subtitle, "bad")];
        let projections = project(&entities, Viewport::new(10.0, 10.0), Default::default());
        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].screen_fraction, 0.5);
        assert_eq!(projections[0].end_fraction, None);
    }

    #[test]
    fn empty_viewport_projects_nothing() {
        let entities = [TimedEntity::point(1, 0.0, EntityKind::Issue, "a")];
        assert!(project(&entities, Viewport::overview(0.0), pills()).is_empty());
    }

    #[test]
    fn feed_projection_matches_slice_projection() {
        let entities: Vec<TimedEntity> = (0..50)
            .map(|i| {
                let start = i as f64 * 2.0;
                TimedEntity::interval(i, start, start + 3.0, EntityKind::Subtitle, "x")
            })
            .collect();
        let feed = EntityFeed::new(entities.clone());
        let viewport = Viewport::new(30.0, 20.0);
        assert_eq!(
            project(&entities, viewport, pills()),
            project_feed(&feed, viewport, pills())
        );
    }
}
