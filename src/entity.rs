//! Time-indexed entities (subtitles, issues, annotations) and the immutable
//! feeds that carry them into each derivation pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use crate::density::index::IntervalIndex;

pub type EntityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Subtitle,
    Issue,
    Annotation,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Where an entity sits on the track, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSpan {
    Point(f64),
    Interval { start: f64, end: f64 },
}

impl TimeSpan {
    pub fn start(self) -> f64 {
        match self {
            TimeSpan::Point(time) => time,
            TimeSpan::Interval { start, .. } => start,
        }
    }

    /// An interval whose end precedes its start.
    pub fn is_malformed(self) -> bool {
        matches!(self, TimeSpan::Interval { start, end } if end < start)
    }

    /// `(start, end)` with malformed intervals collapsed to their start.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            TimeSpan::Point(time) => (time, time),
            TimeSpan::Interval { start, end } if end < start => (start, start),
            TimeSpan::Interval { start, end } => (start, end),
        }
    }

    pub fn is_finite(self) -> bool {
        let (start, end) = self.bounds();
        start.is_finite() && end.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedEntity {
    pub id: EntityId,
    pub span: TimeSpan,
    pub kind: EntityKind,
    pub severity: Option<Severity>,
    pub label: String,
    pub flagged: bool,
}

impl TimedEntity {
    pub fn point(id: EntityId, time: f64, kind: EntityKind, label: impl Into<String>) -> Self {
        Self {
            id,
            span: TimeSpan::Point(time),
            kind,
            severity: None,
            label: label.into(),
            flagged: false,
        }
    }

    pub fn interval(
        id: EntityId,
        start: f64,
        end: f64,
        kind: EntityKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            span: TimeSpan::Interval { start, end },
            kind,
            severity: None,
            label: label.into(),
            flagged: false,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_flag(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    /// Issues are always flagged; other kinds only when marked.
    pub fn is_flagged(&self) -> bool {
        self.flagged || self.kind == EntityKind::Issue
    }
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// An immutable list of entities with a process-unique revision.
///
/// Derived data (density buckets) is cached against the revision, so a feed
/// is never edited in place: [`EntityFeed::replace`] swaps in a new list and
/// a new revision.
#[derive(Debug, Clone)]
pub struct EntityFeed {
    entities: Arc<[TimedEntity]>,
    index: Arc<IntervalIndex>,
    revision: u64,
}

impl Default for EntityFeed {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EntityFeed {
    pub fn new(entities: Vec<TimedEntity>) -> Self {
        let entities: Arc<[TimedEntity]> = entities.into();
        Self {
            index: Arc::new(IntervalIndex::build(entities.clone())),
            entities,
            revision: next_revision(),
        }
    }

    pub fn replace(&mut self, entities: Vec<TimedEntity>) {
        *self = Self::new(entities);
    }

    pub fn entities(&self) -> &[TimedEntity] {
        &self.entities
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Largest end time in the feed, ignoring non-finite spans.
    pub fn max_end(&self) -> Option<f64> {
        self.entities
            .iter()
            .filter(|e| e.span.is_finite())
            .map(|e| e.span.bounds().1)
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_interval_collapses_to_start() {
        let span = TimeSpan::Interval {
            start: 10.0,
            end: 4.0,
        };
        assert!(span.is_malformed());
        assert_eq!(span.bounds(), (10.0, 10.0));
    }

    #[test]
    fn issues_are_flagged() {
        let issue = TimedEntity::point(1, 3.0, EntityKind::Issue, "clipping");
        let note = TimedEntity::point(2, 3.0, EntityKind::Annotation, "note");
        assert!(issue.is_flagged());
        assert!(!note.is_flagged());
        assert!(note.with_flag(true).is_flagged());
    }

    #[test]
    fn replacing_a_feed_bumps_revision() {
        let mut feed = EntityFeed::new(vec![TimedEntity::point(
            1,
            1.0,
            EntityKind::Subtitle,
            "a",
        )]);
        let before = feed.revision();
        feed.replace(vec![]);
        assert_ne!(feed.revision(), before);
        assert!(feed.is_empty());
        assert_eq!(feed.max_end(), None);
    }

    #[test]
    fn max_end_uses_interval_ends() {
        let feed = EntityFeed::new(vec![
            TimedEntity::interval(1, 2.0, 9.5, EntityKind::Subtitle, "a"),
            TimedEntity::point(2, 4.0, EntityKind::Issue, "b"),
            TimedEntity::interval(3, 12.0, 1.0, EntityKind::Subtitle, "bad"),
        ]);
        assert_eq!(feed.max_end(), Some(12.0));
    }
}
