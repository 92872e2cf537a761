//! Interval tree over entity spans, for feeds too large for a linear scan.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use intervaltree::{Element, IntervalTree};

use super::IntervalQuery;
use crate::entity::TimedEntity;

/// Tree keys are whole microseconds.
const TICKS_PER_SECOND: f64 = 1_000_000.0;

fn to_ticks(seconds: f64) -> i64 {
    (seconds * TICKS_PER_SECOND).floor() as i64
}

/// A key range that contains `[start, end]` even after rounding, so the tree
/// only ever over-reports candidates.
fn tick_range(start: f64, end: f64) -> Range<i64> {
    to_ticks(start)..to_ticks(end).saturating_add(1)
}

pub struct IntervalIndex {
    tree: IntervalTree<i64, usize>,
    entities: Arc<[TimedEntity]>,
}

impl fmt::Debug for IntervalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalIndex")
            .field("entities", &self.entities.len())
            .finish_non_exhaustive()
    }
}

impl IntervalIndex {
    pub fn build(entities: Arc<[TimedEntity]>) -> Self {
        let tree = entities
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.span.is_finite())
            .map(|(position, entity)| {
                let (start, end) = entity.span.bounds();
                Element {
                    range: tick_range(start, end),
                    value: position,
                }
            })
            .collect();
        Self { tree, entities }
    }

    pub fn entities(&self) -> &[TimedEntity] {
        &self.entities
    }

    /// Positions of entities that may touch `[start, end]`, in insertion order.
    pub fn candidates(&self, start: f64, end: f64) -> Vec<usize> {
        if start.is_nan() || end.is_nan() || end < start {
            return Vec::new();
        }
        let mut positions: Vec<usize> = self
            .tree
            .query(tick_range(start, end))
            .map(|element| element.value)
            .collect();
        positions.sort_unstable();
        positions
    }
}

impl IntervalQuery for IntervalIndex {
    fn visit_candidates(&self, start: f64, end: f64, visit: &mut dyn FnMut(&TimedEntity)) {
        for position in self.candidates(start, end) {
            visit(&self.entities[position]);
        }
    }
}
