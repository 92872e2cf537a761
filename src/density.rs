//! Fixed-resolution coverage histogram over the whole track.
//!
//! Density depends only on the entity list, the duration and the bucket
//! count. It never looks at the viewport, so pans, zooms and seeks leave the
//! cached output in [`DensityMap`] untouched.

pub mod index;

use log::trace;
use rayon::prelude::*;

use crate::entity::{EntityFeed, TimedEntity};

pub const DEFAULT_BAR_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DensityBucket {
    pub index: usize,
    /// Covered fraction of the bucket, clamped to `[0, 1]`.
    pub coverage: f64,
    /// Sum of per-entity overlap fractions before clamping.
    pub stacked: f64,
    pub has_flag: bool,
}

impl DensityBucket {
    fn empty(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

/// Source of entities for one bucket.
///
/// Implementations may report entities that do not actually touch the
/// queried range; the aggregator applies the exact intersection test, so a
/// linear scan and an interval tree yield identical buckets.
pub trait IntervalQuery {
    fn visit_candidates(&self, start: f64, end: f64, visit: &mut dyn FnMut(&TimedEntity));
}

impl IntervalQuery for [TimedEntity] {
    fn visit_candidates(&self, _start: f64, _end: f64, visit: &mut dyn FnMut(&TimedEntity)) {
        for entity in self {
            visit(entity);
        }
    }
}

impl IntervalQuery for EntityFeed {
    fn visit_candidates(&self, start: f64, end: f64, visit: &mut dyn FnMut(&TimedEntity)) {
        self.index().visit_candidates(start, end, visit);
    }
}

/// Several feeds aggregated into one histogram.
pub struct Combined<'a>(pub &'a [&'a EntityFeed]);

impl IntervalQuery for Combined<'_> {
    fn visit_candidates(&self, start: f64, end: f64, visit: &mut dyn FnMut(&TimedEntity)) {
        for feed in self.0 {
            feed.visit_candidates(start, end, visit);
        }
    }
}

/// Split `[0, duration]` into `bar_count` buckets and measure coverage.
///
/// Zero-length spans (points, malformed intervals) add no coverage but still
/// mark their bucket when flagged. A zero duration yields `bar_count` empty
/// buckets.
pub fn aggregate<Q>(source: &Q, duration: f64, bar_count: usize) -> Vec<DensityBucket>
where
    Q: IntervalQuery + Sync + ?Sized,
{
    if bar_count == 0 {
        return Vec::new();
    }
    if !(duration.is_finite() && duration > 0.0) {
        return (0..bar_count).map(DensityBucket::empty).collect();
    }

    let width = duration / bar_count as f64;
    (0..bar_count)
        .into_par_iter()
        .map(|index| {
            let is_last = index + 1 == bar_count;
            let bucket_start = index as f64 * width;
            let bucket_end = if is_last {
                duration
            } else {
                (index + 1) as f64 * width
            };
            measure_bucket(source, index, bucket_start, bucket_end, is_last)
        })
        .collect()
}

fn measure_bucket<Q>(
    source: &Q,
    index: usize,
    bucket_start: f64,
    bucket_end: f64,
    is_last: bool,
) -> DensityBucket
where
    Q: IntervalQuery + ?Sized,
{
    let width = bucket_end - bucket_start;
    let mut stacked = 0.0;
    let mut has_flag = false;

    source.visit_candidates(bucket_start, bucket_end, &mut |entity| {
        if !entity.span.is_finite() {
            return;
        }
        let (start, end) = entity.span.bounds();
        if end > start {
            if start < bucket_end && end > bucket_start {
                stacked += (bucket_end.min(end) - bucket_start.max(start)) / width;
                has_flag |= entity.is_flagged();
            }
        } else {
            let inside = start >= bucket_start
                && (start < bucket_end || (is_last && start <= bucket_end));
            if inside {
                has_flag |= entity.is_flagged();
            }
        }
    });

    DensityBucket {
        index,
        coverage: stacked.clamp(0.0, 1.0),
        stacked,
        has_flag,
    }
}

/// Buckets cached against the inputs that can change them.
#[derive(Debug, Clone, Default)]
pub struct DensityMap {
    key: Option<(Vec<u64>, u64, usize)>,
    buckets: Vec<DensityBucket>,
}

impl DensityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute if any feed revision, the duration or the bucket count
    /// changed since the last call. Returns whether buckets were rebuilt.
    pub fn refresh(&mut self, feeds: &[&EntityFeed], duration: f64, bar_count: usize) -> bool {
        let key = (
            feeds.iter().map(|feed| feed.revision()).collect::<Vec<_>>(),
            duration.to_bits(),
            bar_count,
        );
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.buckets = aggregate(&Combined(feeds), duration, bar_count);
        trace!(
            "density rebuilt: {} buckets over {duration}s from revisions {:?}",
            bar_count, key.0
        );
        self.key = Some(key);
        true
    }

    pub fn buckets(&self) -> &[DensityBucket] {
        &self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn subtitle(id: u64, start: f64, end: f64) -> TimedEntity {
        TimedEntity::interval(id, start, end, EntityKind::Subtitle, "line")
    }

    fn coverages(buckets: &[DensityBucket]) -> Vec<f64> {
        buckets.iter().map(|b| b.coverage).collect()
    }

    #[test]
    fn splits_interval_across_buckets() {
        let entities = [subtitle(1, 20.0, 50.0)];
        let buckets = aggregate(&entities[..], 120.0, 4);
        let expected = [1.0 / 3.0, 2.0 / 3.0, 0.0, 0.0];
        for (bucket, expected) in buckets.iter().zip(expected) {
            assert!((bucket.coverage - expected).abs() < 1e-9);
        }
        assert!(buckets.iter().all(|b| !b.has_flag));
    }

    #[test]
    fn overlapping_entities_stack_then_clamp() {
        let entities = [subtitle(1, 0.0, 10.0), subtitle(2, 0.0, 10.0)];
        let buckets = aggregate(&entities[..], 10.0, 2);
        assert_eq!(coverages(&buckets), vec![1.0, 1.0]);
        assert_eq!(buckets[0].stacked, 2.0);
    }

    #[test]
    fn touching_boundary_adds_nothing() {
        let entities = [subtitle(1, 30.0, 60.0).with_flag(true)];
        let buckets = aggregate(&entities[..], 120.0, 4);
        assert_eq!(coverages(&buckets), vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(
            buckets.iter().map(|b| b.has_flag).collect::<Vec<_>>(),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn points_flag_their_bucket_only() {
        let entities = [
            TimedEntity::point(1, 45.0, EntityKind::Issue, "drift"),
            TimedEntity::point(2, 120.0, EntityKind::Issue, "tail"),
            TimedEntity::point(3, 10.0, EntityKind::Annotation, "note"),
        ];
        let buckets = aggregate(&entities[..], 120.0, 4);
        assert_eq!(coverages(&buckets), vec![0.0; 4]);
        assert_eq!(
            buckets.iter().map(|b| b.has_flag).collect::<Vec<_>>(),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn malformed_interval_adds_no_coverage() {
        let entities = [subtitle(1, 50.0, 20.0)];
        let buckets = aggregate(&entities[..], 120.0, 4);
        assert_eq!(coverages(&buckets), vec![0.0; 4]);
    }

    #[test]
    fn zero_duration_yields_empty_buckets() {
        let entities = [subtitle(1, 0.0, 10.0)];
        let buckets = aggregate(&entities[..], 0.0, 100);
        assert_eq!(buckets.len(), 100);
        assert!(buckets.iter().all(|b| b.coverage == 0.0 && !b.has_flag));
        assert!(aggregate(&entities[..], 10.0, 0).is_empty());
    }

    #[test]
    fn index_matches_linear_scan() {
        let entities: Vec<TimedEntity> = (0..200)
            .map(|i| {
                let start = (i * 37 % 590) as f64 * 0.5;
                let entity = subtitle(i, start, start + (i % 7) as f64 * 1.3);
                entity.with_flag(i % 11 == 0)
            })
            .collect();
        let feed = EntityFeed::new(entities.clone());
        assert_eq!(
            aggregate(&entities[..], 300.0, 100),
            aggregate(&feed, 300.0, 100)
        );
    }

    #[test]
    fn density_map_rebuilds_only_on_input_change() {
        let mut feed = EntityFeed::new(vec![subtitle(1, 0.0, 30.0)]);
        let mut map = DensityMap::new();
        assert!(map.refresh(&[&feed], 120.0, 4));
        assert!(!map.refresh(&[&feed], 120.0, 4));
        assert!(map.refresh(&[&feed], 60.0, 4));
        feed.replace(vec![subtitle(2, 0.0, 60.0)]);
        assert!(map.refresh(&[&feed], 60.0, 4));
        assert_eq!(map.buckets()[1].coverage, 1.0);
    }
}
