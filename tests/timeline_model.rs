use dubline::controller::{TimelineInput, TimelineModel};
use dubline::coords::{fraction_to_time, time_to_fraction, Viewport};
use dubline::density::{aggregate, DensityMap};
use dubline::domain::ZoomBounds;
use dubline::entity::{EntityFeed, EntityKind, TimedEntity};
use dubline::markers::{project, project_feed, MarkerStyle, ProjectionOptions};
use dubline::region::RegionSelection;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn assert_window_inside(model: &TimelineModel) {
    let s = model.snapshot().domain;
    assert!(s.window_start >= -EPS, "window starts before 0: {s:?}");
    assert!(
        s.window_start + s.visible_window <= s.duration + EPS,
        "window ends past duration: {s:?}"
    );
}

#[test]
fn seek_always_clamps_playhead() {
    let mut model = TimelineModel::new(120.0, ZoomBounds::default());
    for t in [-50.0, -0.0, 0.0, 33.3, 119.99, 120.0, 121.0, 1e12, f64::INFINITY, f64::NEG_INFINITY] {
        model.apply(TimelineInput::Seek(t));
        assert_eq!(model.domain().current_time(), t.clamp(0.0, 120.0));
        assert_window_inside(&model);
    }
}

#[test]
fn window_stays_inside_track_under_mixed_inputs() {
    let mut model = TimelineModel::new(300.0, ZoomBounds::default());
    let inputs = [
        TimelineInput::SetZoom(4.0),
        TimelineInput::Seek(290.0),
        TimelineInput::PanWindow(500.0),
        TimelineInput::SetZoom(0.5),
        TimelineInput::PanWindow(-1_000.0),
        TimelineInput::ZoomBy { factor: 3.0, anchor: 299.0 },
        TimelineInput::Seek(1.0),
        TimelineInput::ZoomAround { level: 2.5, anchor: 150.0 },
        TimelineInput::ScrollTo(10_000.0),
        TimelineInput::SetVisibleWindow(12.0),
        TimelineInput::ZoomToRange(280.0, 400.0),
        TimelineInput::SetDuration(90.0),
        TimelineInput::PanWindow(33.0),
    ];
    for input in inputs {
        model.apply(input);
        assert_window_inside(&model);
    }
}

#[test]
fn round_trip_mapping_inside_window() {
    for (ws, vw) in [(0.0, 120.0), (12.5, 30.0), (100.0, 0.5), (3.0, 1.0 / 24.0)] {
        for step in 0..=10 {
            let t = ws + vw * step as f64 / 10.0;
            let back = fraction_to_time(time_to_fraction(t, ws, vw), ws, vw);
            assert!(approx(back, t), "{t} -> {back} in {ws}+{vw}");
        }
    }
}

#[test]
fn single_interval_density_scenario() {
    let entities = [TimedEntity::interval(1, 20.0, 50.0, EntityKind::Subtitle, "line")];
    let buckets = aggregate(&entities[..], 120.0, 4);
    let coverage: Vec<f64> = buckets.iter().map(|b| b.coverage).collect();
    assert_eq!(coverage.len(), 4);
    assert!(approx(coverage[0], 10.0 / 30.0));
    assert!(approx(coverage[1], 20.0 / 30.0));
    assert_eq!(coverage[2], 0.0);
    assert_eq!(coverage[3], 0.0);
}

#[test]
fn coverage_is_bounded_with_full_overlap() {
    let entities: Vec<TimedEntity> = (0..8)
        .map(|id| TimedEntity::interval(id, 0.0, 60.0, EntityKind::Subtitle, "dup"))
        .collect();
    let feed = EntityFeed::new(entities);
    for bucket in aggregate(&feed, 60.0, 6) {
        assert!((0.0..=1.0).contains(&bucket.coverage));
        assert!(approx(bucket.stacked, 8.0));
    }
}

#[test]
fn density_ignores_viewport() {
    let feed = EntityFeed::new(vec![
        TimedEntity::interval(1, 5.0, 25.0, EntityKind::Subtitle, "a"),
        TimedEntity::point(2, 70.0, EntityKind::Issue, "b"),
    ]);
    let mut model = TimelineModel::new(100.0, ZoomBounds::default());
    let mut map = DensityMap::new();

    assert!(map.refresh(&[&feed], model.domain().duration(), 10));
    let before = map.buckets().to_vec();

    model.apply(TimelineInput::SetZoom(4.0));
    model.apply(TimelineInput::Seek(80.0));
    assert!(!map.refresh(&[&feed], model.domain().duration(), 10));
    assert_eq!(map.buckets(), &before[..]);
    assert_eq!(aggregate(&feed, 100.0, 10), before);
}

#[test]
fn selection_state_machine() {
    let mut model = TimelineModel::new(120.0, ZoomBounds::default());
    model.apply(TimelineInput::ClearRegion);
    model.apply(TimelineInput::ToggleRegionPoint(5.0));
    model.apply(TimelineInput::ToggleRegionPoint(3.0));
    assert_eq!(model.region(), RegionSelection::Bounded { start: 5.0, end: 3.0 });
    model.apply(TimelineInput::ClearRegion);
    assert_eq!(model.region(), RegionSelection::Empty);
}

#[test]
fn zero_duration_is_inert() {
    let mut model = TimelineModel::new(0.0, ZoomBounds::default());
    model.apply(TimelineInput::Seek(10.0));
    model.apply(TimelineInput::SetZoom(2.0));
    model.apply(TimelineInput::PanWindow(5.0));
    let snapshot = model.snapshot().domain;
    assert_eq!(snapshot.current_time, 0.0);
    assert_eq!(snapshot.visible_window, 0.0);

    let entities = vec![TimedEntity::point(1, 0.0, EntityKind::Issue, "x")];
    let buckets = aggregate(&entities[..], 0.0, 4);
    assert_eq!(buckets.len(), 4);
    assert!(buckets.iter().all(|b| b.coverage == 0.0));

    let feed = EntityFeed::new(entities);
    let options = ProjectionOptions::default().with_style(MarkerStyle::Pill);
    assert!(project_feed(&feed, snapshot.viewport(), options).is_empty());
    assert!(project(feed.entities(), Viewport::overview(0.0), options).is_empty());
}

#[test]
fn markers_follow_the_shared_window() {
    let feed = EntityFeed::new(vec![
        TimedEntity::point(1, 10.0, EntityKind::Issue, "early"),
        TimedEntity::point(2, 60.0, EntityKind::Issue, "middle"),
        TimedEntity::point(3, 110.0, EntityKind::Issue, "late"),
    ]);
    let mut model = TimelineModel::new(120.0, ZoomBounds::default());
    model.apply(TimelineInput::ZoomToRange(50.0, 70.0));

    let viewport = model.snapshot().domain.viewport();
    let projections = project_feed(&feed, viewport, ProjectionOptions::default());
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].entity_id, 2);
    assert!(approx(projections[0].screen_fraction, 0.5));
}
