use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

fn config() -> TrackTunables {
    TrackTunables {
        speed: 10.0,
        segment_length: 40.0,
        segments_ahead: 3,
        zone_count: 3,
        countdown: 1.0,
        obstacle_layout: vec![0.25, 0.5, 0.75],
        lane_width: 1.5,
    }
}

fn started() -> TrackManager {
    let mut t = TrackManager::new(config());
    t.begin();
    t.drain_events();
    t.advance(1.5);
    assert!(t.is_moving());
    t
}

#[test]
fn begin_generates_ahead_and_counts_down() {
    let mut t = TrackManager::new(config());
    t.begin();

    let events = t.drain_events();
    let created = events
        .iter()
        .filter(|e| matches!(e, TrackEvent::Created { zone: 0, .. }))
        .count();
    assert_eq!(created, 3);
    assert!(events.contains(&TrackEvent::Changed { id: SegmentId(0) }));

    assert!(t.is_loaded());
    assert!(!t.is_moving());
    t.advance(0.5);
    assert!(!t.is_moving());
    assert!(t.time_to_start() > 0.0);
    t.advance(0.6);
    assert!(t.is_moving());
    assert!(t.time_to_start() < 0.0);
}

#[test]
fn ratio_and_obstacles_follow_current_segment() {
    let mut t = started();
    t.advance(1.0);
    assert!((t.travel_ratio() - 0.25).abs() < 1e-4);
    assert_eq!(t.obstacle_position(0), Some(0.25));
    assert_eq!(t.obstacle_position(3), None);
}

#[test]
fn crossing_boundary_recycles_segment() {
    let mut t = started();
    t.advance(4.5);

    assert_eq!(t.current_segment().map(|s| s.id), Some(SegmentId(1)));
    assert!((t.travel_ratio() - 5.0 / 40.0).abs() < 1e-4);
    assert_eq!(
        t.drain_events(),
        vec![
            TrackEvent::Created { id: SegmentId(3), zone: 0 },
            TrackEvent::Changed { id: SegmentId(1) },
        ]
    );
    assert_eq!(t.segments().count(), 3);
}

#[test]
fn stop_move_freezes_progress() {
    let mut t = started();
    t.stop_move();
    t.advance(10.0);
    assert_eq!(t.world_distance(), 0.0);
    t.start_move();
    t.advance(1.0);
    assert_eq!(t.world_distance(), 10.0);
}

#[test]
fn halt_during_countdown_never_starts() {
    let mut t = TrackManager::new(config());
    t.begin();
    t.advance(0.5);
    t.halt();
    t.advance(5.0);
    assert!(!t.is_moving());
    assert_eq!(t.world_distance(), 0.0);

    // A fresh begin counts down again.
    t.begin();
    t.advance(1.1);
    assert!(t.is_moving());
}

#[test]
fn zone_change_wraps_and_applies_to_new_segments() {
    let mut t = started();
    assert_eq!(t.change_zone(), 1);
    t.advance(4.0);
    let created_zone = t.drain_events().iter().find_map(|e| match e {
        TrackEvent::Created { zone, .. } => Some(*zone),
        _ => None,
    });
    assert_eq!(created_zone, Some(1));

    assert_eq!(t.change_zone(), 2);
    assert_eq!(t.change_zone(), 0);
}

#[test]
fn rerun_keeps_segments_end_resets() {
    let mut t = started();
    t.advance(5.0);
    t.change_zone();
    t.drain_events();

    t.begin();
    assert!(t.drain_events().is_empty());
    assert_eq!(t.current_zone(), 1);

    t.end();
    assert!(!t.has_segments());
    assert!(!t.is_loaded());
    assert_eq!(t.current_zone(), 0);
    assert_eq!(t.world_distance(), 0.0);
}

#[test]
fn obstacles_spawn_for_created_segments_and_despawn_when_passed() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<Messages<SegmentCreated>>();
    world.init_resource::<Messages<SegmentChanged>>();
    world.insert_resource(Time::<Virtual>::default());

    let mut track = TrackManager::new(config());
    track.begin();
    world.insert_resource(track);

    run_system_once(&mut world, advance_track);
    run_system_once(&mut world, spawn_segment_obstacles);
    assert_eq!(world.query::<&Obstacle>().iter(&world).count(), 9);

    // Jump straight past the first segment.
    {
        let mut t = world.resource_mut::<TrackManager>();
        t.advance(1.5);
        t.advance(4.5);
    }
    run_system_once(&mut world, despawn_passed_obstacles);
    let remaining = world
        .query::<&Obstacle>()
        .iter(&world)
        .filter(|o| o.segment == SegmentId(0))
        .count();
    assert_eq!(remaining, 0);
}
