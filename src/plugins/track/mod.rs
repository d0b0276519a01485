//! Track plugin: segment generation, scrolling, zones and obstacle colliders.
//!
//! ```text
//!   TrackManager (resource, single writer: advance_track + run lifecycle)
//!     segments: [current, ahead.., ahead]     front = segment the runner is in
//!     pending:  TrackEvent queue              drained once per frame
//!
//!   Update:
//!     advance_track ── writes ──> SegmentCreated / SegmentChanged
//!         │                         │
//!         │                         ├─> tutorial::on_segment_messages
//!         │                         └─> spawn_segment_obstacles
//!         v
//!     despawn_passed_obstacles (segment no longer generated)
//! ```
//!
//! Zones are thematic segment groups. New segments are always generated from the current
//! zone, so a zone change only becomes visible once the pre-generated segments are used up.

use std::collections::VecDeque;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::{layers::Layer, state::AppState, tunables::{TrackTunables, Tunables}};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSpec {
    /// Normalized position inside the segment.
    pub position: f32,
    /// -1, 0 or 1.
    pub lane: i8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackSegment {
    pub id: SegmentId,
    pub zone: usize,
    /// World distance at which the segment starts.
    pub start: f32,
    pub length: f32,
    pub obstacles: Vec<ObstacleSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackEvent {
    Created { id: SegmentId, zone: usize },
    Changed { id: SegmentId },
}

/// A segment was generated ahead of the runner.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentCreated {
    pub id: SegmentId,
    pub zone: usize,
}

/// The runner entered a new segment.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentChanged {
    pub id: SegmentId,
}

/// What the tutorial tracker needs from the environment generator.
pub trait TrackProbe {
    fn has_segments(&self) -> bool;
    /// Distance travelled in the current segment over its length.
    fn travel_ratio(&self) -> f32;
    /// Normalized position of the `index`-th obstacle of the current segment.
    fn obstacle_position(&self, index: usize) -> Option<f32>;
    fn current_zone(&self) -> usize;
    /// Move to the next zone and return its index.
    fn change_zone(&mut self) -> usize;
}

#[derive(Resource, Debug)]
pub struct TrackManager {
    config: TrackTunables,
    segments: VecDeque<TrackSegment>,
    pending: Vec<TrackEvent>,
    next_id: u64,
    next_start: f32,
    current_zone: usize,
    world_distance: f32,
    segment_distance: f32,
    score: f32,
    multiplier: u32,
    moving: bool,
    loaded: bool,
    time_to_start: f32,
    pub is_tutorial: bool,
}

impl TrackManager {
    pub fn new(config: TrackTunables) -> Self {
        Self {
            config,
            segments: VecDeque::new(),
            pending: Vec::new(),
            next_id: 0,
            next_start: 0.0,
            current_zone: 0,
            world_distance: 0.0,
            segment_distance: 0.0,
            score: 0.0,
            multiplier: 1,
            moving: false,
            loaded: false,
            time_to_start: -1.0,
            is_tutorial: false,
        }
    }

    /// Prepare the track for a run. On a rerun the generated segments are kept and only the
    /// countdown restarts.
    pub fn begin(&mut self) {
        if self.segments.is_empty() {
            self.fill_ahead();
            if let Some(first) = self.segments.front() {
                self.pending.push(TrackEvent::Changed { id: first.id });
            }
        }
        self.loaded = true;
        self.moving = false;
        self.time_to_start = self.config.countdown;
    }

    /// Tear everything down; the next `begin` starts from zone 0.
    pub fn end(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }

    pub fn start_move(&mut self) {
        if self.loaded {
            self.moving = true;
        }
    }

    pub fn stop_move(&mut self) {
        self.moving = false;
    }

    /// Stop and drop any pending countdown so nothing restarts the motion.
    pub fn halt(&mut self) {
        self.moving = false;
        self.time_to_start = -1.0;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn speed(&self) -> f32 {
        self.config.speed
    }

    pub fn lane_width(&self) -> f32 {
        self.config.lane_width
    }

    pub fn world_distance(&self) -> f32 {
        self.world_distance
    }

    pub fn score(&self) -> u64 {
        self.score as u64
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Seconds left before the runner starts moving, negative once started.
    pub fn time_to_start(&self) -> f32 {
        self.time_to_start
    }

    pub fn current_segment(&self) -> Option<&TrackSegment> {
        self.segments.front()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&TrackSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn segments(&self) -> impl Iterator<Item = &TrackSegment> {
        self.segments.iter()
    }

    pub fn drain_events(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Countdown, then scroll. Crossing a segment boundary recycles the passed segment.
    pub fn advance(&mut self, dt: f32) {
        if !self.loaded {
            return;
        }

        if self.time_to_start >= 0.0 {
            self.time_to_start -= dt;
            if self.time_to_start < 0.0 {
                self.start_move();
            }
            return;
        }

        if !self.moving {
            return;
        }

        let d = self.config.speed * dt;
        self.world_distance += d;
        self.segment_distance += d;
        self.score += d * self.multiplier as f32;

        while let Some(current) = self.segments.front() {
            if self.segment_distance < current.length {
                break;
            }
            self.segment_distance -= current.length;
            self.segments.pop_front();
            self.fill_ahead();
            if let Some(next) = self.segments.front() {
                self.pending.push(TrackEvent::Changed { id: next.id });
            }
        }
    }

    fn fill_ahead(&mut self) {
        let target = self.config.segments_ahead.max(1);
        while self.segments.len() < target {
            let segment = self.generate_segment();
            self.pending.push(TrackEvent::Created {
                id: segment.id,
                zone: segment.zone,
            });
            self.segments.push_back(segment);
        }
    }

    fn generate_segment(&mut self) -> TrackSegment {
        let id = SegmentId(self.next_id);
        self.next_id += 1;

        let obstacles = self
            .config
            .obstacle_layout
            .iter()
            .enumerate()
            .map(|(i, &position)| ObstacleSpec {
                position,
                lane: ((id.0 as usize + i) % 3) as i8 - 1,
            })
            .collect();

        let length = self.config.segment_length;
        let start = self.next_start;
        self.next_start += length;

        TrackSegment {
            id,
            zone: self.current_zone,
            start,
            length,
            obstacles,
        }
    }
}

impl TrackProbe for TrackManager {
    fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    fn travel_ratio(&self) -> f32 {
        match self.segments.front() {
            Some(s) if s.length > 0.0 => self.segment_distance / s.length,
            _ => 0.0,
        }
    }

    fn obstacle_position(&self, index: usize) -> Option<f32> {
        self.segments
            .front()
            .and_then(|s| s.obstacles.get(index))
            .map(|o| o.position)
    }

    fn current_zone(&self) -> usize {
        self.current_zone
    }

    fn change_zone(&mut self) -> usize {
        self.current_zone = (self.current_zone + 1) % self.config.zone_count.max(1);
        info!("track zone -> {}", self.current_zone);
        self.current_zone
    }
}

/// Obstacle collider, tagged with the segment that owns it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Obstacle {
    pub segment: SegmentId,
}

pub fn plugin(app: &mut App) {
    let config = app.world().resource::<Tunables>().track.clone();
    app.insert_resource(TrackManager::new(config))
        .add_message::<SegmentCreated>()
        .add_message::<SegmentChanged>()
        .add_systems(OnExit(AppState::Game), end_track)
        .add_systems(
            Update,
            (advance_track, spawn_segment_obstacles, despawn_passed_obstacles)
                .chain()
                .in_set(TrackSystems)
                .run_if(in_state(AppState::Game)),
        );
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackSystems;

/// Scroll on virtual time (frozen while paused) and publish segment events.
pub fn advance_track(
    time: Res<Time<Virtual>>,
    mut track: ResMut<TrackManager>,
    mut created: MessageWriter<SegmentCreated>,
    mut changed: MessageWriter<SegmentChanged>,
) {
    track.advance(time.delta_secs());

    for ev in track.drain_events() {
        match ev {
            TrackEvent::Created { id, zone } => {
                created.write(SegmentCreated { id, zone });
            }
            TrackEvent::Changed { id } => {
                changed.write(SegmentChanged { id });
            }
        }
    }
}

fn end_track(mut track: ResMut<TrackManager>) {
    track.end();
}

fn spawn_segment_obstacles(
    mut commands: Commands,
    mut created: MessageReader<SegmentCreated>,
    track: Res<TrackManager>,
    tunables: Res<Tunables>,
) {
    let ppm = tunables.pixels_per_meter;
    let layers = CollisionLayers::new(Layer::Obstacle, [Layer::Runner]);

    for ev in created.read() {
        let Some(segment) = track.segment(ev.id) else {
            continue;
        };

        for (i, o) in segment.obstacles.iter().enumerate() {
            let x = (segment.start + o.position * segment.length) * ppm;
            let y = o.lane as f32 * track.lane_width() * ppm;

            commands.spawn((
                Name::new(format!("Obstacle{}_{i}", segment.id.0)),
                Obstacle { segment: segment.id },
                Sprite {
                    color: Color::srgb(0.85, 0.35, 0.2),
                    custom_size: Some(Vec2::splat(0.8 * ppm)),
                    ..default()
                },
                Transform::from_xyz(x, y, 1.0),
                RigidBody::Static,
                Collider::rectangle(0.8 * ppm, 0.8 * ppm),
                Sensor,
                layers,
                Occluder2d::circle(0.4 * ppm),
                DespawnOnExit(AppState::Game),
            ));
        }
    }
}

fn despawn_passed_obstacles(
    mut commands: Commands,
    track: Res<TrackManager>,
    q: Query<(Entity, &Obstacle)>,
) {
    for (e, o) in &q {
        if track.segment(o.segment).is_none() {
            commands.entity(e).despawn();
        }
    }
}

#[cfg(test)]
mod tests;
