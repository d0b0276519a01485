//! Character plugin: runner entity, life/currency counters, obstacle hits, lesson actions.
//!
//! Pipeline:
//! - Update: apply `CharacterAction` messages (lane changes, jump/slide, tutorial validation)
//! - FixedUpdate: drive the runner along the track
//! - FixedPostUpdate: turn runner/obstacle `CollisionStart` messages into hits

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::AppState, tunables::Tunables};
use crate::plugins::run::{PauseState, RunSession};
use crate::plugins::track::{Obstacle, TrackManager};
use crate::plugins::tutorial::TutorialStage;

#[derive(Component)]
pub struct Runner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterAction {
    /// -1 left, 1 right.
    SlideSide(i8),
    Jump,
    Slide,
}

impl CharacterAction {
    /// Does this action demonstrate the lesson of `stage`?
    pub fn validates(self, stage: TutorialStage) -> bool {
        matches!(
            (self, stage),
            (CharacterAction::SlideSide(_), TutorialStage::SideSlide)
                | (CharacterAction::Jump, TutorialStage::UpSlide)
                | (CharacterAction::Slide, TutorialStage::DownSlide)
        )
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterInput(pub CharacterAction);

#[derive(Resource, Debug, Clone)]
pub struct CharacterState {
    pub current_life: u32,
    pub max_life: u32,
    pub coins: u32,
    pub premium: u32,
    /// Set on any obstacle hit; consumed by the tutorial tracker.
    pub tutorial_hit_obstacle: bool,
    /// A hint is up and waits for the player to perform its lesson.
    pub tutorial_waiting_for_validation: bool,
    pub lane: i8,
    sliding: Option<Timer>,
    invincible: Option<Timer>,
}

impl CharacterState {
    pub fn new(max_life: u32) -> Self {
        Self {
            current_life: max_life,
            max_life,
            coins: 0,
            premium: 0,
            tutorial_hit_obstacle: false,
            tutorial_waiting_for_validation: false,
            lane: 0,
            sliding: None,
            invincible: None,
        }
    }

    /// Fresh counters for a new (non-rerun) run.
    pub fn reset_for_run(&mut self) {
        *self = Self::new(self.max_life);
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding.is_some()
    }

    pub fn start_sliding(&mut self, seconds: f32) {
        self.sliding = Some(Timer::from_seconds(seconds, TimerMode::Once));
    }

    pub fn stop_sliding(&mut self) {
        self.sliding = None;
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible.is_some()
    }

    /// Lose a life unless still invincible from the previous hit. Returns true if a life was lost.
    pub fn take_hit(&mut self, invincibility: f32) -> bool {
        if self.is_invincible() || self.current_life == 0 {
            return false;
        }
        self.current_life -= 1;
        self.invincible = Some(Timer::from_seconds(invincibility, TimerMode::Once));
        true
    }

    pub fn tick_timers(&mut self, dt: std::time::Duration) {
        for slot in [&mut self.sliding, &mut self.invincible] {
            if let Some(t) = slot {
                t.tick(dt);
                if t.is_finished() {
                    *slot = None;
                }
            }
        }
    }
}

pub fn plugin(app: &mut App) {
    let max_life = app.world().resource::<Tunables>().run.max_lives;
    app.insert_resource(CharacterState::new(max_life))
        .add_message::<CharacterInput>()
        .add_systems(OnEnter(AppState::Game), spawn_runner)
        .add_systems(
            Update,
            (apply_character_input, tick_character_timers).run_if(in_state(AppState::Game)),
        )
        .add_systems(
            FixedUpdate,
            drive_runner.run_if(in_state(AppState::Game)),
        )
        .add_systems(
            FixedPostUpdate,
            process_obstacle_hits
                .after(CollisionEventSystems)
                .run_if(in_state(AppState::Game)),
        );
}

/// Keyboard mapping (full app only).
pub fn register_input(app: &mut App) {
    app.add_systems(Update, gather_input.run_if(in_state(AppState::Game)));
}

fn spawn_runner(mut commands: Commands, tunables: Res<Tunables>) {
    let ppm = tunables.pixels_per_meter;
    let layers = CollisionLayers::new(Layer::Runner, [Layer::Obstacle]);

    commands.spawn((
        Name::new("Runner"),
        Runner,
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(0.6 * ppm)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 2.0),
        // Dynamic so contacts against static obstacles are reported.
        RigidBody::Dynamic,
        LockedAxes::ROTATION_LOCKED,
        Collider::circle(0.3 * ppm),
        layers,
        LinearVelocity::ZERO,
        // Avian only emits CollisionStart if one side opts in.
        CollisionEventsEnabled,
        DespawnOnExit(AppState::Game),
    ));
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut out: MessageWriter<CharacterInput>) {
    let mut emit = |a| {
        out.write(CharacterInput(a));
    };
    if keys.any_just_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        emit(CharacterAction::SlideSide(-1));
    }
    if keys.any_just_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        emit(CharacterAction::SlideSide(1));
    }
    if keys.any_just_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
        emit(CharacterAction::Jump);
    }
    if keys.any_just_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        emit(CharacterAction::Slide);
    }
}

/// Apply actions. While paused only a matching lesson action gets through, and it clears
/// the validation wait.
fn apply_character_input(
    mut inputs: MessageReader<CharacterInput>,
    mut character: ResMut<CharacterState>,
    session: Res<RunSession>,
    pause: Res<PauseState>,
    tunables: Res<Tunables>,
) {
    let stage = session.tutorial.as_ref().map(|p| p.stage());

    for CharacterInput(action) in inputs.read().copied() {
        if session.finished {
            continue;
        }

        let validating = character.tutorial_waiting_for_validation
            && stage.is_some_and(|s| action.validates(s));

        if validating {
            debug!("tutorial lesson validated by {action:?}");
            character.tutorial_waiting_for_validation = false;
        } else if pause.paused {
            continue;
        }

        match action {
            CharacterAction::SlideSide(dir) => {
                character.lane = (character.lane + dir.signum()).clamp(-1, 1);
            }
            CharacterAction::Slide => character.start_sliding(tunables.run.slide_duration),
            CharacterAction::Jump => character.stop_sliding(),
        }
    }
}

fn tick_character_timers(time: Res<Time<Virtual>>, mut character: ResMut<CharacterState>) {
    character.tick_timers(time.delta());
}

fn drive_runner(
    tunables: Res<Tunables>,
    track: Res<TrackManager>,
    character: Res<CharacterState>,
    mut q_runner: Query<(&mut LinearVelocity, &mut Transform), With<Runner>>,
) {
    let Ok((mut vel, mut tf)) = q_runner.single_mut() else {
        return;
    };
    let ppm = tunables.pixels_per_meter;
    vel.0.x = if track.is_moving() { track.speed() * ppm } else { 0.0 };
    vel.0.y = 0.0;
    tf.translation.y = character.lane as f32 * track.lane_width() * ppm;
}

/// Runner/obstacle contacts. Tutorial runs only record the hit; normal runs also cost a life.
pub fn process_obstacle_hits(
    mut started: MessageReader<CollisionStart>,
    q_runner: Query<(), With<Runner>>,
    q_obstacles: Query<(), With<Obstacle>>,
    track: Res<TrackManager>,
    tunables: Res<Tunables>,
    mut character: ResMut<CharacterState>,
) {
    for ev in started.read() {
        let (a, b) = (ev.collider1, ev.collider2);
        let hit = (q_runner.contains(a) && q_obstacles.contains(b))
            || (q_runner.contains(b) && q_obstacles.contains(a));
        if !hit {
            continue;
        }

        character.tutorial_hit_obstacle = true;
        if track.is_tutorial {
            continue;
        }
        if character.take_hit(tunables.run.invincibility) {
            info!("runner hit, lives left: {}", character.current_life);
        }
    }
}
