//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - `runner_game::game::configure_headless` installs the gameplay plugins.
//! - Every update advances time by a fixed step so waits are deterministic.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use runner_game::common::state::{AppState, StateRequest};

pub const STEP: Duration = Duration::from_millis(100);

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so avian finds SceneSpawner.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));

    runner_game::game::configure_headless(&mut app);
    // `App::run` normally does this; avian registers its diagnostics resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Advance at least `secs` of virtual time.
pub fn wait(app: &mut App, secs: f32) {
    let frames = (secs / STEP.as_secs_f32()).ceil() as usize + 1;
    step(app, frames);
}

pub fn state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

/// Request a screen change and let the transition run.
pub fn request(app: &mut App, to: AppState) {
    app.world_mut().write_message(StateRequest(to));
    step(app, 2);
}

/// Write a message, then give the frame that reads it and the transition after it a chance
/// to run.
pub fn send<M: Message>(app: &mut App, msg: M) {
    app.world_mut().write_message(msg);
    step(app, 2);
}
