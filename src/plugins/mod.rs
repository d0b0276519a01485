//! Feature plugins.

use bevy::prelude::*;

pub mod character;
pub mod core;
pub mod hud;
pub mod loadout;
pub mod physics;
pub mod profile;
pub mod run;
pub mod start;
pub mod track;
pub mod tutorial;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: the others read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    profile::plugin(app);
    hud::plugin(app);
    track::plugin(app);
    character::plugin(app);
    tutorial::plugin(app);
    run::plugin(app);
    loadout::plugin(app);
    start::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    hud::view::plugin(app);
}

/// Keyboard and window input (full app only; tests write messages directly).
pub fn register_input(app: &mut App) {
    start::register_input(app);
    loadout::register_input(app);
    character::register_input(app);
    run::register_input(app);
}
