//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: DefaultPlugins (window/render), input, on-disk profile + game plugins.
//! - `configure_headless`: gameplay only, for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::{AppState, StateRequest, apply_state_requests};
use crate::plugins;
use crate::plugins::profile::{DEFAULT_SAVE_PATH, ProfileStore};

#[cfg(target_os = "windows")]
use bevy::render::{
    RenderPlugin,
    settings::{Backends, PowerPreference, WgpuSettings},
};

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    let default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Runner".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    });

    // DX12 on the high-performance adapter; Vulkan is unreliable on some Windows drivers.
    #[cfg(target_os = "windows")]
    let default_plugins = default_plugins.set(RenderPlugin {
        render_creation: WgpuSettings {
            backends: Some(Backends::DX12),
            power_preference: PowerPreference::HighPerformance,
            ..default()
        }
        .into(),
        ..default()
    });

    app.add_plugins(default_plugins);

    // Must be in place before the profile plugin loads from it.
    app.insert_resource(ProfileStore::at(DEFAULT_SAVE_PATH));

    configure_game(app);
    plugins::register_render(app);
    plugins::register_input(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (Firefly/camera/overlay).
/// - The profile stays in memory unless a `ProfileStore` was inserted first.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<AppState>()
        .add_message::<StateRequest>()
        .add_systems(PostUpdate, apply_state_requests);
    plugins::register_gameplay(app);
}
