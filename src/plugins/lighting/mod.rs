//! Runner headlight (Firefly, render-only). Obstacles carry `Occluder2d` and cast shadows
//! from it.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::AppState;
use crate::plugins::character::Runner;

#[derive(Component)]
pub struct Headlight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(AppState::Game), spawn_headlight)
        .add_systems(
            Update,
            follow_runner_light.run_if(in_state(AppState::Game)),
        );
}

fn spawn_headlight(mut commands: Commands) {
    commands.spawn((
        Name::new("Headlight"),
        Headlight,
        PointLight2d {
            color: Color::srgb(1.0, 0.92, 0.7),
            range: 600.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(AppState::Game),
    ));
}

fn follow_runner_light(
    q_runner: Query<&Transform, (With<Runner>, Without<Headlight>)>,
    mut q_light: Query<&mut Transform, (With<Headlight>, Without<Runner>)>,
) {
    let Ok(tf_runner) = q_runner.single() else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    // A little ahead of the runner, so obstacles throw shadows back at it.
    tf_light.translation.x = tf_runner.translation.x + 40.0;
    tf_light.translation.y = tf_runner.translation.y;
}
