//! Camera plugin (render-only).
//!
//! The camera lives for the whole app so the title and loadout screens have something to
//! draw through. During a run it eases toward the runner along the track axis only; lanes
//! stay centred.
//!
//! ```text
//! Startup:     spawn MainCamera
//! PostUpdate:  follow_runner (disjoint queries: Runner vs MainCamera)
//! OnExit(Game): snap back to the origin for the menus
//! ```

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::common::state::AppState;
use crate::plugins::character::Runner;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
    /// Runner sits this far left of the screen centre, in pixels.
    pub lead: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera)
        .add_systems(OnExit(AppState::Game), reset_camera)
        .add_systems(
            PostUpdate,
            follow_runner
                .before(TransformSystems::Propagate)
                .run_if(in_state(AppState::Game)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera {
            responsiveness: 8.0,
            lead: 300.0,
        },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}

fn follow_runner(
    time: Res<Time>,
    q_runner: Query<&Transform, (With<Runner>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Runner>>,
) {
    let Ok(tf_runner) = q_runner.single() else {
        return;
    };
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    let target = tf_runner.translation.x + cam.lead;
    let alpha = 1.0 - (-cam.responsiveness * time.delta_secs()).exp();
    tf_cam.translation.x += (target - tf_cam.translation.x) * alpha;
}

fn reset_camera(mut q_cam: Query<&mut Transform, With<MainCamera>>) {
    for mut tf in &mut q_cam {
        tf.translation.x = 0.0;
        tf.translation.y = 0.0;
    }
}
