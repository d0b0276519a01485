//! Render-only text overlay.
//!
//! One absolute-positioned UI text node, rewritten whenever the surface for the current
//! screen changes. Gameplay never reads back from here.

use bevy::prelude::*;

use super::Hud;
use crate::common::state::AppState;
use crate::plugins::loadout::LoadoutUi;
use crate::plugins::profile::PlayerProfile;

#[derive(Component)]
pub struct OverlayText;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_overlay)
        .add_systems(PostUpdate, sync_overlay);
}

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Overlay"),
        Text::new(String::new()),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.92, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(10.0),
            ..default()
        },
        OverlayText,
    ));
}

fn sync_overlay(
    state: Res<State<AppState>>,
    hud: Res<Hud>,
    loadout: Res<LoadoutUi>,
    profile: Res<PlayerProfile>,
    mut q_text: Query<&mut Text, With<OverlayText>>,
) {
    let Ok(mut text) = q_text.single_mut() else {
        return;
    };
    if !(state.is_changed() || hud.is_changed() || loadout.is_changed() || profile.is_changed()) {
        return;
    }

    let lines = match state.get() {
        AppState::Start => vec!["RUNNER".into(), "[Enter] start".into()],
        AppState::Loadout => loadout.lines(),
        AppState::Game => hud.lines(),
        AppState::GameOver => vec![
            format!("Run over  score {}", hud.score),
            format!("coins {}  premium {}", profile.coins, profile.premium),
            "[R] run again  [Enter] loadout".into(),
        ],
    };
    text.0 = lines.join("\n");
}
