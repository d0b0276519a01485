//! Title screen. One button: press start, go to the loadout.

use bevy::prelude::*;

use crate::common::state::{AppState, StateRequest};
use crate::plugins::profile::{PlayerProfile, ProfileStore};

#[derive(Message, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartPressed;

pub fn plugin(app: &mut App) {
    app.add_message::<StartPressed>().add_systems(
        Update,
        press_start.run_if(in_state(AppState::Start)),
    );
}

pub fn register_input(app: &mut App) {
    app.add_systems(
        Update,
        gather_start_input
            .before(press_start)
            .run_if(in_state(AppState::Start)),
    );
}

pub fn press_start(
    mut pressed: MessageReader<StartPressed>,
    mut profile: ResMut<PlayerProfile>,
    store: Res<ProfileStore>,
    mut requests: MessageWriter<StateRequest>,
) {
    if pressed.read().count() == 0 {
        return;
    }

    if profile.ftue_level == 0 {
        profile.ftue_level = 1;
        store.save_or_warn(&profile);
    }
    requests.write(StateRequest(AppState::Loadout));
}

fn gather_start_input(keys: Res<ButtonInput<KeyCode>>, mut out: MessageWriter<StartPressed>) {
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        out.write(StartPressed);
    }
}
