//! End-to-end run lifecycle through messages only.

mod common;

use bevy::prelude::*;
use runner_game::common::state::AppState;
use runner_game::plugins::character::CharacterState;
use runner_game::plugins::hud::Hud;
use runner_game::plugins::loadout::LoadoutCommand;
use runner_game::plugins::profile::PlayerProfile;
use runner_game::plugins::run::{RunCommand, RunSession};
use runner_game::plugins::start::StartPressed;
use runner_game::plugins::track::TrackManager;

/// Veteran player in a fresh run, still in the countdown.
fn in_game() -> App {
    let mut app = common::app_headless();
    app.insert_resource(PlayerProfile {
        tutorial_done: true,
        premium: 5,
        ftue_level: 1,
        ..default()
    });
    common::step(&mut app, 1);

    common::send(&mut app, StartPressed);
    common::step(&mut app, 2);
    common::send(&mut app, LoadoutCommand::StartRun);
    assert_eq!(common::state(&app), AppState::Game);
    app
}

fn lose_last_life(app: &mut App) {
    app.world_mut().resource_mut::<CharacterState>().current_life = 0;
    common::step(app, 1);
    assert!(app.world().resource::<RunSession>().finished);
}

#[test]
fn first_real_run_bumps_ftue() {
    let app = in_game();
    assert_eq!(app.world().resource::<PlayerProfile>().ftue_level, 2);
    assert!(!app.world().resource::<RunSession>().is_tutorial());
}

#[test]
fn pause_then_quit_returns_to_loadout() {
    let mut app = in_game();

    common::send(&mut app, RunCommand::Pause { display_menu: true });
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
    assert!(app.world().resource::<Hud>().pause_menu_visible);

    common::send(&mut app, RunCommand::QuitToLoadout);
    assert_eq!(common::state(&app), AppState::Loadout);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    assert!(!app.world().resource::<TrackManager>().is_loaded());
}

#[test]
fn declined_continue_ends_on_summary() {
    let mut app = in_game();
    lose_last_life(&mut app);

    common::wait(&mut app, 2.0);
    assert!(app.world().resource::<Hud>().game_over_popup_visible);
    assert!(app.world().resource::<Hud>().premium_for_life_enabled);

    common::send(&mut app, RunCommand::GameOver);
    assert_eq!(common::state(&app), AppState::GameOver);

    common::request(&mut app, AppState::Loadout);
    assert_eq!(common::state(&app), AppState::Loadout);
}

#[test]
fn second_wind_then_second_loss_skips_offer() {
    let mut app = in_game();
    lose_last_life(&mut app);
    common::wait(&mut app, 2.0);

    common::send(&mut app, RunCommand::PremiumForLife);
    common::send(&mut app, RunCommand::PremiumForLife);
    assert_eq!(app.world().resource::<PlayerProfile>().premium, 2);
    assert_eq!(app.world().resource::<CharacterState>().current_life, 1);
    assert!(app.world().resource::<RunSession>().rerun);
    assert!(!app.world().resource::<Hud>().game_over_popup_visible);

    lose_last_life(&mut app);
    common::wait(&mut app, 2.0);
    assert_eq!(common::state(&app), AppState::GameOver);
}

#[test]
fn retry_from_summary_starts_fresh_run() {
    let mut app = in_game();
    lose_last_life(&mut app);
    common::wait(&mut app, 2.0);
    common::send(&mut app, RunCommand::GameOver);
    assert_eq!(common::state(&app), AppState::GameOver);

    common::request(&mut app, AppState::Game);
    assert_eq!(common::state(&app), AppState::Game);
    let session = app.world().resource::<RunSession>();
    assert!(!session.finished);
    assert!(!session.rerun);
    assert_eq!(app.world().resource::<CharacterState>().current_life, 3);
}
