mod common;

use bevy::prelude::*;
use runner_game::common::state::AppState;
use runner_game::plugins::character::Runner;
use runner_game::plugins::loadout::{Catalog, LoadoutCommand, LoadoutUi};
use runner_game::plugins::profile::PlayerProfile;
use runner_game::plugins::run::RunSession;
use runner_game::plugins::start::StartPressed;
use runner_game::plugins::track::TrackManager;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();
    common::step(&mut app, 3);

    assert_eq!(common::state(&app), AppState::Start);
    assert!(app.world().resource::<Catalog>().is_loaded());
}

#[test]
fn invalid_request_is_rejected() {
    let mut app = common::app_headless();
    common::step(&mut app, 1);

    common::request(&mut app, AppState::Game);
    assert_eq!(common::state(&app), AppState::Start);
    assert!(app.world_mut().query::<&Runner>().iter(app.world()).next().is_none());
}

#[test]
fn first_launch_reaches_tutorial_run() {
    let mut app = common::app_headless();
    common::step(&mut app, 1);

    common::send(&mut app, StartPressed);
    assert_eq!(common::state(&app), AppState::Loadout);
    assert_eq!(app.world().resource::<PlayerProfile>().ftue_level, 1);

    common::step(&mut app, 3);
    {
        let ui = app.world().resource::<LoadoutUi>();
        assert!(ui.run_button_enabled);
        assert!(ui.tutorial_blocker_visible);
        assert_eq!(ui.character_name.as_deref(), Some("Trash Cat"));
        assert_eq!(ui.theme_name.as_deref(), Some("Day"));
    }

    common::send(&mut app, LoadoutCommand::StartRun);
    assert_eq!(common::state(&app), AppState::Game);
    // Tutorial not done yet: ftue stays at 1.
    assert_eq!(app.world().resource::<PlayerProfile>().ftue_level, 1);
    assert!(app.world().resource::<RunSession>().is_tutorial());
    assert!(app.world().resource::<TrackManager>().is_loaded());
    assert_eq!(
        app.world_mut().query::<&Runner>().iter(app.world()).count(),
        1
    );
}
