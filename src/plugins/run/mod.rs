//! Run controller: lifecycle of one gameplay attempt.
//!
//! # Frame order (Update, `AppState::Game`)
//! ```text
//!   apply_run_commands        pause / resume / continue / quit, one at a time
//!        │
//!   TrackSystems              scroll, segment messages, obstacle colliders
//!        │
//!   tutorial hooks            segment created / changed
//!        │
//!   tick_run                  elapsed time, tutorial tracker, HUD mirror, policy tick,
//!        │                    life check
//!   advance_game_over         settle delay poll
//! ```
//!
//! Everything that mutates the run goes through `RunContext`, so there is a single writer
//! per frame and no two transitions ever interleave.

use bevy::prelude::*;
use bevy::window::WindowFocused;

use crate::common::state::{AppState, StateRequest};
use crate::plugins::track::TrackSystems;
use crate::plugins::tutorial;

pub mod context;
pub mod modifier;
pub mod session;

pub use context::RunContext;
pub use modifier::{ActiveModifier, PendingModifier, RunModifier, StandardRun};
pub use session::{PauseState, RunPhase, RunSession};

/// Lifecycle requests from UI and input.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunCommand {
    Pause { display_menu: bool },
    Resume,
    QuitToLoadout,
    /// Buy a second wind with premium currency.
    PremiumForLife,
    /// Second wind from the reward path.
    RewardedContinue,
    /// Decline the continuation offer.
    GameOver,
    FinishTutorial,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunSystems {
    Commands,
    Tick,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<RunSession>()
        .init_resource::<PauseState>()
        .init_resource::<ActiveModifier>()
        .init_resource::<PendingModifier>()
        .add_message::<RunCommand>()
        .add_systems(OnEnter(AppState::Game), enter_game)
        .add_systems(OnExit(AppState::Game), exit_game)
        .add_systems(OnEnter(AppState::GameOver), enter_game_over)
        .configure_sets(
            Update,
            (RunSystems::Commands, TrackSystems, RunSystems::Tick).chain(),
        )
        .add_systems(
            Update,
            apply_run_commands
                .in_set(RunSystems::Commands)
                .run_if(in_state(AppState::Game)),
        )
        .add_systems(
            Update,
            (tick_run, advance_game_over)
                .chain()
                .in_set(RunSystems::Tick)
                .after(tutorial::on_segment_messages)
                .run_if(in_state(AppState::Game)),
        );
}

/// Keyboard and window-focus mapping (full app only).
pub fn register_input(app: &mut App) {
    app.add_systems(
        Update,
        (gather_run_input, pause_on_focus_loss)
            .before(RunSystems::Commands)
            .run_if(in_state(AppState::Game)),
    )
    .add_systems(
        Update,
        gather_game_over_input.run_if(in_state(AppState::GameOver)),
    );
}

fn enter_game(mut ctx: RunContext) {
    *ctx.session = RunSession::default();
    *ctx.pause = PauseState::default();
    ctx.start_game();
}

fn exit_game(mut ctx: RunContext) {
    ctx.hud.canvas_visible = false;
    ctx.time.unpause();
    *ctx.pause = PauseState::default();
}

/// Flush the profile before showing the summary.
fn enter_game_over(mut ctx: RunContext) {
    ctx.track.end();
    ctx.store.save_or_warn(&ctx.profile);
}

pub fn apply_run_commands(mut commands: MessageReader<RunCommand>, mut ctx: RunContext) {
    for cmd in commands.read().copied() {
        let result = match cmd {
            RunCommand::Pause { display_menu } => ctx.pause(display_menu),
            RunCommand::Resume => ctx.resume(),
            RunCommand::PremiumForLife => ctx.premium_for_life(),
            RunCommand::RewardedContinue => ctx.rewarded_continue(),
            RunCommand::QuitToLoadout => {
                ctx.quit_to_loadout();
                Ok(())
            }
            RunCommand::GameOver => {
                ctx.game_over();
                Ok(())
            }
            RunCommand::FinishTutorial => ctx.finish_tutorial(),
        };
        if let Err(e) = result {
            debug!("{cmd:?} ignored: {e}");
        }
    }
}

pub fn tick_run(mut ctx: RunContext) {
    if ctx.session.finished || !ctx.track.is_loaded() {
        return;
    }

    ctx.session.elapsed += ctx.time.delta_secs();

    if ctx.session.is_tutorial() {
        ctx.tick_tutorial();
    }

    ctx.hud.mirror(&ctx.character, &ctx.track);
    ctx.modifier.0.on_run_tick(&mut ctx.session, &mut ctx.character);

    if ctx.character.current_life == 0 {
        ctx.begin_game_over();
    }
}

pub fn advance_game_over(mut ctx: RunContext) {
    ctx.poll_game_over();
}

fn gather_run_input(
    keys: Res<ButtonInput<KeyCode>>,
    pause: Res<PauseState>,
    hud: Res<crate::plugins::hud::Hud>,
    mut out: MessageWriter<RunCommand>,
) {
    if keys.just_pressed(KeyCode::Escape) && hud.visible_hint().is_none() {
        out.write(if pause.paused {
            RunCommand::Resume
        } else {
            RunCommand::Pause { display_menu: true }
        });
    }
    if keys.just_pressed(KeyCode::KeyQ) && hud.pause_menu_visible {
        out.write(RunCommand::QuitToLoadout);
    }
    if hud.game_over_popup_visible {
        if keys.just_pressed(KeyCode::KeyC) && hud.premium_for_life_enabled {
            out.write(RunCommand::PremiumForLife);
        }
        if keys.just_pressed(KeyCode::KeyV) {
            out.write(RunCommand::RewardedContinue);
        }
        if keys.just_pressed(KeyCode::KeyN) {
            out.write(RunCommand::GameOver);
        }
    }
    if keys.just_pressed(KeyCode::KeyF)
        && hud.hint(crate::plugins::tutorial::TutorialStage::Finish)
    {
        out.write(RunCommand::FinishTutorial);
    }
}

fn gather_game_over_input(keys: Res<ButtonInput<KeyCode>>, mut out: MessageWriter<StateRequest>) {
    if keys.just_pressed(KeyCode::KeyR) {
        out.write(StateRequest(AppState::Game));
    } else if keys.just_pressed(KeyCode::Enter) {
        out.write(StateRequest(AppState::Loadout));
    }
}

fn pause_on_focus_loss(mut focus: MessageReader<WindowFocused>, mut out: MessageWriter<RunCommand>) {
    if focus.read().any(|ev| !ev.focused) {
        out.write(RunCommand::Pause { display_menu: true });
    }
}
