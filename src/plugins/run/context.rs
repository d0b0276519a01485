//! Run lifecycle operations.
//!
//! `RunContext` bundles every collaborator a lifecycle transition touches. All transitions
//! go through it, and Bevy runs at most one system holding it at a time, so pause, resume,
//! game over and second wind are strictly serialized.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::modifier::ActiveModifier;
use super::session::{PauseState, RunPhase, RunSession};
use crate::common::error::RunError;
use crate::common::state::{AppState, StateRequest};
use crate::common::tunables::Tunables;
use crate::plugins::character::CharacterState;
use crate::plugins::hud::Hud;
use crate::plugins::profile::{PlayerProfile, ProfileStore};
use crate::plugins::track::TrackManager;
use crate::plugins::tutorial::{TutorialProgress, TutorialSignal, TutorialStage};

#[derive(SystemParam)]
pub struct RunContext<'w> {
    pub session: ResMut<'w, RunSession>,
    pub pause: ResMut<'w, PauseState>,
    pub time: ResMut<'w, Time<Virtual>>,
    pub track: ResMut<'w, TrackManager>,
    pub character: ResMut<'w, CharacterState>,
    pub hud: ResMut<'w, Hud>,
    pub profile: ResMut<'w, PlayerProfile>,
    pub store: Res<'w, ProfileStore>,
    pub modifier: ResMut<'w, ActiveModifier>,
    pub tunables: Res<'w, Tunables>,
    pub requests: MessageWriter<'w, StateRequest>,
}

impl RunContext<'_> {
    pub fn phase(&self) -> RunPhase {
        RunPhase::of(&self.session, &self.pause)
    }

    /// (Re)start the run. Keeps elapsed time and lives on a rerun.
    pub fn start_game(&mut self) {
        let tutorial = !self.profile.tutorial_done;
        self.hud.reset_overlays(!tutorial);

        if !self.session.rerun {
            self.session.elapsed = 0.0;
            self.character.reset_for_run();
        }

        self.modifier.0.on_run_start(&mut self.session);

        self.track.is_tutorial = tutorial;
        if tutorial {
            let config = self.tunables.tutorial.clone();
            let progress = self
                .session
                .tutorial
                .get_or_insert_with(|| TutorialProgress::new(config));
            progress.rearm();
            self.hud.tutorial_label = Some(progress.label());
        } else {
            self.session.tutorial = None;
        }

        self.session.finished = false;
        self.session.game_over_delay = None;
        self.track.begin();
        info!(
            "run started (rerun: {}, tutorial: {})",
            self.session.rerun, tutorial
        );
    }

    /// Freeze time and the track. `display_menu` is false for tutorial hints.
    pub fn pause(&mut self, display_menu: bool) -> Result<(), RunError> {
        if self.session.finished {
            return Err(RunError::InvalidState("cannot pause a finished run"));
        }
        if self.pause.paused {
            return Err(RunError::InvalidState("run already paused"));
        }

        self.pause.paused = true;
        self.time.pause();

        self.hud.pause_button_visible = false;
        self.hud.pause_menu_visible = display_menu;
        self.hud.whole_ui_visible = false;

        self.pause.was_moving = self.track.is_moving();
        self.track.stop_move();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), RunError> {
        if !self.pause.paused {
            return Err(RunError::InvalidState("run is not paused"));
        }

        self.pause.paused = false;
        self.time.unpause();

        self.hud.pause_button_visible = !self.session.is_tutorial();
        self.hud.pause_menu_visible = false;
        self.hud.whole_ui_visible = true;

        // A run lost while paused stays halted.
        if self.pause.was_moving && !self.session.finished {
            self.track.start_move();
        }
        self.pause.was_moving = false;
        Ok(())
    }

    /// Last life lost: stop the track and start the settle delay.
    pub fn begin_game_over(&mut self) {
        if self.session.finished {
            return;
        }
        self.session.finished = true;
        self.track.halt();
        self.pause.was_moving = false;
        self.session.game_over_delay = Some(Timer::from_seconds(
            self.tunables.run.game_over_delay,
            TimerMode::Once,
        ));
        info!("run lost after {:.1}s", self.session.elapsed);
    }

    /// Poll the settle delay. Cancelled if the run is no longer finished.
    pub fn poll_game_over(&mut self) {
        if self.session.game_over_delay.is_none() {
            return;
        }
        if !self.session.finished {
            debug!("game-over delay cancelled: run revived");
            self.session.game_over_delay = None;
            return;
        }

        let dt = self.time.delta();
        let Some(timer) = self.session.game_over_delay.as_mut() else {
            return;
        };
        timer.tick(dt);
        if !timer.is_finished() {
            return;
        }
        self.session.game_over_delay = None;

        if !self.modifier.0.on_run_end(&self.session) {
            debug!("run-end policy replaced the end-of-run UI");
            return;
        }

        if self.session.rerun {
            self.requests.write(StateRequest(AppState::GameOver));
        } else {
            self.open_game_over_popup();
        }
    }

    pub fn open_game_over_popup(&mut self) {
        let cost = self.tunables.run.second_wind_cost;
        self.hud.premium_for_life_enabled = self.profile.premium >= cost;
        self.hud.premium_owned = self.profile.premium.to_string();
        self.hud.game_over_popup_visible = true;
    }

    /// Buy a second wind with premium currency. Only the first continuation of a game-over
    /// window counts; later ones are silently ignored.
    pub fn premium_for_life(&mut self) -> Result<(), RunError> {
        if self.session.selection_done {
            return Ok(());
        }
        self.check_can_continue()?;

        let cost = self.tunables.run.second_wind_cost;
        if self.profile.premium < cost {
            return Err(RunError::ResourceUnavailable(format!(
                "second wind costs {cost} premium, have {}",
                self.profile.premium
            )));
        }

        self.session.selection_done = true;
        self.profile.premium -= cost;
        // Premium picked up this run is already in the profile; only take back what the run has.
        let from_run = self.character.premium.min(cost);
        self.character.premium -= from_run;

        self.second_wind();
        Ok(())
    }

    /// Continuation granted by the alternate reward path: no charge, same guard.
    pub fn rewarded_continue(&mut self) -> Result<(), RunError> {
        if self.session.selection_done {
            return Ok(());
        }
        self.check_can_continue()?;
        self.session.selection_done = true;
        self.second_wind();
        Ok(())
    }

    fn check_can_continue(&self) -> Result<(), RunError> {
        if !self.session.finished {
            return Err(RunError::InvalidState("continuation offered only after game over"));
        }
        if self.session.rerun {
            return Err(RunError::InvalidState("second wind already used this run"));
        }
        Ok(())
    }

    pub fn second_wind(&mut self) {
        info!("second wind");
        self.character.current_life = 1;
        self.session.rerun = true;
        self.start_game();
    }

    /// Decline the continuation.
    pub fn game_over(&mut self) {
        self.requests.write(StateRequest(AppState::GameOver));
    }

    /// Abandon the run and go back to the loadout.
    pub fn quit_to_loadout(&mut self) {
        self.time.unpause();
        self.pause.paused = false;
        self.track.end();
        self.session.rerun = false;
        self.store.save_or_warn(&self.profile);
        self.requests.write(StateRequest(AppState::Loadout));
    }

    /// Persist tutorial completion and leave. Only valid once the lesson reached its finish
    /// stage.
    pub fn finish_tutorial(&mut self) -> Result<(), RunError> {
        let at_finish = self
            .session
            .tutorial
            .as_ref()
            .is_some_and(|p| p.stage() == TutorialStage::Finish);
        if !at_finish {
            return Err(RunError::InvalidState("tutorial has not reached its finish"));
        }
        self.profile.tutorial_done = true;
        self.store.save_or_warn(&self.profile);
        info!("tutorial completed");
        self.quit_to_loadout();
        Ok(())
    }

    /// Per-frame tutorial update, then apply its signals.
    pub fn tick_tutorial(&mut self) {
        let Some(mut progress) = self.session.tutorial.take() else {
            return;
        };

        let paused = self.pause.paused;
        let waiting = self.character.tutorial_waiting_for_validation;
        let signals = progress.tick(
            &mut *self.track,
            paused,
            waiting,
            &mut self.character.tutorial_hit_obstacle,
        );
        self.hud.tutorial_label = Some(progress.label());
        self.session.tutorial = Some(progress);

        for signal in signals {
            self.apply_tutorial_signal(signal);
        }
    }

    pub(super) fn apply_tutorial_signal(&mut self, signal: TutorialSignal) {
        match signal {
            TutorialSignal::ShowHint(stage) => {
                if let Err(e) = self.pause(false) {
                    debug!("hint pause skipped: {e}");
                }
                self.hud.set_hint(stage, true);
                self.character.tutorial_waiting_for_validation = true;
                if stage == TutorialStage::Finish {
                    self.character.stop_sliding();
                }
            }
            TutorialSignal::HideHint(stage) => {
                if let Err(e) = self.resume() {
                    debug!("hint resume skipped: {e}");
                }
                self.hud.set_hint(stage, false);
                self.character.tutorial_waiting_for_validation = false;
            }
            TutorialSignal::StagePassed { zone } => {
                info!("tutorial stage passed, zone {zone}");
            }
            TutorialSignal::Completed => {
                info!("tutorial looped all zones");
            }
        }
    }
}
