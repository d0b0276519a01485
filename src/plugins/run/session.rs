//! Per-run state.

use bevy::prelude::*;

use crate::plugins::tutorial::TutorialProgress;

/// One gameplay attempt. Reset on every entry into `AppState::Game`.
#[derive(Resource, Debug, Default)]
pub struct RunSession {
    pub elapsed: f32,
    /// Set by a second wind; a rerun skips the continuation offer at its end.
    pub rerun: bool,
    pub finished: bool,
    /// Present while the run is a tutorial run.
    pub tutorial: Option<TutorialProgress>,
    /// Continuation already chosen for this game-over window.
    pub(crate) selection_done: bool,
    /// Pending settle delay between losing the last life and the end-of-run UI.
    pub(crate) game_over_delay: Option<Timer>,
}

impl RunSession {
    pub fn is_tutorial(&self) -> bool {
        self.tutorial.is_some()
    }

    pub fn game_over_pending(&self) -> bool {
        self.game_over_delay.is_some()
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PauseState {
    pub paused: bool,
    /// Track motion at the moment of the last pause.
    pub was_moving: bool,
}

/// Lifecycle phase of a run.
///
/// ```text
///   Running <──pause/resume──> Paused
///      │
///   last life lost
///      v
///   Finished ──second wind (once per game-over window)──> Running
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Paused,
    Finished,
}

impl RunPhase {
    pub fn of(session: &RunSession, pause: &PauseState) -> Self {
        if session.finished {
            RunPhase::Finished
        } else if pause.paused {
            RunPhase::Paused
        } else {
            RunPhase::Running
        }
    }
}
