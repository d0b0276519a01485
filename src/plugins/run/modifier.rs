//! Run-end policy hook.
//!
//! A modifier is picked on the loadout screen and handed to the next run. It sees the run at
//! start, on every tick while running, and once at the end. `on_run_end` returning false
//! means the modifier already substituted its own terminal behaviour and the standard
//! end-of-run UI must not be shown.

use bevy::prelude::*;

use super::RunSession;
use crate::plugins::character::CharacterState;

pub trait RunModifier: Send + Sync + 'static {
    fn on_run_start(&mut self, _session: &mut RunSession) {}

    fn on_run_tick(&mut self, _session: &mut RunSession, _character: &mut CharacterState) {}

    fn on_run_end(&mut self, _session: &RunSession) -> bool {
        true
    }
}

/// No-op policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRun;

impl RunModifier for StandardRun {}

/// Policy driving the current run.
#[derive(Resource)]
pub struct ActiveModifier(pub Box<dyn RunModifier>);

impl Default for ActiveModifier {
    fn default() -> Self {
        Self(Box::new(StandardRun))
    }
}

/// Policy selected for the next run.
#[derive(Resource)]
pub struct PendingModifier(Box<dyn RunModifier>);

impl Default for PendingModifier {
    fn default() -> Self {
        Self(Box::new(StandardRun))
    }
}

impl PendingModifier {
    pub fn set(&mut self, modifier: impl RunModifier) {
        self.0 = Box::new(modifier);
    }

    /// Take the selected policy, leaving the standard one for the run after.
    pub fn take(&mut self) -> Box<dyn RunModifier> {
        std::mem::replace(&mut self.0, Box::new(StandardRun))
    }
}

/// `OnTransition { Loadout -> Game }`: the run starts with the policy picked on the loadout.
pub fn hand_over_modifier(mut pending: ResMut<PendingModifier>, mut active: ResMut<ActiveModifier>) {
    active.0 = pending.take();
}
