//! Global state machine.
//!
//! Screens form a small closed set. Anything that wants to change screen writes a
//! `StateRequest`; `apply_state_requests` validates it against the transition table and
//! forwards it to `NextState`. Requests are fire-and-forget.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum AppState {
    /// Title screen with the start button.
    #[default]
    Start,
    /// Character and theme selection.
    Loadout,
    /// A run is in progress.
    Game,
    /// End-of-run summary.
    GameOver,
}

impl AppState {
    pub fn name(self) -> &'static str {
        match self {
            AppState::Start => "Start",
            AppState::Loadout => "Loadout",
            AppState::Game => "Game",
            AppState::GameOver => "GameOver",
        }
    }

    /// Transition table.
    pub fn can_switch_to(self, to: AppState) -> bool {
        use AppState::*;
        matches!(
            (self, to),
            (Start, Loadout)
                | (Loadout, Game)
                | (Game, Loadout)
                | (Game, GameOver)
                | (GameOver, Game)
                | (GameOver, Loadout)
        )
    }
}

/// Request to switch screen.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateRequest(pub AppState);

/// Apply at most one valid request per frame; the first one wins.
pub fn apply_state_requests(
    mut requests: MessageReader<StateRequest>,
    current: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    let from = *current.get();
    let mut accepted: Option<AppState> = None;

    for StateRequest(to) in requests.read().copied() {
        if let Some(first) = accepted {
            debug!("state request {} ignored, {} already accepted", to.name(), first.name());
            continue;
        }
        if !from.can_switch_to(to) {
            warn!("rejected state switch {} -> {}", from.name(), to.name());
            continue;
        }
        info!("switching state {} -> {}", from.name(), to.name());
        next.set(to);
        accepted = Some(to);
    }
}
