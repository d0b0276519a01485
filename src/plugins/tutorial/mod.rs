//! Tutorial progress tracker.
//!
//! A tutorial run does not change zone until the current lesson is validated: the player
//! has to get past `obstacles_to_clear` obstacles in a row without hitting them.
//!
//! ```text
//!   counting ──(cleared == required)──> zone change requested, waiting for gate
//!      ^                                      │
//!      │                 first segment generated in a non-initial zone = gate
//!      │                                      │
//!      └──────(runner enters the gate: stage += 1, hint armed)──────┘
//!
//!   zone wrapped back to 0 after a pass: stage = Finish, finish hint, no more increments
//! ```
//!
//! `TutorialProgress::tick` is pure: it reads the track through `TrackProbe` and returns
//! `TutorialSignal`s. The run controller turns those into pause/resume and overlay changes.

use bevy::prelude::*;

use crate::common::state::AppState;
use crate::common::tunables::TutorialTunables;
use crate::plugins::run::RunSession;
use crate::plugins::track::{SegmentChanged, SegmentCreated, SegmentId, TrackProbe, TrackSystems};

/// One lesson per stage, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TutorialStage {
    #[default]
    SideSlide,
    UpSlide,
    DownSlide,
    Finish,
}

impl TutorialStage {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Next stage; `Finish` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::SideSlide => Self::UpSlide,
            Self::UpSlide => Self::DownSlide,
            Self::DownSlide | Self::Finish => Self::Finish,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TutorialSignal {
    /// Pause without the menu and show this stage's hint.
    ShowHint(TutorialStage),
    /// Hide the hint and resume.
    HideHint(TutorialStage),
    /// Required obstacles cleared; the track moved to `zone`.
    StagePassed { zone: usize },
    /// The zone wrapped around: the tutorial is over.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialProgress {
    config: TutorialTunables,
    cleared: u32,
    stage: TutorialStage,
    counting: bool,
    display: bool,
    hint_visible: bool,
    obstacle_cursor: usize,
    gate: Option<SegmentId>,
    completed: bool,
}

impl TutorialProgress {
    pub fn new(config: TutorialTunables) -> Self {
        Self {
            config,
            cleared: 0,
            stage: TutorialStage::SideSlide,
            counting: true,
            display: true,
            hint_visible: false,
            obstacle_cursor: 0,
            gate: None,
            completed: false,
        }
    }

    pub fn cleared(&self) -> u32 {
        self.cleared
    }

    pub fn required(&self) -> u32 {
        self.config.obstacles_to_clear
    }

    pub fn stage(&self) -> TutorialStage {
        self.stage
    }

    pub fn is_counting(&self) -> bool {
        self.counting
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn gate(&self) -> Option<SegmentId> {
        self.gate
    }

    /// Counter shown on the HUD.
    pub fn label(&self) -> String {
        if self.counting {
            format!("{}/{}", self.cleared, self.config.obstacles_to_clear)
        } else {
            "Passed!".into()
        }
    }

    /// Arm the hint again, e.g. after a second wind restarted the run.
    pub fn rearm(&mut self) {
        self.display = !self.completed;
        self.hint_visible = false;
    }

    /// Per-frame update. `hit_obstacle` is consumed whenever an obstacle is passed.
    pub fn tick<P: TrackProbe + ?Sized>(
        &mut self,
        track: &mut P,
        paused: bool,
        waiting_for_validation: bool,
        hit_obstacle: &mut bool,
    ) -> Vec<TutorialSignal> {
        let mut out = Vec::new();

        if !track.has_segments() {
            return out;
        }

        // Player performed the lesson while the hint was up.
        if paused && self.hint_visible && !waiting_for_validation {
            self.display = false;
            self.hint_visible = false;
            out.push(TutorialSignal::HideHint(self.stage));
        }

        let ratio = track.travel_ratio();
        let next = track
            .obstacle_position(self.obstacle_cursor)
            .unwrap_or(f32::MAX);

        if self.counting && ratio > next + self.config.pass_tolerance {
            self.obstacle_cursor += 1;

            if !*hit_obstacle {
                self.cleared += 1;
            }
            *hit_obstacle = false;

            if self.cleared >= self.config.obstacles_to_clear {
                self.cleared = 0;
                self.counting = false;
                self.gate = None;

                let zone = track.change_zone();
                out.push(TutorialSignal::StagePassed { zone });

                if zone == 0 {
                    self.stage = TutorialStage::Finish;
                    self.completed = true;
                    self.hint_visible = true;
                    out.push(TutorialSignal::ShowHint(TutorialStage::Finish));
                    out.push(TutorialSignal::Completed);
                }
            }
        } else if self.display && !self.hint_visible && ratio > next - self.config.hint_lead {
            self.hint_visible = true;
            out.push(TutorialSignal::ShowHint(self.stage));
        }

        out
    }

    /// Segment-created hook: the first segment of a new zone gates the next stage.
    pub fn on_segment_created(&mut self, id: SegmentId, zone: usize) {
        if zone != 0 && !self.counting && self.gate.is_none() && !self.completed {
            self.gate = Some(id);
        }
    }

    /// Segment-changed hook. Returns true when the stage advanced.
    pub fn on_segment_changed(&mut self, id: SegmentId) -> bool {
        self.obstacle_cursor = 0;

        if self.completed || self.counting || self.gate != Some(id) {
            return false;
        }

        self.stage = self.stage.next();
        self.counting = true;
        self.gate = None;
        self.display = true;
        true
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        on_segment_messages
            .after(TrackSystems)
            .run_if(in_state(AppState::Game)),
    );
}

/// Feed track events into the tracker. Runs after the track moved and before the run tick.
pub fn on_segment_messages(
    mut created: MessageReader<SegmentCreated>,
    mut changed: MessageReader<SegmentChanged>,
    mut session: ResMut<RunSession>,
) {
    let Some(progress) = session.tutorial.as_mut() else {
        created.clear();
        changed.clear();
        return;
    };

    for ev in created.read() {
        progress.on_segment_created(ev.id, ev.zone);
    }
    for ev in changed.read() {
        if progress.on_segment_changed(ev.id) {
            info!("tutorial stage -> {:?}", progress.stage());
        }
    }
}
