//! In-run overlay surface.
//!
//! `Hud` is the single source of truth for what the run screen shows. Gameplay code only
//! flips flags and writes strings here; `view` (render-only) mirrors it into Bevy UI.

use bevy::prelude::*;

use crate::plugins::character::CharacterState;
use crate::plugins::track::{TrackManager, TrackProbe};
use crate::plugins::tutorial::TutorialStage;

pub mod view;

#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub text: String,
    /// Shrinks from 1 to 0 over each second.
    pub scale: f32,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Hud {
    pub canvas_visible: bool,
    pub whole_ui_visible: bool,
    pub pause_menu_visible: bool,
    pub pause_button_visible: bool,
    pub game_over_popup_visible: bool,
    pub premium_for_life_enabled: bool,
    pub premium_owned: String,
    /// Tutorial obstacle counter; `None` hides it.
    pub tutorial_label: Option<String>,
    hints: [bool; TutorialStage::COUNT],
    pub coins: String,
    pub premium: String,
    pub score: String,
    pub distance: String,
    pub multiplier: String,
    /// Environment zone, counted from 1.
    pub zone: String,
    pub countdown: Option<Countdown>,
    /// One entry per heart, true = still alive.
    pub life_hearts: Vec<bool>,
}

impl Hud {
    /// Overlay layout at the start of a run.
    pub fn reset_overlays(&mut self, pause_button: bool) {
        self.canvas_visible = true;
        self.pause_menu_visible = false;
        self.whole_ui_visible = true;
        self.pause_button_visible = pause_button;
        self.game_over_popup_visible = false;
        self.hints = [false; TutorialStage::COUNT];
        self.tutorial_label = None;
    }

    pub fn set_hint(&mut self, stage: TutorialStage, visible: bool) {
        self.hints[stage.index()] = visible;
    }

    pub fn hint(&self, stage: TutorialStage) -> bool {
        self.hints[stage.index()]
    }

    pub fn visible_hint(&self) -> Option<TutorialStage> {
        [
            TutorialStage::SideSlide,
            TutorialStage::UpSlide,
            TutorialStage::DownSlide,
            TutorialStage::Finish,
        ]
        .into_iter()
        .find(|s| self.hint(*s))
    }

    /// Copy counters from the character and the track.
    pub fn mirror(&mut self, character: &CharacterState, track: &TrackManager) {
        self.coins = character.coins.to_string();
        self.premium = character.premium.to_string();
        self.life_hearts = (0..character.max_life)
            .map(|i| character.current_life > i)
            .collect();

        self.score = track.score().to_string();
        self.multiplier = format!("x {}", track.multiplier());
        self.distance = format!("{}m", track.world_distance().floor() as u64);
        self.zone = format!("zone {}", track.current_zone() + 1);

        let t = track.time_to_start();
        self.countdown = (t >= 0.0).then(|| Countdown {
            text: format!("{}", t.ceil() as u32),
            scale: 1.0 - (t - t.floor()),
        });
    }

    /// Plain text rendering, one line per visible element.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.canvas_visible {
            return out;
        }

        if self.whole_ui_visible {
            let hearts: String = self
                .life_hearts
                .iter()
                .map(|alive| if *alive { '♥' } else { '·' })
                .collect();
            out.push(format!(
                "{hearts}  coins {}  premium {}  score {} {}  {}  {}",
                self.coins, self.premium, self.score, self.multiplier, self.distance, self.zone
            ));
            if let Some(c) = &self.countdown {
                out.push(c.text.clone());
            }
        }
        if let Some(label) = &self.tutorial_label {
            out.push(format!("tutorial {label}"));
        }
        if let Some(stage) = self.visible_hint() {
            out.push(hint_text(stage).to_string());
        }
        if self.pause_menu_visible {
            out.push("PAUSED  [Esc] resume  [Q] quit".into());
        }
        if self.game_over_popup_visible {
            let buy = if self.premium_for_life_enabled {
                "[C] continue for premium"
            } else {
                "not enough premium"
            };
            out.push(format!(
                "Second wind? {buy} (owned {})  [V] watch reward  [N] give up",
                self.premium_owned
            ));
        }
        out
    }
}

pub fn hint_text(stage: TutorialStage) -> &'static str {
    match stage {
        TutorialStage::SideSlide => "Swipe left or right to change lane",
        TutorialStage::UpSlide => "Swipe up to jump",
        TutorialStage::DownSlide => "Swipe down to slide",
        TutorialStage::Finish => "Tutorial complete! [F] finish",
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Hud>();
}

#[cfg(test)]
mod tests;
