//! Persistent player profile.
//!
//! `PlayerProfile` is process-wide: loaded once at startup, mutated by the run and loadout
//! controllers, and saved synchronously before any transition that leaves gameplay.
//! `ProfileStore` decides where it lives; the default store keeps it in memory only,
//! which is what headless apps and tests want.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SAVE_PATH: &str = "save/profile.ron";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile io: {0}")]
    Io(#[from] io::Error),
    #[error("profile encode: {0}")]
    Encode(#[from] ron::Error),
    #[error("profile decode: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub tutorial_done: bool,
    pub premium: u32,
    pub coins: u32,
    /// First-time-user-experience progress: 0 never started, 1 pressed start, 2 ran once.
    pub ftue_level: u8,
    pub characters: Vec<String>,
    pub themes: Vec<String>,
    pub used_character: usize,
    pub used_theme: usize,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            tutorial_done: false,
            premium: 0,
            coins: 0,
            ftue_level: 0,
            characters: vec!["Trash Cat".into()],
            themes: vec!["Day".into()],
            used_character: 0,
            used_theme: 0,
        }
    }
}

impl PlayerProfile {
    pub fn used_character_name(&self) -> Option<&str> {
        self.characters.get(self.used_character).map(String::as_str)
    }

    pub fn used_theme_name(&self) -> Option<&str> {
        self.themes.get(self.used_theme).map(String::as_str)
    }

    /// Step the selected character by `dir`, wrapping at both ends.
    pub fn cycle_character(&mut self, dir: i32) {
        self.used_character = wrap_index(self.used_character, dir, self.characters.len());
    }

    /// Step the selected theme by `dir`, wrapping at both ends.
    pub fn cycle_theme(&mut self, dir: i32) {
        self.used_theme = wrap_index(self.used_theme, dir, self.themes.len());
    }
}

fn wrap_index(current: usize, dir: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + dir as i64).rem_euclid(len as i64) as usize
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ProfileStore {
    path: Option<PathBuf>,
}

impl ProfileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<PlayerProfile, ProfileError> {
        let Some(path) = &self.path else {
            return Ok(PlayerProfile::default());
        };
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// A missing file is a fresh profile; anything else is logged.
    pub fn load_or_default(&self) -> PlayerProfile {
        match self.load() {
            Ok(profile) => profile,
            Err(ProfileError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("no saved profile, starting fresh");
                PlayerProfile::default()
            }
            Err(e) => {
                warn!("could not load profile, starting fresh: {e}");
                PlayerProfile::default()
            }
        }
    }

    pub fn save(&self, profile: &PlayerProfile) -> Result<(), ProfileError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let text = ron::ser::to_string_pretty(profile, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        debug!("profile saved to {}", path.display());
        Ok(())
    }

    /// Save and log on failure. Persistence errors never abort a transition.
    pub fn save_or_warn(&self, profile: &PlayerProfile) {
        if let Err(e) = self.save(profile) {
            warn!("profile save failed: {e}");
        }
    }
}

/// Insert the store (in-memory unless one was inserted earlier) and the loaded profile.
pub fn plugin(app: &mut App) {
    app.init_resource::<ProfileStore>();
    let store = app.world().resource::<ProfileStore>();
    match store.path() {
        Some(path) => info!("profile store at {}", path.display()),
        None => info!("profile kept in memory"),
    }
    if !app.world().contains_resource::<PlayerProfile>() {
        let profile = app.world().resource::<ProfileStore>().load_or_default();
        app.insert_resource(profile);
    }
}

#[cfg(test)]
mod tests;
