//! Character and theme catalog.
//!
//! The two halves load independently; the loadout screen only lets the player run once both
//! are in.

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::error::{ConfigError, RunError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub name: String,
    /// Preview asset. An entry without one cannot be shown.
    #[serde(default)]
    pub prefab: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    characters: Vec<CharacterEntry>,
    themes: Vec<ThemeEntry>,
}

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    characters: Vec<CharacterEntry>,
    themes: Vec<ThemeEntry>,
    characters_loaded: bool,
    themes_loaded: bool,
}

impl Catalog {
    pub fn from_ron(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        let mut catalog = Self::default();
        catalog.load_characters(file.characters);
        catalog.load_themes(file.themes);
        Ok(catalog)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&text, &path.display().to_string())
    }

    pub fn load_characters(&mut self, entries: Vec<CharacterEntry>) {
        self.characters = entries;
        self.characters_loaded = true;
    }

    pub fn load_themes(&mut self, entries: Vec<ThemeEntry>) {
        self.themes = entries;
        self.themes_loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.characters_loaded && self.themes_loaded
    }

    pub fn character(&self, name: &str) -> Option<&CharacterEntry> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn theme(&self, name: &str) -> Option<&ThemeEntry> {
        self.themes.iter().find(|t| t.name == name)
    }

    /// A loaded catalog with nothing in it can never unblock the loadout.
    pub fn check_configured(&self) -> Result<(), RunError> {
        if self.characters_loaded && self.characters.is_empty() {
            return Err(RunError::ConfigurationMissing("no characters in catalog".into()));
        }
        if self.themes_loaded && self.themes.is_empty() {
            return Err(RunError::ConfigurationMissing("no themes in catalog".into()));
        }
        Ok(())
    }

    /// A catalog that fails to load stays empty and unloaded, which keeps the run button off.
    pub fn load_or_unloaded(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(catalog) => {
                info!("catalog loaded from {}", path.display());
                catalog
            }
            Err(e) => {
                warn!("catalog unavailable, loadout stays blocked: {e}");
                Self::default()
            }
        }
    }
}
