//! Tunable gameplay constants.
//!
//! Loaded from `assets/config/tunables.ron`; every field falls back to its default when
//! missing, so a partial file is fine.

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::common::error::ConfigError;

pub const DEFAULT_PATH: &str = "assets/config/tunables.ron";

#[derive(Resource, Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub run: RunTunables,
    pub tutorial: TutorialTunables,
    pub track: TrackTunables,
    pub loadout: LoadoutTunables,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            run: RunTunables::default(),
            tutorial: TutorialTunables::default(),
            track: TrackTunables::default(),
            loadout: LoadoutTunables::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunTunables {
    pub max_lives: u32,
    /// Premium currency charged for a second wind.
    pub second_wind_cost: u32,
    /// Seconds between losing the last life and the end-of-run UI.
    pub game_over_delay: f32,
    /// Seconds of invincibility after a hit.
    pub invincibility: f32,
    pub slide_duration: f32,
}

impl Default for RunTunables {
    fn default() -> Self {
        Self {
            max_lives: 3,
            second_wind_cost: 3,
            game_over_delay: 2.0,
            invincibility: 2.0,
            slide_duration: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TutorialTunables {
    pub obstacles_to_clear: u32,
    /// Ratio past an obstacle before it counts as passed.
    pub pass_tolerance: f32,
    /// Ratio before an obstacle at which the hint shows up.
    pub hint_lead: f32,
}

impl Default for TutorialTunables {
    fn default() -> Self {
        Self {
            obstacles_to_clear: 3,
            pass_tolerance: 0.05,
            hint_lead: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackTunables {
    /// Meters per second.
    pub speed: f32,
    pub segment_length: f32,
    /// Segments kept generated, current one included.
    pub segments_ahead: usize,
    pub zone_count: usize,
    pub countdown: f32,
    /// Normalized obstacle positions inside each segment, ascending.
    pub obstacle_layout: Vec<f32>,
    pub lane_width: f32,
}

impl Default for TrackTunables {
    fn default() -> Self {
        Self {
            speed: 10.0,
            segment_length: 40.0,
            segments_ahead: 3,
            zone_count: 3,
            countdown: 3.0,
            obstacle_layout: vec![0.25, 0.5, 0.75],
            lane_width: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadoutTunables {
    /// Degrees per second.
    pub preview_rotation_speed: f32,
    pub character_retry_delay: f32,
    pub catalog_path: String,
}

impl Default for LoadoutTunables {
    fn default() -> Self {
        Self {
            preview_rotation_speed: 45.0,
            character_retry_delay: 1.0,
            catalog_path: "assets/data/catalog.ron".into(),
        }
    }
}

impl Tunables {
    pub fn from_ron(text: &str, origin: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&text, &path.display().to_string())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Human-readable warnings for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.run.max_lives == 0 {
            w.push("run.max_lives is 0: every run ends immediately".into());
        }
        if self.tutorial.obstacles_to_clear == 0 {
            w.push("tutorial.obstacles_to_clear is 0: stages can never pass".into());
        }
        if self.track.segment_length <= 0.0 {
            w.push(format!("track.segment_length {} must be > 0", self.track.segment_length));
        }
        if self.track.segments_ahead == 0 {
            w.push("track.segments_ahead must be >= 1".into());
        }
        if self.track.zone_count == 0 {
            w.push("track.zone_count must be >= 1".into());
        }
        if self
            .track
            .obstacle_layout
            .iter()
            .any(|p| !(0.0..=1.0).contains(p))
        {
            w.push("track.obstacle_layout entries must be within 0..=1".into());
        }
        if self.track.obstacle_layout.windows(2).any(|p| p[0] > p[1]) {
            w.push("track.obstacle_layout must be ascending".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Tunables::from_ron("(run: (max_lives: 5), track: (speed: 12.0))", "inline")
            .expect("parse");
        assert_eq!(cfg.run.max_lives, 5);
        assert_eq!(cfg.run.second_wind_cost, 3);
        assert_eq!(cfg.track.speed, 12.0);
        assert_eq!(cfg.tutorial, TutorialTunables::default());
    }

    #[test]
    fn missing_file_falls_back() {
        let (cfg, err) = Tunables::load_or_default("does/not/exist.ron");
        assert_eq!(cfg, Tunables::default());
        assert!(matches!(err, Some(ConfigError::Read { .. })));
    }

    #[test]
    fn bad_syntax_is_parse_error() {
        let err = Tunables::from_ron("(run: ", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn defaults_validate_clean() {
        assert!(Tunables::default().validate().is_empty());

        let mut cfg = Tunables::default();
        cfg.track.obstacle_layout = vec![0.8, 0.2];
        assert_eq!(cfg.validate().len(), 1);
    }
}
