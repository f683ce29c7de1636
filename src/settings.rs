//! Game settings and tuning
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults in [`crate::consts`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::FixedPlayArea;

/// Errors from reading or writing a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Lives at the start of a session
    pub initial_lives: u8,
    /// Visibility window of the first target (ms)
    pub initial_time_limit_ms: f64,
    /// Visibility window floor (ms)
    pub min_time_limit_ms: f64,
    /// Multiplier applied per level-up, in (0, 1]
    pub time_limit_decay: f64,
    /// Delay before the next target appears (ms)
    pub respawn_delay_ms: u64,
    /// Score needed per level
    pub points_per_level: u64,
    /// Target footprint (square)
    pub target_size: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            initial_lives: INITIAL_LIVES,
            initial_time_limit_ms: INITIAL_TIME_LIMIT_MS,
            min_time_limit_ms: MIN_TIME_LIMIT_MS,
            time_limit_decay: TIME_LIMIT_DECAY,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            points_per_level: POINTS_PER_LEVEL,
            target_size: TARGET_SIZE,
        }
    }
}

impl GameTuning {
    /// Clamp values that would break the game rules
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        self.initial_lives = self.initial_lives.max(1);
        if !(self.min_time_limit_ms.is_finite() && self.min_time_limit_ms >= 1.0) {
            self.min_time_limit_ms = defaults.min_time_limit_ms;
        }
        if !self.initial_time_limit_ms.is_finite() {
            self.initial_time_limit_ms = defaults.initial_time_limit_ms;
        }
        self.initial_time_limit_ms = self.initial_time_limit_ms.max(self.min_time_limit_ms);
        if !(self.time_limit_decay > 0.0 && self.time_limit_decay <= 1.0) {
            self.time_limit_decay = defaults.time_limit_decay;
        }
        self.points_per_level = self.points_per_level.max(1);
        if !(self.target_size.is_finite() && self.target_size >= 0.0) {
            self.target_size = defaults.target_size;
        }
        self
    }
}

/// Simulated player behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotSettings {
    /// Probability of noticing a target at all, 0..=1
    pub hit_chance: f64,
    /// Fastest reaction (ms)
    pub min_reaction_ms: u64,
    /// Slowest reaction (ms)
    pub max_reaction_ms: u64,
    /// Virtual time budget for one run (ms)
    pub max_session_ms: u64,
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            hit_chance: 0.92,
            min_reaction_ms: 350,
            max_reaction_ms: 1400,
            max_session_ms: 10 * 60 * 1000,
        }
    }
}

impl AutopilotSettings {
    pub fn validated(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.hit_chance) {
            self.hit_chance = self.hit_chance.clamp(0.0, 1.0);
            if self.hit_chance.is_nan() {
                self.hit_chance = Self::default().hit_chance;
            }
        }
        if self.min_reaction_ms > self.max_reaction_ms {
            std::mem::swap(&mut self.min_reaction_ms, &mut self.max_reaction_ms);
        }
        self
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: GameTuning,
    pub autopilot: AutopilotSettings,
    /// Suppress audible cues
    pub muted: bool,
    /// Seed for target placement
    pub seed: u64,
    pub play_area: FixedPlayArea,
    /// Where the best score is kept
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: GameTuning::default(),
            autopilot: AutopilotSettings::default(),
            muted: false,
            seed: 0xC11C_AB07,
            play_area: FixedPlayArea::default(),
            high_score_path: PathBuf::from("click_a_bot_highscore.json"),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings if a path is given, otherwise (or on error) use defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn validated(mut self) -> Self {
        self.tuning = self.tuning.validated();
        self.autopilot = self.autopilot.validated();
        self
    }
}
