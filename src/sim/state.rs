//! Game state and observable snapshot types
//!
//! Everything a renderer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::GameTuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing scheduled
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended, state frozen until the next start
    GameOver,
}

/// Gameplay events reported to the notifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Target hit in time
    Hit { score: u64, streak: u64 },
    /// Target vanished before it was hit
    Miss { lives: u8 },
    /// Difficulty escalated
    LevelUp { level: u32, time_limit_ms: f64 },
    /// Last life lost
    GameOver { score: u64, new_high_score: bool },
}

/// Complete game state (single owner: the session)
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Points earned this session
    pub score: u64,
    /// Best score across sessions
    pub high_score: u64,
    /// Remaining lives
    pub lives: u8,
    /// Consecutive hits since the last miss
    pub streak: u64,
    /// Difficulty level (1-based)
    pub level: u32,
    /// Visibility window of the current/next target (ms)
    pub time_limit_ms: f64,
    /// Top-left corner of the target
    pub target_pos: Vec2,
    /// Whether a target is active and can be hit
    pub target_visible: bool,
    /// Spawn counter; identifies the current target
    pub target_id: u64,
    /// Current phase
    pub phase: GamePhase,
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(tuning: &GameTuning, high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            lives: tuning.initial_lives,
            streak: 0,
            level: 1,
            time_limit_ms: tuning.initial_time_limit_ms,
            target_pos: Vec2::ZERO,
            target_visible: false,
            target_id: 0,
            phase: GamePhase::NotStarted,
        }
    }

    /// Reset per-session fields for a new run; keeps the high score and spawn counter
    pub fn reset(&mut self, tuning: &GameTuning) {
        self.score = 0;
        self.lives = tuning.initial_lives;
        self.streak = 0;
        self.level = 1;
        self.time_limit_ms = tuning.initial_time_limit_ms;
        self.target_visible = false;
        self.phase = GamePhase::Playing;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            streak: self.streak,
            level: self.level,
            time_limit_ms: self.time_limit_ms,
            target_pos: self.target_pos,
            target_visible: self.target_visible,
            target_id: self.target_id,
            phase: self.phase,
        }
    }
}

/// Observable state pushed after every transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub streak: u64,
    pub level: u32,
    pub time_limit_ms: f64,
    pub target_pos: Vec2,
    pub target_visible: bool,
    pub target_id: u64,
    pub phase: GamePhase,
}
