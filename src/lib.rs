//! Click-A-Bot - a reflex game core
//!
//! A target appears somewhere in the play area for a shrinking time window and
//! the player has to hit it before it vanishes.
//!
//! Core modules:
//! - `sim`: Deterministic game model (state, difficulty curve, target placement)
//! - `session`: The timer-driven state machine that owns the game
//! - `clock`: Cancellable timers (virtual and wall-clock)
//! - `highscores`: Best-score persistence
//! - `notify`: Hit/miss/game-over side effects
//! - `settings`: Data-driven tuning and configuration
//! - `autopilot`: Simulated player for demos and soak runs

pub mod autopilot;
pub mod clock;
pub mod highscores;
pub mod notify;
pub mod session;
pub mod settings;
pub mod sim;

pub use autopilot::{Autopilot, RunSummary};
pub use clock::{Clock, ManualClock, SystemClock, Timer, TimerHandle};
pub use highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, StoreError};
pub use notify::{LogNotifier, MuteSwitch, Muted, Notifier, NullNotifier, RecordingNotifier};
pub use session::GameSession;
pub use settings::{AutopilotSettings, GameTuning, Settings, SettingsError};
pub use sim::{FixedPlayArea, GameEvent, GamePhase, GameState, PlayArea, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Lives at the start of a session
    pub const INITIAL_LIVES: u8 = 3;
    /// Visibility window of the first target (ms)
    pub const INITIAL_TIME_LIMIT_MS: f64 = 2000.0;
    /// The visibility window never shrinks below this (ms)
    pub const MIN_TIME_LIMIT_MS: f64 = 800.0;
    /// Multiplier applied to the visibility window on each level-up
    pub const TIME_LIMIT_DECAY: f64 = 0.9;
    /// Delay between a hit (or non-fatal miss) and the next spawn (ms)
    pub const RESPAWN_DELAY_MS: u64 = 200;
    /// Points needed per level
    pub const POINTS_PER_LEVEL: u64 = 5;
    /// Target footprint (square, in play-area units)
    pub const TARGET_SIZE: f32 = 80.0;

    /// Default play area
    pub const DEFAULT_PLAY_WIDTH: f32 = 1280.0;
    pub const DEFAULT_PLAY_HEIGHT: f32 = 720.0;
}
