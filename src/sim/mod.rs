//! Deterministic game model
//!
//! Pure data and functions only. This module must stay deterministic:
//! - Seeded RNG only
//! - No clocks, I/O or rendering dependencies

pub mod difficulty;
pub mod spawn;
pub mod state;

pub use difficulty::{is_level_up, level_for_score, next_time_limit, timer_delay_ms};
pub use spawn::{FixedPlayArea, PlayArea, random_target_position};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
