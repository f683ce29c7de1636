//! Simulated player
//!
//! Plays a session on virtual time: for each new target it rolls whether it
//! notices it and how long it takes to react, then clicks once that reaction
//! time has passed. Reactions slower than the visibility window turn into
//! misses on their own, so the higher levels wear the autopilot down.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, ManualClock};
use crate::session::GameSession;
use crate::settings::AutopilotSettings;
use crate::sim::Snapshot;

/// Result of one autopilot run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_snapshot: Snapshot,
    pub hits: u64,
    pub misses: u64,
    /// Clicks on targets that had already vanished
    pub late_clicks: u64,
    /// Virtual time spent (ms)
    pub elapsed_ms: u64,
}

/// What the autopilot intends to do about one target
#[derive(Debug, Clone, Copy)]
struct Plan {
    target_id: u64,
    click_at_ms: Option<u64>,
}

pub struct Autopilot {
    settings: AutopilotSettings,
    rng: Pcg32,
}

impl Autopilot {
    pub fn new(settings: AutopilotSettings, seed: u64) -> Self {
        Self {
            settings: settings.validated(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Decide when (if ever) to click a target that appeared at `now_ms`
    fn react(&mut self, target_id: u64, now_ms: u64) -> Plan {
        let click_at_ms = self.rng.random_bool(self.settings.hit_chance).then(|| {
            now_ms
                + self
                    .rng
                    .random_range(self.settings.min_reaction_ms..=self.settings.max_reaction_ms)
        });
        Plan {
            target_id,
            click_at_ms,
        }
    }

    /// Play until game over or the time budget runs out. Starts the session
    /// if it is not already running.
    pub fn play(&mut self, session: &mut GameSession<ManualClock>) -> RunSummary {
        if !session.state().is_playing() {
            session.start();
        }
        let started_ms = session.clock().now_ms();
        let budget_end = started_ms + self.settings.max_session_ms;
        let initial_lives = session.state().lives;
        let mut plan: Option<Plan> = None;
        let mut late_clicks = 0;

        log::info!("Autopilot taking over (hit chance {:.0}%)", self.settings.hit_chance * 100.0);

        while session.state().is_playing() {
            let now = session.clock().now_ms();
            if now >= budget_end {
                log::info!("Autopilot time budget exhausted");
                break;
            }

            let state = session.state();
            if state.target_visible && plan.map(|p| p.target_id) != Some(state.target_id) {
                plan = Some(self.react(state.target_id, now));
            }

            let click = plan
                .filter(|p| session.state().target_visible && p.target_id == session.state().target_id)
                .and_then(|p| p.click_at_ms.map(|at| (p.target_id, at)));

            match click {
                Some((target_id, at)) => {
                    session.advance(at.min(budget_end) - now);
                    if at > budget_end {
                        continue;
                    }
                    // A new target may have spawned while the player was still reacting
                    let same_target = session.state().target_id == target_id;
                    if !(same_target && session.activate_target()) {
                        late_clicks += 1;
                    }
                    if let Some(p) = plan.as_mut() {
                        p.click_at_ms = None;
                    }
                }
                None => match session.clock().next_deadline() {
                    Some(deadline) => session.advance(deadline.min(budget_end).saturating_sub(now)),
                    None => break,
                },
            }
        }

        let final_snapshot = session.snapshot();
        let summary = RunSummary {
            final_snapshot,
            hits: final_snapshot.score,
            misses: u64::from(initial_lives.saturating_sub(final_snapshot.lives)),
            late_clicks,
            elapsed_ms: session.clock().now_ms() - started_ms,
        };
        log::info!(
            "Autopilot finished: {} hits, {} misses, level {} in {}ms",
            summary.hits,
            summary.misses,
            final_snapshot.level,
            summary.elapsed_ms
        );
        summary
    }
}
