//! Game session: the timer-driven state machine
//!
//! The session is the only owner of [`GameState`]. Every transition (a
//! command or a fired timer) runs to completion on `&mut self` before the
//! next one is processed, so no locking is needed inside. The session is
//! single-threaded; a threaded host funnels clicks and timer firings to the
//! one thread that owns it.
//!
//! Two timers drive a target's life:
//! - the disappearance timer, armed on spawn for the current time limit
//! - the respawn timer, armed after a hit or a non-fatal miss
//!
//! Every superseded timer is cancelled, and every fired timer re-checks the
//! state it assumes before acting.

use std::panic::{self, AssertUnwindSafe};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::{Clock, FiredTimer, ManualClock, Timer, TimerHandle};
use crate::highscores::HighScoreStore;
use crate::notify::Notifier;
use crate::settings::GameTuning;
use crate::sim::{
    GameEvent, GamePhase, GameState, PlayArea, Snapshot, is_level_up, next_time_limit,
    random_target_position, timer_delay_ms,
};

/// Snapshot listener
type Observer = Box<dyn FnMut(&Snapshot)>;

/// A running game and its collaborators
pub struct GameSession<C: Clock> {
    state: GameState,
    tuning: GameTuning,
    clock: C,
    store: Box<dyn HighScoreStore>,
    notifier: Box<dyn Notifier>,
    play_area: Box<dyn PlayArea>,
    rng: Pcg32,
    disappear_timer: Option<TimerHandle>,
    respawn_timer: Option<TimerHandle>,
    observers: Vec<Observer>,
}

impl<C: Clock> GameSession<C> {
    /// Create a session on the title screen. The high score is loaded here.
    pub fn new(
        clock: C,
        mut store: impl HighScoreStore + 'static,
        notifier: impl Notifier + 'static,
        play_area: impl PlayArea + 'static,
    ) -> Self {
        let tuning = GameTuning::default();
        let high_score = store.load();
        Self {
            state: GameState::new(&tuning, high_score),
            tuning,
            clock,
            store: Box::new(store),
            notifier: Box::new(notifier),
            play_area: Box::new(play_area),
            rng: Pcg32::seed_from_u64(0),
            disappear_timer: None,
            respawn_timer: None,
            observers: Vec::new(),
        }
    }

    /// Replace the tuning. Takes effect immediately if no game has started,
    /// otherwise on the next `start`.
    pub fn with_tuning(mut self, tuning: GameTuning) -> Self {
        self.tuning = tuning.validated();
        if self.state.phase == GamePhase::NotStarted {
            self.state = GameState::new(&self.tuning, self.state.high_score);
        }
        self
    }

    /// Seed target placement
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Register a listener that receives a snapshot after every transition
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// True while the session holds an armed timer
    pub fn has_pending_timers(&self) -> bool {
        self.disappear_timer.is_some() || self.respawn_timer.is_some()
    }

    /// Begin a new run. From `Playing` this is a hard restart.
    pub fn start(&mut self) {
        self.cancel_timers();
        if self.state.is_playing() {
            log::info!("Restarting run at score {}", self.state.score);
        }
        self.state.reset(&self.tuning);
        log::info!(
            "Run started: {} lives, {}ms per target",
            self.state.lives,
            self.state.time_limit_ms
        );
        self.spawn_target();
        self.publish();
    }

    /// The player's hit. Returns false (and changes nothing) when there is
    /// no visible target to hit.
    pub fn activate_target(&mut self) -> bool {
        if !self.state.is_playing() || !self.state.target_visible {
            log::trace!("Activation ignored: no target visible");
            return false;
        }

        if let Some(handle) = self.disappear_timer.take() {
            self.clock.cancel(handle);
        }
        self.state.score += 1;
        self.state.streak += 1;
        self.state.target_visible = false;
        log::debug!(
            "Target {} hit: score {}, streak {}",
            self.state.target_id,
            self.state.score,
            self.state.streak
        );
        self.notify(GameEvent::Hit {
            score: self.state.score,
            streak: self.state.streak,
        });

        if is_level_up(self.state.score, self.tuning.points_per_level) {
            self.level_up();
        }

        self.schedule_respawn();
        self.publish();
        true
    }

    /// Dispatch a fired timer. Stale timers are ignored.
    pub fn handle_timer(&mut self, fired: FiredTimer) {
        match fired.timer {
            Timer::Disappear { target_id } => {
                if self.disappear_timer != Some(fired.handle) {
                    log::trace!("Stale disappearance timer for target {}", target_id);
                    return;
                }
                self.disappear_timer = None;
                self.on_disappear(target_id);
            }
            Timer::Respawn => {
                if self.respawn_timer != Some(fired.handle) {
                    log::trace!("Stale respawn timer");
                    return;
                }
                self.respawn_timer = None;
                self.on_respawn();
            }
        }
    }

    /// Dispatch every timer that is due now. Returns how many fired.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.clock.pop_due() {
            self.handle_timer(timer);
            fired += 1;
        }
        fired
    }

    fn on_disappear(&mut self, target_id: u64) {
        if !self.state.is_playing()
            || !self.state.target_visible
            || self.state.target_id != target_id
        {
            log::trace!("Disappearance of target {} is stale", target_id);
            return;
        }

        self.state.target_visible = false;
        self.state.streak = 0;
        self.state.lives = self.state.lives.saturating_sub(1);
        log::debug!("Target {} missed, {} lives left", target_id, self.state.lives);
        self.notify(GameEvent::Miss {
            lives: self.state.lives,
        });

        if self.state.lives == 0 {
            self.game_over();
        } else {
            self.schedule_respawn();
        }
        self.publish();
    }

    fn on_respawn(&mut self) {
        if !self.state.is_playing() || self.state.target_visible {
            log::trace!("Respawn is stale");
            return;
        }
        self.spawn_target();
        self.publish();
    }

    /// Show a new target and arm its disappearance timer
    fn spawn_target(&mut self) {
        let bounds = self.play_area.bounds();
        self.state.target_pos =
            random_target_position(bounds, self.tuning.target_size, &mut self.rng);
        self.state.target_id += 1;
        self.state.target_visible = true;

        let delay = timer_delay_ms(self.state.time_limit_ms);
        self.disappear_timer = Some(self.clock.schedule(
            delay,
            Timer::Disappear {
                target_id: self.state.target_id,
            },
        ));
        log::debug!(
            "Target {} spawned at ({:.0}, {:.0}) for {}ms",
            self.state.target_id,
            self.state.target_pos.x,
            self.state.target_pos.y,
            delay
        );
    }

    fn schedule_respawn(&mut self) {
        if let Some(stale) = self.respawn_timer.take() {
            self.clock.cancel(stale);
        }
        self.respawn_timer = Some(
            self.clock
                .schedule(self.tuning.respawn_delay_ms, Timer::Respawn),
        );
    }

    fn level_up(&mut self) {
        self.state.level += 1;
        self.state.time_limit_ms = next_time_limit(
            self.state.time_limit_ms,
            self.tuning.time_limit_decay,
            self.tuning.min_time_limit_ms,
        );
        log::info!(
            "Level {} reached, time limit now {:.1}ms",
            self.state.level,
            self.state.time_limit_ms
        );
        self.notify(GameEvent::LevelUp {
            level: self.state.level,
            time_limit_ms: self.state.time_limit_ms,
        });
    }

    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        self.cancel_timers();

        let new_high_score = self.state.score > self.state.high_score;
        if new_high_score {
            self.state.high_score = self.state.score;
            if let Err(e) = self.store.save(self.state.score) {
                log::warn!("High score {} not persisted: {}", self.state.score, e);
            }
        }
        log::info!(
            "Game over: score {}, level {}, high score {}",
            self.state.score,
            self.state.level,
            self.state.high_score
        );
        self.notify(GameEvent::GameOver {
            score: self.state.score,
            new_high_score,
        });
    }

    fn cancel_timers(&mut self) {
        for handle in [self.disappear_timer.take(), self.respawn_timer.take()]
            .into_iter()
            .flatten()
        {
            self.clock.cancel(handle);
        }
    }

    /// Deliver an event; a panicking notifier is logged and otherwise ignored
    fn notify(&mut self, event: GameEvent) {
        let notifier = &mut self.notifier;
        if panic::catch_unwind(AssertUnwindSafe(|| notifier.on_event(event))).is_err() {
            log::warn!("Notifier panicked on {:?}; continuing", event);
        }
    }

    fn publish(&mut self) {
        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

impl GameSession<ManualClock> {
    /// Move virtual time forward, firing each due timer at its own deadline
    pub fn advance(&mut self, delta_ms: u64) {
        let target = self.clock.now_ms() + delta_ms;
        while let Some(deadline) = self.clock.next_deadline().filter(|&d| d <= target) {
            self.clock.advance_to(deadline);
            self.pump();
        }
        self.clock.advance_to(target);
    }

    /// Jump to the next armed timer and fire it. Returns the timer that fired.
    pub fn fire_next(&mut self) -> Option<Timer> {
        let deadline = self.clock.next_deadline()?;
        self.clock.advance_to(deadline);
        let fired = self.clock.pop_due()?;
        self.handle_timer(fired);
        Some(fired.timer)
    }
}
