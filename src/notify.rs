//! Side effects for gameplay events (sound cues, flashes, HUD pops)
//!
//! Notifiers are fire-and-forget. The session isolates every call, so a
//! misbehaving notifier can never corrupt game state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::sim::GameEvent;

/// Receives gameplay events
///
/// Implement the individual callbacks for simple cues, or override
/// [`Notifier::on_event`] to get the event details.
pub trait Notifier {
    fn on_hit(&mut self) {}

    fn on_miss(&mut self) {}

    fn on_game_over(&mut self) {}

    fn on_level_up(&mut self, _level: u32) {}

    /// Entry point used by the session. Routes to the callbacks above.
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Hit { .. } => self.on_hit(),
            GameEvent::Miss { .. } => self.on_miss(),
            GameEvent::LevelUp { level, .. } => self.on_level_up(level),
            GameEvent::GameOver { .. } => self.on_game_over(),
        }
    }
}

/// Notifier that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}

/// Writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Hit { score, streak } => {
                log::info!("Hit! score {} (streak {})", score, streak)
            }
            GameEvent::Miss { lives } => log::info!("Missed, {} lives left", lives),
            GameEvent::LevelUp {
                level,
                time_limit_ms,
            } => log::info!("Level {}! Targets now last {:.0}ms", level, time_limit_ms),
            GameEvent::GameOver {
                score,
                new_high_score: true,
            } => log::info!("Game over - new high score {}!", score),
            GameEvent::GameOver { score, .. } => log::info!("Game over with {} points", score),
        }
    }
}

/// Records events into a shared list. Clones share the list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn on_event(&mut self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Shared mute toggle. Clones flip the same switch.
#[derive(Debug, Clone, Default)]
pub struct MuteSwitch(Rc<Cell<bool>>);

impl MuteSwitch {
    pub fn new(muted: bool) -> Self {
        Self(Rc::new(Cell::new(muted)))
    }

    pub fn is_muted(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, muted: bool) {
        self.0.set(muted);
    }

    pub fn toggle(&self) -> bool {
        let muted = !self.0.get();
        self.0.set(muted);
        muted
    }
}

/// Drops the audible cues (hit, game over) while muted; misses and
/// level-ups are visual and always pass through.
#[derive(Debug, Clone)]
pub struct Muted<N> {
    inner: N,
    switch: MuteSwitch,
}

impl<N: Notifier> Muted<N> {
    pub fn new(inner: N, switch: MuteSwitch) -> Self {
        Self { inner, switch }
    }
}

impl<N: Notifier> Notifier for Muted<N> {
    fn on_event(&mut self, event: GameEvent) {
        let audible = matches!(event, GameEvent::Hit { .. } | GameEvent::GameOver { .. });
        if audible && self.switch.is_muted() {
            return;
        }
        self.inner.on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: u32,
        misses: u32,
        game_overs: u32,
        levels: Vec<u32>,
    }

    impl Notifier for Counter {
        fn on_hit(&mut self) {
            self.hits += 1;
        }
        fn on_miss(&mut self) {
            self.misses += 1;
        }
        fn on_game_over(&mut self) {
            self.game_overs += 1;
        }
        fn on_level_up(&mut self, level: u32) {
            self.levels.push(level);
        }
    }

    #[test]
    fn test_default_routing() {
        let mut counter = Counter::default();
        counter.on_event(GameEvent::Hit { score: 1, streak: 1 });
        counter.on_event(GameEvent::Miss { lives: 2 });
        counter.on_event(GameEvent::LevelUp {
            level: 2,
            time_limit_ms: 1800.0,
        });
        counter.on_event(GameEvent::GameOver {
            score: 5,
            new_high_score: false,
        });
        assert_eq!(
            (counter.hits, counter.misses, counter.game_overs),
            (1, 1, 1)
        );
        assert_eq!(counter.levels, vec![2]);
    }

    #[test]
    fn test_muted_drops_audible_cues_only() {
        let recorder = RecordingNotifier::new();
        let switch = MuteSwitch::new(true);
        let mut muted = Muted::new(recorder.clone(), switch.clone());

        muted.on_event(GameEvent::Hit { score: 1, streak: 1 });
        muted.on_event(GameEvent::Miss { lives: 2 });
        assert_eq!(recorder.events(), vec![GameEvent::Miss { lives: 2 }]);

        assert!(!switch.toggle());
        muted.on_event(GameEvent::Hit { score: 2, streak: 1 });
        assert_eq!(recorder.count(|e| matches!(e, GameEvent::Hit { .. })), 1);
    }
}
