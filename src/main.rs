//! Click-A-Bot headless runner
//!
//! Plays one autopilot session on virtual time and prints the summary as JSON.
//!
//! Usage: `click-a-bot [settings.json]`

use std::path::PathBuf;

use click_a_bot::{
    Autopilot, FileHighScoreStore, GameSession, LogNotifier, ManualClock, MuteSwitch, Muted,
    Settings,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Click-A-Bot starting...");

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref());

    let store = FileHighScoreStore::new(&settings.high_score_path);
    let notifier = Muted::new(LogNotifier, MuteSwitch::new(settings.muted));
    let mut session = GameSession::new(ManualClock::new(), store, notifier, settings.play_area)
        .with_tuning(settings.tuning.clone())
        .with_seed(settings.seed);
    log::info!("Game initialized with seed: {}", settings.seed);

    let mut pilot = Autopilot::new(settings.autopilot.clone(), settings.seed.wrapping_add(1));
    let summary = pilot.play(&mut session);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
