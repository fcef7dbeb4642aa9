//! Ember Waves entry point
//!
//! Headless runner: plays a seeded game with the autopilot, logging waves,
//! level-ups and upgrade picks, then prints the final frame as JSON.
//!
//! Usage: `ember-waves [seed] [tuning.json] [max_ticks]`

use ember_waves::autopilot::{autopilot_input, autopilot_pick};
use ember_waves::sim::{FrameSink, FrameSnapshot, GameEvent, TickOutcome};
use ember_waves::{Driver, Tuning};

const DEFAULT_SEED: u64 = 0x00E3_B0C4;
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;
const STATUS_INTERVAL_TICKS: u64 = 600;

/// Logs events as they arrive and keeps the latest frame
#[derive(Default)]
struct LogSink {
    last: Option<FrameSnapshot>,
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &FrameSnapshot) {
        for event in &frame.events {
            match event {
                GameEvent::EnemyKilled { .. } => log::trace!("{:?}", event),
                _ => log::debug!("tick {}: {:?}", frame.tick, event),
            }
        }
        if status_due(frame.tick) {
            log::info!(
                "tick {}: wave {}, level {}, hp {:.1}/{}, {} enemies",
                frame.tick,
                frame.wave,
                frame.player.level,
                frame.player.health,
                frame.player.max_health,
                frame.enemies.len()
            );
        }
        self.last = Some(frame.clone());
    }
}

/// Status line every ten seconds of game time
fn status_due(tick: u64) -> bool {
    tick > 0 && tick % STATUS_INTERVAL_TICKS == 0
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    log::info!("Ember Waves (headless) starting...");
    let mut driver = match Driver::new(seed, tuning) {
        Ok(driver) => driver,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    let mut sink = LogSink::default();

    loop {
        let input = autopilot_input(driver.state());
        match driver.step(&input, &mut sink) {
            TickOutcome::Running => {}
            TickOutcome::Suspended => {
                if let Some(prompt) = driver.state().prompt.clone() {
                    let pick = autopilot_pick(driver.state(), &prompt);
                    if let Err(err) = driver.choose_upgrade(pick) {
                        log::error!("{}", err);
                        break;
                    }
                }
            }
            TickOutcome::GameOver => break,
        }
        if driver.state().time_ticks >= max_ticks {
            log::info!("Tick limit reached");
            break;
        }
    }

    if let Some(frame) = sink.last {
        match serde_json::to_string_pretty(&frame) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to encode final frame: {}", err),
        }
    }
}
