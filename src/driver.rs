//! Frame driver
//!
//! Turns an external per-frame callback into fixed simulation ticks and
//! hands a snapshot to the renderer every frame, including while the game
//! is suspended for an upgrade pick or over.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{
    FrameSink, FrameSnapshot, GameState, SelectionError, TickInput, TickOutcome, UpgradeOption,
    select_upgrade, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Game instance holding simulation state and frame timing
#[derive(Debug, Clone)]
pub struct Driver {
    state: GameState,
    accumulator: f32,
}

impl Driver {
    /// Start a run. Fails if `tuning` cannot drive a simulation.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("New run with seed {}", seed);
        Ok(Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator: 0.0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn outcome(&self) -> TickOutcome {
        self.state.phase.into()
    }

    /// Run exactly one tick and present the result
    pub fn step(&mut self, input: &TickInput, sink: &mut impl FrameSink) -> TickOutcome {
        let outcome = tick(&mut self.state, input);
        self.present(sink);
        outcome
    }

    /// Run as many fixed ticks as `dt` seconds of wall time cover, then present
    pub fn frame(&mut self, dt: f32, input: &TickInput, sink: &mut impl FrameSink) -> TickOutcome {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let outcome = tick(&mut self.state, input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            if outcome != TickOutcome::Running {
                // Time spent paused or dead is not owed to the simulation
                self.accumulator = 0.0;
                break;
            }
        }
        if self.outcome() != TickOutcome::Running {
            self.accumulator = 0.0;
        }

        self.present(sink);
        self.outcome()
    }

    /// Forward the upgrade picker's choice
    pub fn choose_upgrade(&mut self, index: usize) -> Result<UpgradeOption, SelectionError> {
        let result = select_upgrade(&mut self.state, index);
        if let Err(err) = &result {
            log::warn!("Rejected upgrade choice: {}", err);
        }
        result
    }

    fn present(&mut self, sink: &mut impl FrameSink) {
        let events = self.state.drain_events();
        let frame = FrameSnapshot::capture(&self.state, events);
        sink.present(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, GamePhase};

    #[test]
    fn test_new_rejects_unusable_tuning() {
        let flat = Tuning {
            playfield_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Driver::new(1, flat),
            Err(TuningError::Invalid(_))
        ));

        let no_levels = Tuning {
            xp_per_level: 0,
            ..Default::default()
        };
        assert!(Driver::new(1, no_levels).is_err());

        let empty_waves = Tuning {
            count_per_wave: 0,
            boss_wave: None,
            ..Default::default()
        };
        assert!(Driver::new(1, empty_waves).is_err());
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut driver = Driver::new(1, Tuning::default()).unwrap();
        let mut frames: Vec<FrameSnapshot> = Vec::new();

        driver.frame(SIM_DT * 3.5, &TickInput::default(), &mut frames);
        assert_eq!(driver.state().time_ticks, 3);
        driver.frame(SIM_DT * 0.6, &TickInput::default(), &mut frames);
        assert_eq!(driver.state().time_ticks, 4);
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_frame_caps_substeps() {
        let mut driver = Driver::new(1, Tuning::default()).unwrap();
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        driver.frame(10.0, &TickInput::default(), &mut frames);
        assert_eq!(driver.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_events_delivered_once() {
        let mut driver = Driver::new(1, Tuning::default()).unwrap();
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        driver.step(&TickInput::default(), &mut frames);
        driver.step(&TickInput::default(), &mut frames);
        assert_eq!(
            frames[0].events,
            vec![GameEvent::WaveStarted { wave: 1, enemies: 3 }]
        );
        assert!(frames[1].events.is_empty());
    }

    #[test]
    fn test_suspended_frames_still_present() {
        let mut driver = Driver::new(1, Tuning::default()).unwrap();
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        driver.step(&TickInput::default(), &mut frames);

        driver.state.pending_offers = 1;
        crate::sim::progression::offer_upgrade(&mut driver.state);
        let ticks = driver.state().time_ticks;

        for _ in 0..5 {
            assert_eq!(
                driver.frame(SIM_DT * 2.0, &TickInput::default(), &mut frames),
                TickOutcome::Suspended
            );
        }
        assert_eq!(driver.state().time_ticks, ticks);
        assert_eq!(frames.len(), 6);
        assert!(frames.last().unwrap().prompt.is_some());

        assert!(driver.choose_upgrade(9).is_err());
        assert_eq!(driver.state().phase, GamePhase::Suspended);
        driver.choose_upgrade(2).unwrap();
        assert_eq!(driver.outcome(), TickOutcome::Running);

        // No backlog of ticks after resuming
        driver.frame(SIM_DT * 1.5, &TickInput::default(), &mut frames);
        assert_eq!(driver.state().time_ticks, ticks + 1);
    }
}
