//! Game state and core simulation types
//!
//! One `GameState` holds everything a run needs. It is built at game start
//! and only mutated through the sim components.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EnemyKind, EntityId, Player, Stat};
use super::progression::UpgradePrompt;
use super::store::EntityStore;
use crate::tuning::Tuning;

/// Current phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticking normally
    Running,
    /// Waiting for an upgrade pick; nothing advances
    Suspended,
    /// Player died; final
    GameOver,
}

/// Wave scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting to spawn the current wave index
    Idle { intermission_ticks: u32 },
    /// Wave spawned and being fought
    Active,
}

/// Wave progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave (starts at 1)
    pub index: u32,
    pub phase: WavePhase,
    /// Ticks since the current wave spawned
    pub active_ticks: u32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            index: 1,
            phase: WavePhase::Idle {
                intermission_ticks: 0,
            },
            active_ticks: 0,
        }
    }
}

/// Something that happened during a tick, for renderers and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: u32 },
    EnemyKilled { id: EntityId, kind: EnemyKind, pos: Vec2 },
    LevelUp { level: u32 },
    UpgradeOffered { options: usize },
    UpgradeApplied { name: String, stat: Stat, delta: f32 },
    GameOver { wave: u32, level: u32, kills: u32 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter (frozen while suspended)
    pub time_ticks: u64,
    pub entities: EntityStore,
    pub wave: WaveState,
    /// Prompt shown while suspended
    pub prompt: Option<UpgradePrompt>,
    /// Upgrade offers earned but not yet presented
    pub pending_offers: u32,
    pub kills: u32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game; the player starts at the playfield centre.
    ///
    /// `tuning` must pass [`Tuning::validate`]; `Driver::new` checks this.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let center = tuning.bounds() / 2.0;
        let player = Player::new(center, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            time_ticks: 0,
            entities: EntityStore::new(player),
            wave: WaveState::default(),
            prompt: None,
            pending_offers: 0,
            kills: 0,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn player(&self) -> &Player {
        &self.entities.player
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
