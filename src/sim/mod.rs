//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod entity;
pub mod frame;
pub mod progression;
pub mod state;
pub mod store;
pub mod tick;
pub mod wave;

pub use collision::{Collider, Shape, collides, overlaps};
pub use combat::{CombatReport, resolve_combat};
pub use entity::{
    Effect, EffectKind, Enemy, EnemyKind, EntityId, EntityKind, Player, PlayerStats, Stat,
};
pub use frame::{FrameSink, FrameSnapshot};
pub use progression::{
    SelectionError, UpgradeOption, UpgradePrompt, required_xp, select_upgrade, upgrade_pool,
};
pub use state::{GameEvent, GamePhase, GameState, WavePhase, WaveState};
pub use store::{EntityStore, Pool};
pub use tick::{TickInput, TickOutcome, tick};
pub use wave::{WavePlan, spawn_wave, wave_plan};
