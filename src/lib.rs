//! Ember Waves - A wave-survival action game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, waves, progression)
//! - `tuning`: Data-driven game balance
//! - `driver`: Fixed-timestep frame driver handing snapshots to a renderer
//! - `autopilot`: Idle/demo input source that plays the game

pub mod autopilot;
pub mod driver;
pub mod sim;
pub mod tuning;

pub use driver::Driver;
pub use tuning::{SpawnPlacement, Tuning, TuningError, WaveClearPolicy};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 900.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 24.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_DAMAGE: f32 = 10.0;
    /// Ticks between attacks
    pub const PLAYER_ATTACK_COOLDOWN: u32 = 20;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const BOSS_RADIUS: f32 = 30.0;

    /// Transient effect defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const PROJECTILE_SPEED: f32 = 8.0;
    pub const PROJECTILE_LIFETIME: u32 = 120;
    pub const SLASH_HALF_EXTENT: f32 = 30.0;
    pub const SLASH_REACH: f32 = 20.0;
    pub const SLASH_LIFETIME: u32 = 10;
    pub const EXPLOSION_RADIUS: f32 = 32.0;
    pub const EXPLOSION_LIFETIME: u32 = 20;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Move `from` toward `to` by at most `step`, never overshooting
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= step || dist == 0.0 {
        to
    } else {
        from + delta / dist * step
    }
}
