//! Data-driven game balance
//!
//! Every number the simulation scales by lives here. Loaded from JSON; any
//! field missing from the file keeps its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::upgrade_pool;

/// When the active wave counts as cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaveClearPolicy {
    /// Advance as soon as no enemies are left alive
    #[default]
    Cleared,
    /// Advance after a fixed number of active ticks, enemies or not
    Timed { interval_ticks: u32 },
}

/// Where new enemies appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPlacement {
    /// Just outside one of the four playfield edges
    OffscreenEdge { margin: f32 },
    /// Uniformly inside the playfield, away from the player
    RandomInBounds,
}

impl Default for SpawnPlacement {
    fn default() -> Self {
        SpawnPlacement::OffscreenEdge { margin: 50.0 }
    }
}

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_max_health: f32,
    pub player_damage: f32,
    /// Ticks between attacks (melee and ranged share it)
    pub attack_cooldown_ticks: u32,
    /// Health lost per tick per touching enemy
    pub contact_damage: f32,

    // === Attacks ===
    /// Slash damage = player damage * this
    pub melee_multiplier: f32,
    pub slash_half_extent: f32,
    /// Distance the slash hitbox sits ahead of the player
    pub slash_reach: f32,
    pub slash_lifetime_ticks: u32,
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime_ticks: u32,
    pub explosion_lifetime_ticks: u32,

    // === Waves ===
    pub clear_policy: WaveClearPolicy,
    pub placement: SpawnPlacement,
    /// Idle ticks between a clear and the next spawn
    pub intermission_ticks: u32,
    pub count_per_wave: u32,
    pub enemy_base_health: f32,
    pub enemy_health_per_wave: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_wave: f32,
    pub enemy_radius: f32,
    /// Wave that spawns a single boss instead of a swarm
    pub boss_wave: Option<u32>,
    pub boss_health: f32,
    pub boss_radius: f32,

    // === Progression ===
    pub xp_per_kill: u32,
    /// Required xp = level * this
    pub xp_per_level: u32,
    /// Kills that fill the orb counter and earn an extra upgrade
    pub orb_threshold: Option<u32>,
    /// Upgrade options shown per prompt
    pub option_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            player_max_health: PLAYER_MAX_HEALTH,
            player_damage: PLAYER_DAMAGE,
            attack_cooldown_ticks: PLAYER_ATTACK_COOLDOWN,
            contact_damage: 0.1,

            melee_multiplier: 2.0,
            slash_half_extent: SLASH_HALF_EXTENT,
            slash_reach: SLASH_REACH,
            slash_lifetime_ticks: SLASH_LIFETIME,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_lifetime_ticks: PROJECTILE_LIFETIME,
            explosion_lifetime_ticks: EXPLOSION_LIFETIME,

            clear_policy: WaveClearPolicy::Cleared,
            placement: SpawnPlacement::default(),
            intermission_ticks: 0,
            count_per_wave: 3,
            enemy_base_health: 20.0,
            enemy_health_per_wave: 5.0,
            enemy_base_speed: 1.0,
            enemy_speed_per_wave: 0.2,
            enemy_radius: ENEMY_RADIUS,
            boss_wave: Some(10),
            boss_health: 300.0,
            boss_radius: BOSS_RADIUS,

            xp_per_kill: 10,
            xp_per_level: 50,
            orb_threshold: Some(5),
            option_count: 3,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return invalid("playfield dimensions must be positive");
        }
        if !(self.player_max_health > 0.0) {
            return invalid("player_max_health must be positive");
        }
        if self.attack_cooldown_ticks == 0 {
            return invalid("attack_cooldown_ticks must be at least 1");
        }
        if self.xp_per_level == 0 {
            return invalid("xp_per_level must be at least 1");
        }
        if self.option_count == 0 {
            return invalid("option_count must be at least 1");
        }
        let pool = upgrade_pool().len();
        if self.option_count > pool {
            return invalid(&format!(
                "option_count {} exceeds the {} available upgrades",
                self.option_count, pool
            ));
        }
        if self.count_per_wave == 0 {
            return invalid("count_per_wave must be at least 1");
        }
        if !(self.enemy_base_health > 0.0) || self.enemy_health_per_wave < 0.0 {
            return invalid("enemy health must start positive and never shrink");
        }
        if self.boss_wave.is_some() && !(self.boss_health > 0.0) {
            return invalid("boss_health must be positive");
        }
        if self.orb_threshold == Some(0) {
            return invalid("orb_threshold must be at least 1 when set");
        }
        if let WaveClearPolicy::Timed { interval_ticks: 0 } = self.clear_policy {
            return invalid("timed clear interval must be at least 1 tick");
        }
        if let SpawnPlacement::OffscreenEdge { margin } = self.placement {
            if margin < 0.0 {
                return invalid("offscreen margin must not be negative");
            }
        }
        if self.contact_damage < 0.0 || self.player_damage < 0.0 {
            return invalid("damage values must not be negative");
        }
        Ok(())
    }

    /// Playfield size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.playfield_width, self.playfield_height)
    }
}
