//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within
//! a tick: movement, attacks, effects, combat, waves, progression.

use glam::Vec2;

use super::combat::resolve_combat;
use super::entity::{Effect, EffectKind};
use super::progression::offer_upgrade;
use super::state::{GamePhase, GameState};
use super::wave::update_waves;
use crate::direction_to;

/// Input snapshot for a single tick (sampled once, read-only)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Melee swing held
    pub melee: bool,
    /// Ranged shot held
    pub fire: bool,
    /// Pointer position in playfield coordinates, for aiming shots
    pub aim: Option<Vec2>,
}

impl TickInput {
    /// Held movement keys as a (not normalized) direction
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }

    /// Hold the keys closest to a desired direction
    pub fn steer(&mut self, dir: Vec2) {
        const DEAD_ZONE: f32 = 0.3;
        let dir = dir.normalize_or_zero();
        self.left = dir.x < -DEAD_ZONE;
        self.right = dir.x > DEAD_ZONE;
        self.up = dir.y < -DEAD_ZONE;
        self.down = dir.y > DEAD_ZONE;
    }
}

/// Simulation status after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Waiting on an upgrade pick
    Suspended,
    GameOver,
}

impl From<GamePhase> for TickOutcome {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Running => TickOutcome::Running,
            GamePhase::Suspended => TickOutcome::Suspended,
            GamePhase::GameOver => TickOutcome::GameOver,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    // Suspended and finished games do not change at all
    if state.phase != GamePhase::Running {
        return state.phase.into();
    }

    state.time_ticks += 1;

    move_entities(state, input);
    update_attacks(state, input);
    advance_effects(state);

    resolve_combat(state);
    if state.is_over() {
        return TickOutcome::GameOver;
    }

    update_waves(state);
    offer_upgrade(state);

    state.phase.into()
}

/// Walk the player from held keys and steer every enemy toward it
fn move_entities(state: &mut GameState, input: &TickInput) {
    let bounds = state.tuning.bounds();
    let player = &mut state.entities.player;
    player.walk(input.movement(), bounds);

    let target = player.pos;
    for enemy in state.entities.enemies.iter_mut() {
        enemy.chase(target);
    }
}

/// Count down the attack cooldown and start a new attack if one is held
fn update_attacks(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    let player = &mut state.entities.player;

    if player.attack_cooldown > 0 {
        player.attack_cooldown -= 1;
    }
    if player.attack_cooldown > 0 || !(input.melee || input.fire) {
        return;
    }
    player.attack_cooldown = player.cooldown_ticks();

    let effect = if input.melee {
        Effect::slash(
            player.pos + player.facing * tuning.slash_reach,
            tuning.slash_half_extent,
            tuning.slash_lifetime_ticks,
            player.stats.damage * tuning.melee_multiplier,
        )
    } else {
        let aim = input
            .aim
            .map(|target| direction_to(player.pos, target))
            .filter(|dir| *dir != Vec2::ZERO)
            .unwrap_or(player.facing);
        Effect::projectile(
            player.pos,
            aim * player.stats.projectile_speed,
            tuning.projectile_radius,
            tuning.projectile_lifetime_ticks,
            player.stats.damage,
        )
    };
    let id = state.entities.add_effect(effect);
    log::trace!("Attack {:?} started", id);
}

/// Move effects, count down lifetimes, drop expired and off-field ones
fn advance_effects(state: &mut GameState) {
    let bounds = state.tuning.bounds();
    let effects = &mut state.entities.effects;

    for fx in effects.iter_mut() {
        fx.advance();
    }
    effects.retain(|fx| {
        let on_field = fx.kind != EffectKind::Projectile
            || (fx.pos.cmpge(Vec2::ZERO).all() && fx.pos.cmple(bounds).all());
        fx.lifetime > 0 && on_field
    });
}
