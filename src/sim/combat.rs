//! Combat resolution
//!
//! Turns overlaps into damage, deaths and rewards. Each attack/enemy pair is
//! applied at most once per tick. A slash hits a given enemy only once over
//! its whole lifetime; a projectile hits one enemy and is then gone.

use super::collision::{Collider, collides, overlaps};
use super::entity::{Effect, EffectKind, EntityId};
use super::progression::award_kill;
use super::state::{GameEvent, GamePhase, GameState};
use super::store::EntityStore;

/// What happened during one combat pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub hits: u32,
    pub kills: u32,
    /// Enemies touching the player
    pub contacts: u32,
}

/// Run the full combat pass: attacks, contact damage, deaths, game over
pub fn resolve_combat(state: &mut GameState) -> CombatReport {
    let hits = resolve_attacks(state);
    let contacts = apply_contact_damage(state);
    let kills = reap_dead(state);
    check_game_over(state);
    CombatReport {
        hits,
        kills,
        contacts,
    }
}

/// Damage enemies overlapped by live attacks. Consumed projectiles are
/// removed before returning.
pub fn resolve_attacks(state: &mut GameState) -> u32 {
    let EntityStore {
        enemies, effects, ..
    } = &mut state.entities;
    let mut hits = 0;

    for fx in effects.iter_mut().filter(|fx| fx.is_attack()) {
        let (pos, shape) = (fx.position(), fx.shape());
        match fx.kind {
            EffectKind::Projectile => {
                let target = enemies
                    .iter_mut()
                    .find(|e| e.is_alive() && overlaps(pos, shape, e.pos, e.shape()));
                if let Some(enemy) = target {
                    enemy.health -= fx.damage;
                    fx.consumed = true;
                    hits += 1;
                    log::trace!(
                        "Projectile {:?} hit {:?} ({} hp left)",
                        fx.id,
                        enemy.id,
                        enemy.health
                    );
                }
            }
            EffectKind::Slash => {
                for enemy in enemies.iter_mut() {
                    if !enemy.is_alive()
                        || fx.hits.contains(&enemy.id)
                        || !overlaps(pos, shape, enemy.pos, enemy.shape())
                    {
                        continue;
                    }
                    enemy.health -= fx.damage;
                    fx.hits.push(enemy.id);
                    hits += 1;
                    log::trace!(
                        "Slash {:?} hit {:?} ({} hp left)",
                        fx.id,
                        enemy.id,
                        enemy.health
                    );
                }
            }
            EffectKind::Explosion => {}
        }
    }

    effects.retain(|fx| !(fx.kind == EffectKind::Projectile && fx.consumed));
    hits
}

/// Drain player health for every live enemy in contact. Returns the contact count.
pub fn apply_contact_damage(state: &mut GameState) -> u32 {
    let player = &state.entities.player;
    let contacts = state
        .entities
        .enemies
        .iter()
        .filter(|e| e.is_alive() && collides(*e, player))
        .count() as u32;

    if contacts > 0 {
        let amount = contacts as f32 * state.tuning.contact_damage;
        state.entities.player.take_damage(amount);
    }
    contacts
}

/// Remove enemies at or below zero health, leaving an explosion and paying
/// out the kill reward. Returns the kill count.
pub fn reap_dead(state: &mut GameState) -> u32 {
    let dead: Vec<EntityId> = state
        .entities
        .enemies
        .iter()
        .filter(|e| !e.is_alive())
        .map(|e| e.id)
        .collect();

    for id in &dead {
        let Some(enemy) = state.entities.enemies.remove(*id) else {
            continue;
        };
        state.entities.add_effect(Effect::explosion(
            enemy.pos,
            state.tuning.explosion_lifetime_ticks,
        ));
        state.events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
        });
        award_kill(state);
    }
    dead.len() as u32
}

/// Enter the terminal state once the player has no health left
pub fn check_game_over(state: &mut GameState) -> bool {
    if state.is_over() {
        return true;
    }
    if state.entities.player.is_alive() {
        return false;
    }
    state.phase = GamePhase::GameOver;
    let (wave, level, kills) = (state.wave.index, state.player().level, state.kills);
    log::info!("Game over on wave {} at level {} after {} kills", wave, level, kills);
    state.events.push(GameEvent::GameOver { wave, level, kills });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Enemy, EnemyKind, EntityKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::with_tuning(
            9,
            Tuning {
                orb_threshold: None,
                ..Default::default()
            },
        )
    }

    fn enemy(pos: Vec2, health: f32) -> Enemy {
        Enemy::new(EnemyKind::Normal, pos, 10.0, health, 1.2)
    }

    #[test]
    fn test_projectile_hits_one_enemy_and_is_removed() {
        let mut state = state();
        let a = state.entities.add_enemy(enemy(Vec2::new(100.0, 100.0), 25.0));
        let b = state.entities.add_enemy(enemy(Vec2::new(102.0, 100.0), 25.0));
        state.entities.add_effect(Effect::projectile(
            Vec2::new(101.0, 100.0),
            Vec2::ZERO,
            4.0,
            60,
            10.0,
        ));

        assert_eq!(resolve_attacks(&mut state), 1);
        // First in insertion order takes the hit
        assert_eq!(state.entities.enemies.get(a).unwrap().health, 15.0);
        assert_eq!(state.entities.enemies.get(b).unwrap().health, 25.0);
        assert!(state.entities.iter_kind(EntityKind::Projectile).is_empty());
    }

    #[test]
    fn test_slash_hits_each_enemy_once() {
        let mut state = state();
        let a = state.entities.add_enemy(enemy(Vec2::new(100.0, 100.0), 100.0));
        let b = state.entities.add_enemy(enemy(Vec2::new(110.0, 100.0), 100.0));
        state
            .entities
            .add_effect(Effect::slash(Vec2::new(105.0, 100.0), 30.0, 10, 20.0));

        assert_eq!(resolve_attacks(&mut state), 2);
        // Still overlapping next tick, but no second hit
        assert_eq!(resolve_attacks(&mut state), 0);
        assert_eq!(state.entities.enemies.get(a).unwrap().health, 80.0);
        assert_eq!(state.entities.enemies.get(b).unwrap().health, 80.0);
        // Slash stays until its lifetime runs out
        assert_eq!(state.entities.iter_kind(EntityKind::Slash).len(), 1);
    }

    #[test]
    fn test_explosions_deal_no_damage() {
        let mut state = state();
        let a = state.entities.add_enemy(enemy(Vec2::ZERO, 25.0));
        state.entities.add_effect(Effect::explosion(Vec2::ZERO, 20));
        assert_eq!(resolve_attacks(&mut state), 0);
        assert_eq!(state.entities.enemies.get(a).unwrap().health, 25.0);
    }

    #[test]
    fn test_contact_damage_per_enemy() {
        let mut state = state();
        let player_pos = state.player().pos;
        state.entities.add_enemy(enemy(player_pos, 25.0));
        state.entities.add_enemy(enemy(player_pos + Vec2::new(5.0, 0.0), 25.0));
        // Exactly touching: radius 24 + 10
        state.entities.add_enemy(enemy(player_pos + Vec2::new(34.0, 0.0), 25.0));

        assert_eq!(apply_contact_damage(&mut state), 2);
        assert!((state.player().health - 99.8).abs() < 1e-4);
    }

    #[test]
    fn test_dead_enemy_removed_with_reward_and_explosion() {
        let mut state = state();
        let id = state.entities.add_enemy(enemy(Vec2::new(30.0, 40.0), 0.0));
        state.entities.add_enemy(enemy(Vec2::new(500.0, 40.0), 5.0));

        assert_eq!(reap_dead(&mut state), 1);
        assert_eq!(state.entities.enemy_count(), 1);
        assert!(!state.entities.enemies.contains(id));
        assert_eq!(state.player().xp, 10);
        assert_eq!(state.kills, 1);

        let explosions: Vec<_> = state.entities.effects_of(EffectKind::Explosion).collect();
        assert_eq!(explosions.len(), 1);
        assert_eq!(explosions[0].pos, Vec2::new(30.0, 40.0));
        assert!(state.events.contains(&GameEvent::EnemyKilled {
            id,
            kind: EnemyKind::Normal,
            pos: Vec2::new(30.0, 40.0),
        }));
    }

    #[test]
    fn test_killing_blow_reaped_same_pass() {
        let mut state = state();
        let id = state.entities.add_enemy(enemy(Vec2::new(100.0, 100.0), 10.0));
        state.entities.add_effect(Effect::projectile(
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            4.0,
            60,
            10.0,
        ));

        let report = resolve_combat(&mut state);
        assert_eq!(report.hits, 1);
        assert_eq!(report.kills, 1);
        assert!(!state.entities.enemies.contains(id));
    }

    #[test]
    fn test_game_over_is_final() {
        let mut state = state();
        state.entities.player.health = 0.05;
        let pos = state.player().pos;
        state.entities.add_enemy(enemy(pos, 25.0));

        resolve_combat(&mut state);
        assert_eq!(state.player().health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Second check does not emit again
        assert!(check_game_over(&mut state));
        let overs_after = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs_after, 1);
    }
}
