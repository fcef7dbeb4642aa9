//! Wave scheduler
//!
//! `Idle(n) -> spawn -> Active(n) -> clear -> Idle(n + 1)`. Spawning happens
//! inside a single tick. Enemy count, health and speed are a pure function
//! of the wave index.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::circle_overlap;
use super::entity::{Enemy, EnemyKind, Player};
use super::state::{GameEvent, GameState, WavePhase};
use crate::tuning::{SpawnPlacement, Tuning, WaveClearPolicy};

/// Tries before in-bounds placement falls back to an edge
const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

/// What one wave spawns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePlan {
    pub kind: EnemyKind,
    pub count: u32,
    pub health: f32,
    pub speed: f32,
    pub radius: f32,
}

/// Enemy count and stats for a wave index
pub fn wave_plan(tuning: &Tuning, wave: u32) -> WavePlan {
    let speed = tuning.enemy_base_speed + wave as f32 * tuning.enemy_speed_per_wave;

    if tuning.boss_wave == Some(wave) {
        return WavePlan {
            kind: EnemyKind::Boss,
            count: 1,
            health: tuning.boss_health,
            speed,
            radius: tuning.boss_radius,
        };
    }

    WavePlan {
        kind: EnemyKind::Normal,
        count: tuning.count_per_wave * wave,
        health: tuning.enemy_base_health + wave as f32 * tuning.enemy_health_per_wave,
        speed,
        radius: tuning.enemy_radius,
    }
}

/// Spawn the current wave and mark it active. Returns the number spawned.
pub fn spawn_wave(state: &mut GameState) -> u32 {
    let wave = state.wave.index;
    let plan = wave_plan(&state.tuning, wave);

    for _ in 0..plan.count {
        let pos = spawn_position(
            &state.tuning,
            &mut state.rng,
            &state.entities.player,
            plan.radius,
        );
        let enemy = Enemy::new(plan.kind, pos, plan.radius, plan.health, plan.speed);
        let id = state.entities.add_enemy(enemy);
        log::debug!("Spawned {:?} enemy {:?} at {:?}", plan.kind, id, pos);
    }

    state.wave.phase = WavePhase::Active;
    state.wave.active_ticks = 0;

    if plan.kind == EnemyKind::Boss {
        log::info!("Wave {}: boss with {} hp", wave, plan.health);
    } else {
        log::info!(
            "Wave {}: {} enemies, {} hp, speed {:.2}",
            wave,
            plan.count,
            plan.health,
            plan.speed
        );
    }
    state.events.push(GameEvent::WaveStarted {
        wave,
        enemies: plan.count,
    });

    plan.count
}

/// Pick a spawn point that does not overlap the player
pub fn spawn_position(tuning: &Tuning, rng: &mut Pcg32, player: &Player, radius: f32) -> Vec2 {
    match tuning.placement {
        SpawnPlacement::OffscreenEdge { margin } => {
            edge_position(tuning.bounds(), rng, margin, player.radius + radius)
        }
        SpawnPlacement::RandomInBounds => {
            let bounds = tuning.bounds();
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let pos = Vec2::new(
                    rng.random_range(0.0..bounds.x),
                    rng.random_range(0.0..bounds.y),
                );
                if !circle_overlap(pos, radius, player.pos, player.radius) {
                    return pos;
                }
            }
            log::debug!("No free in-bounds spawn point, using an edge");
            edge_position(bounds, rng, 0.0, player.radius + radius)
        }
    }
}

/// Point outside one of the four edges. The player is clamped inside the
/// playfield, so keeping at least `clearance` away from the edge means no
/// overlap.
fn edge_position(bounds: Vec2, rng: &mut Pcg32, margin: f32, clearance: f32) -> Vec2 {
    let offset = margin.max(clearance);
    match rng.random_range(0..4u8) {
        0 => Vec2::new(-offset, rng.random_range(0.0..bounds.y)),
        1 => Vec2::new(bounds.x + offset, rng.random_range(0.0..bounds.y)),
        2 => Vec2::new(rng.random_range(0.0..bounds.x), -offset),
        _ => Vec2::new(rng.random_range(0.0..bounds.x), bounds.y + offset),
    }
}

/// Advance the scheduler by one tick
pub fn update_waves(state: &mut GameState) {
    if state.wave.phase == WavePhase::Active {
        state.wave.active_ticks = state.wave.active_ticks.saturating_add(1);

        let cleared = match state.tuning.clear_policy {
            WaveClearPolicy::Cleared => state.entities.enemies.is_empty(),
            WaveClearPolicy::Timed { interval_ticks } => state.wave.active_ticks >= interval_ticks,
        };

        if cleared {
            log::debug!(
                "Wave {} cleared after {} ticks ({} enemies left)",
                state.wave.index,
                state.wave.active_ticks,
                state.entities.enemy_count()
            );
            state.wave.index += 1;
            state.wave.phase = WavePhase::Idle {
                intermission_ticks: state.tuning.intermission_ticks,
            };
        }
    }

    if let WavePhase::Idle { intermission_ticks } = state.wave.phase {
        if intermission_ticks == 0 {
            spawn_wave(state);
        } else {
            state.wave.phase = WavePhase::Idle {
                intermission_ticks: intermission_ticks - 1,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::collides;

    fn timed(interval_ticks: u32) -> Tuning {
        Tuning {
            clear_policy: WaveClearPolicy::Timed { interval_ticks },
            ..Default::default()
        }
    }

    #[test]
    fn test_wave_one_plan() {
        let mut state = GameState::new(1);
        assert_eq!(state.player().pos, Vec2::new(450.0, 300.0));
        assert!(state.entities.enemies.is_empty());

        let spawned = spawn_wave(&mut state);
        assert_eq!(spawned, 3);
        assert_eq!(state.entities.enemy_count(), 3);
        for enemy in state.entities.enemies.iter() {
            assert_eq!(enemy.health, 25.0);
            assert!((enemy.speed - 1.2).abs() < 1e-6);
            assert_eq!(enemy.kind, EnemyKind::Normal);
        }
        assert_eq!(state.wave.phase, WavePhase::Active);
        assert_eq!(
            state.events,
            vec![GameEvent::WaveStarted { wave: 1, enemies: 3 }]
        );
    }

    #[test]
    fn test_linear_scaling() {
        let tuning = Tuning::default();
        let plan = wave_plan(&tuning, 4);
        assert_eq!(plan.count, 12);
        assert_eq!(plan.health, 40.0);
        assert!((plan.speed - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_boss_wave_single_spawn() {
        let tuning = Tuning::default();
        let plan = wave_plan(&tuning, 10);
        assert_eq!(plan.kind, EnemyKind::Boss);
        assert_eq!(plan.count, 1);
        assert_eq!(plan.health, 300.0);

        let after = wave_plan(&tuning, 11);
        assert_eq!(after.kind, EnemyKind::Normal);
        assert_eq!(after.count, 33);
    }

    #[test]
    fn test_no_boss_when_disabled() {
        let tuning = Tuning {
            boss_wave: None,
            ..Default::default()
        };
        assert_eq!(wave_plan(&tuning, 10).kind, EnemyKind::Normal);
    }

    #[test]
    fn test_edge_spawns_are_outside_and_clear_of_player() {
        let mut state = GameState::new(3);
        // Player pushed into a corner
        state.entities.player.pos = Vec2::ZERO;
        state.wave.index = 8;
        spawn_wave(&mut state);
        let bounds = state.tuning.bounds();
        for enemy in state.entities.enemies.iter() {
            let p = enemy.pos;
            assert!(p.x < 0.0 || p.y < 0.0 || p.x > bounds.x || p.y > bounds.y);
            assert!(!collides(enemy, state.player()));
        }
    }

    #[test]
    fn test_in_bounds_spawns_never_overlap_player() {
        let tuning = Tuning {
            placement: SpawnPlacement::RandomInBounds,
            playfield_width: 120.0,
            playfield_height: 120.0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(5, tuning);
        state.wave.index = 9;
        spawn_wave(&mut state);
        assert_eq!(state.entities.enemy_count(), 27);
        for enemy in state.entities.enemies.iter() {
            assert!(!collides(enemy, state.player()));
        }
    }

    #[test]
    fn test_cleared_policy_advances_on_empty() {
        let mut state = GameState::new(1);
        update_waves(&mut state);
        assert_eq!(state.wave.index, 1);
        assert_eq!(state.entities.enemy_count(), 3);

        update_waves(&mut state);
        assert_eq!(state.wave.index, 1);

        state.entities.enemies.clear();
        update_waves(&mut state);
        assert_eq!(state.wave.index, 2);
        assert_eq!(state.entities.enemy_count(), 6);
        assert_eq!(state.wave.phase, WavePhase::Active);
    }

    #[test]
    fn test_timed_policy_ignores_survivors() {
        let mut state = GameState::with_tuning(1, timed(3));
        update_waves(&mut state);
        assert_eq!(state.wave.index, 1);

        update_waves(&mut state);
        update_waves(&mut state);
        assert_eq!(state.wave.index, 1);

        update_waves(&mut state);
        assert_eq!(state.wave.index, 2);
        // Wave 1 leftovers plus wave 2
        assert_eq!(state.entities.enemy_count(), 9);
    }

    #[test]
    fn test_timed_policy_waits_even_when_empty() {
        let mut state = GameState::with_tuning(1, timed(10));
        update_waves(&mut state);
        state.entities.enemies.clear();
        update_waves(&mut state);
        assert_eq!(state.wave.index, 1);
    }

    #[test]
    fn test_intermission_delays_spawn() {
        let tuning = Tuning {
            intermission_ticks: 2,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        // First wave spawns immediately
        update_waves(&mut state);
        state.entities.enemies.clear();

        update_waves(&mut state);
        assert_eq!(state.wave.index, 2);
        assert!(state.entities.enemies.is_empty());
        update_waves(&mut state);
        assert!(state.entities.enemies.is_empty());
        update_waves(&mut state);
        assert_eq!(state.entities.enemy_count(), 6);
        assert_eq!(state.wave.index, 2);
    }
}
