//! Idle/demo mode: an input source that plays the game
//!
//! Keeps its distance from the nearest enemy, slashes what gets close and
//! shoots at the rest. Used by the headless binary and for soak tests.

use glam::Vec2;

use crate::direction_to;
use crate::sim::{GameState, Stat, TickInput, UpgradePrompt};

/// Distance from a wall at which the pilot starts steering back in
const WALL_COMFORT: f32 = 80.0;

/// Pick this tick's input from the current state
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = state.player();
    let mut input = TickInput::default();

    let Some(nearest) = state.entities.nearest_enemy(player.pos) else {
        // Nothing to fight: drift back toward the middle
        let center = state.tuning.bounds() / 2.0;
        if player.pos.distance(center) > WALL_COMFORT {
            input.steer(direction_to(player.pos, center));
        }
        return input;
    };

    let dist = player.pos.distance(nearest.pos);
    let away = direction_to(nearest.pos, player.pos);
    let danger = player.radius + nearest.radius + 30.0;
    let melee_range = player.radius + nearest.radius + state.tuning.slash_reach;

    let desired = if dist < danger {
        away
    } else if dist > 250.0 {
        -away
    } else {
        // Circle around at a safe distance
        Vec2::new(-away.y, away.x)
    };
    input.steer(desired + wall_push(player.pos, state.tuning.bounds()));

    input.melee = dist < melee_range;
    input.fire = !input.melee;
    input.aim = Some(nearest.pos);
    input
}

/// Pull away from nearby walls so the pilot does not get pinned
fn wall_push(pos: Vec2, bounds: Vec2) -> Vec2 {
    let mut push = Vec2::ZERO;
    if pos.x < WALL_COMFORT {
        push.x += 1.0;
    }
    if pos.x > bounds.x - WALL_COMFORT {
        push.x -= 1.0;
    }
    if pos.y < WALL_COMFORT {
        push.y += 1.0;
    }
    if pos.y > bounds.y - WALL_COMFORT {
        push.y -= 1.0;
    }
    push
}

/// Choose an option: health when hurt, otherwise damage, otherwise the first
pub fn autopilot_pick(state: &GameState, prompt: &UpgradePrompt) -> usize {
    let player = state.player();
    let hurt = player.health < player.stats.max_health * 0.5;
    let wanted = if hurt { Stat::MaxHealth } else { Stat::Damage };

    prompt
        .options
        .iter()
        .position(|o| o.stat == wanted)
        .unwrap_or(0)
}
