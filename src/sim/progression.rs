//! Experience, levels and upgrade picks
//!
//! Kills feed two independent offer sources: the xp threshold
//! (`level * xp_per_level`, with carry-over) and the orb counter. Each earned
//! offer is queued; while a prompt is shown the simulation is suspended.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::Stat;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Every upgrade that can be offered: (name, stat, delta)
const UPGRADE_TABLE: [(&str, Stat, f32); 6] = [
    ("Vitality", Stat::MaxHealth, 20.0),
    ("Brutality", Stat::Damage, 5.0),
    ("Fleet Foot", Stat::MoveSpeed, 0.5),
    ("Quick Hands", Stat::AttackCooldown, -3.0),
    ("Velocity", Stat::ProjectileSpeed, 2.0),
    ("Iron Heart", Stat::MaxHealth, 40.0),
];

/// One permanent stat modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub name: String,
    pub stat: Stat,
    pub delta: f32,
}

/// The fixed upgrade pool
pub fn upgrade_pool() -> Vec<UpgradeOption> {
    UPGRADE_TABLE
        .iter()
        .map(|&(name, stat, delta)| UpgradeOption {
            name: name.to_string(),
            stat,
            delta,
        })
        .collect()
}

/// Options currently offered to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradePrompt {
    pub options: Vec<UpgradeOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no upgrade prompt is active")]
    NoPrompt,
    #[error("option {index} is out of range (prompt has {len} options)")]
    OutOfRange { index: usize, len: usize },
}

/// Experience needed to leave `level`
pub fn required_xp(tuning: &Tuning, level: u32) -> u32 {
    level.saturating_mul(tuning.xp_per_level)
}

/// Draw up to `count` distinct options from the pool
pub fn draw_options<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<UpgradeOption> {
    let pool = upgrade_pool();
    let amount = count.min(pool.len());
    rand::seq::index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}

/// Credit one kill: xp, orbs, and any level-ups it causes
pub fn award_kill(state: &mut GameState) {
    state.kills += 1;
    let player = &mut state.entities.player;
    player.xp += state.tuning.xp_per_kill;
    player.orbs += 1;

    if let Some(threshold) = state.tuning.orb_threshold {
        if player.orbs >= threshold {
            player.orbs = 0;
            state.pending_offers += 1;
            log::debug!("Orb counter filled, upgrade queued");
        }
    }

    apply_level_ups(state);
}

/// Convert banked xp into levels, carrying the excess over. Returns levels gained.
pub fn apply_level_ups(state: &mut GameState) -> u32 {
    let mut gained = 0;
    loop {
        let player = &mut state.entities.player;
        let required = required_xp(&state.tuning, player.level);
        if player.xp < required {
            break;
        }
        player.xp -= required;
        player.level += 1;
        gained += 1;
        state.pending_offers += 1;

        let level = player.level;
        log::info!("Level up! Now level {} ({} xp carried)", level, player.xp);
        state.events.push(GameEvent::LevelUp { level });
    }
    gained
}

/// Show the next queued offer, suspending the simulation. Returns whether a
/// prompt was raised.
pub fn offer_upgrade(state: &mut GameState) -> bool {
    if state.prompt.is_some() || state.pending_offers == 0 || state.is_over() {
        return false;
    }
    state.pending_offers -= 1;

    let options = draw_options(&mut state.rng, state.tuning.option_count);
    log::debug!(
        "Upgrade prompt: {:?}",
        options.iter().map(|o| o.name.as_str()).collect::<Vec<_>>()
    );
    state.events.push(GameEvent::UpgradeOffered {
        options: options.len(),
    });
    state.prompt = Some(UpgradePrompt { options });
    state.phase = GamePhase::Suspended;
    true
}

/// Apply the chosen option and resume (or show the next queued prompt).
/// An invalid choice changes nothing and leaves the prompt up.
pub fn select_upgrade(
    state: &mut GameState,
    index: usize,
) -> Result<UpgradeOption, SelectionError> {
    let prompt = state.prompt.as_ref().ok_or(SelectionError::NoPrompt)?;
    let option = prompt
        .options
        .get(index)
        .cloned()
        .ok_or(SelectionError::OutOfRange {
            index,
            len: prompt.options.len(),
        })?;

    state.prompt = None;
    state.entities.player.apply_upgrade(option.stat, option.delta);
    log::info!("Upgrade picked: {} ({} {:+})", option.name, option.stat.as_str(), option.delta);
    state.events.push(GameEvent::UpgradeApplied {
        name: option.name.clone(),
        stat: option.stat,
        delta: option.delta,
    });

    if !offer_upgrade(state) {
        state.phase = GamePhase::Running;
    }
    Ok(option)
}
