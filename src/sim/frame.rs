//! Renderer-facing view of the simulation
//!
//! A `FrameSnapshot` is everything a renderer, HUD or upgrade picker needs to
//! draw one frame. It owns its data so the simulation can move on while the
//! frame is being drawn.

use glam::Vec2;
use serde::Serialize;

use super::entity::{EffectKind, EnemyKind, EntityId};
use super::progression::{UpgradeOption, required_xp};
use super::state::{GameEvent, GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_required: u32,
    pub orbs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    /// 0-1 for health bars
    pub health_fraction: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub id: EntityId,
    pub kind: EffectKind,
    pub pos: Vec2,
    /// 0-1 remaining life, for fading
    pub fade: f32,
}

/// One frame's worth of state
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    /// Run seed, so a recording can be replayed
    pub seed: u64,
    pub tick: u64,
    pub phase: GamePhase,
    pub wave: u32,
    pub kills: u32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub effects: Vec<EffectView>,
    /// Options to show while suspended
    pub prompt: Option<Vec<UpgradeOption>>,
    pub events: Vec<GameEvent>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        let player = state.player();
        Self {
            seed: state.seed,
            tick: state.time_ticks,
            phase: state.phase,
            wave: state.wave.index,
            kills: state.kills,
            player: PlayerView {
                pos: player.pos,
                facing: player.facing,
                health: player.health,
                max_health: player.stats.max_health,
                level: player.level,
                xp: player.xp,
                xp_required: required_xp(&state.tuning, player.level),
                orbs: player.orbs,
            },
            enemies: state
                .entities
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    radius: e.radius,
                    health_fraction: (e.health / e.max_health).clamp(0.0, 1.0),
                })
                .collect(),
            effects: state
                .entities
                .effects
                .iter()
                .map(|fx| EffectView {
                    id: fx.id,
                    kind: fx.kind,
                    pos: fx.pos,
                    fade: fx.life_fraction(),
                })
                .collect(),
            prompt: state.prompt.as_ref().map(|p| p.options.clone()),
            events,
        }
    }
}

/// Receives a snapshot once per frame (renderer, HUD, recorder)
pub trait FrameSink {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Keeps every frame; handy for tests and replays
impl FrameSink for Vec<FrameSnapshot> {
    fn present(&mut self, frame: &FrameSnapshot) {
        self.push(frame.clone());
    }
}
