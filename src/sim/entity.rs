//! Game objects: the player, enemies and transient effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, Shape};
use crate::tuning::Tuning;

/// Identifier handed out by the entity store, increasing in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which collection an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy,
    Projectile,
    Slash,
    Explosion,
}

/// An entity the store can own
pub trait Entity {
    fn id(&self) -> EntityId;
    fn assign_id(&mut self, id: EntityId);
    fn kind(&self) -> EntityKind;
}

/// Upgradeable player stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    MaxHealth,
    Damage,
    MoveSpeed,
    /// Ticks between attacks; lower is faster
    AttackCooldown,
    ProjectileSpeed,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::MaxHealth,
        Stat::Damage,
        Stat::MoveSpeed,
        Stat::AttackCooldown,
        Stat::ProjectileSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::MaxHealth => "max_health",
            Stat::Damage => "damage",
            Stat::MoveSpeed => "move_speed",
            Stat::AttackCooldown => "attack_cooldown",
            Stat::ProjectileSpeed => "projectile_speed",
        }
    }
}

/// Current value of every upgradeable stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health: f32,
    pub damage: f32,
    pub move_speed: f32,
    pub attack_cooldown: f32,
    pub projectile_speed: f32,
}

impl PlayerStats {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            max_health: tuning.player_max_health,
            damage: tuning.player_damage,
            move_speed: tuning.player_speed,
            attack_cooldown: tuning.attack_cooldown_ticks as f32,
            projectile_speed: tuning.projectile_speed,
        }
    }

    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::MaxHealth => self.max_health,
            Stat::Damage => self.damage,
            Stat::MoveSpeed => self.move_speed,
            Stat::AttackCooldown => self.attack_cooldown,
            Stat::ProjectileSpeed => self.projectile_speed,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::MaxHealth => &mut self.max_health,
            Stat::Damage => &mut self.damage,
            Stat::MoveSpeed => &mut self.move_speed,
            Stat::AttackCooldown => &mut self.attack_cooldown,
            Stat::ProjectileSpeed => &mut self.projectile_speed,
        }
    }

    /// Lowest value a stat may be pushed to by upgrades
    fn floor(stat: Stat) -> f32 {
        match stat {
            Stat::MaxHealth | Stat::AttackCooldown => 1.0,
            Stat::Damage | Stat::MoveSpeed | Stat::ProjectileSpeed => 0.0,
        }
    }

    /// Add `delta` to a stat, clamped to its floor. Returns the applied change.
    pub fn adjust(&mut self, stat: Stat, delta: f32) -> f32 {
        let slot = self.slot(stat);
        let before = *slot;
        *slot = (before + delta).max(Self::floor(stat));
        *slot - before
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Last non-zero movement direction (unit length)
    pub facing: Vec2,
    pub health: f32,
    pub stats: PlayerStats,
    /// Ticks until the next attack is allowed
    pub attack_cooldown: u32,
    pub xp: u32,
    pub level: u32,
    pub orbs: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        let stats = PlayerStats::from_tuning(tuning);
        Self {
            pos,
            radius: tuning.player_radius,
            facing: Vec2::X,
            health: stats.max_health,
            stats,
            attack_cooldown: 0,
            xp: 0,
            level: 1,
            orbs: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Lose health, never dropping below zero
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    /// Attack cooldown in whole ticks
    pub fn cooldown_ticks(&self) -> u32 {
        self.stats.attack_cooldown.round().max(1.0) as u32
    }

    /// Apply an upgrade delta, keeping health within its bounds
    pub fn apply_upgrade(&mut self, stat: Stat, delta: f32) {
        let applied = self.stats.adjust(stat, delta);
        if stat == Stat::MaxHealth && applied > 0.0 {
            self.health += applied;
        }
        self.health = self.health.min(self.stats.max_health);
    }

    /// Move by `dir * speed` and clamp into the playfield
    pub fn walk(&mut self, dir: Vec2, bounds: Vec2) {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        self.facing = dir;
        self.pos = (self.pos + dir * self.stats.move_speed).clamp(Vec2::ZERO, bounds);
    }
}

impl Collider for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::Circle {
            radius: self.radius,
        }
    }
}

/// Enemy difficulty tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Boss,
}

/// A hostile entity chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, radius: f32, health: f32, speed: f32) -> Self {
        Self {
            id: EntityId(0),
            kind,
            pos,
            radius,
            health,
            max_health: health,
            speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Step toward `target` at this enemy's speed
    pub fn chase(&mut self, target: Vec2) {
        self.pos = crate::step_toward(self.pos, target, self.speed);
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }
}

impl Collider for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::Circle {
            radius: self.radius,
        }
    }
}

/// Kind of transient effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Projectile,
    Slash,
    Explosion,
}

/// A short-lived entity: projectile, melee swing or death explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: EntityId,
    pub kind: EffectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    /// Remaining ticks
    pub lifetime: u32,
    pub max_lifetime: u32,
    pub damage: f32,
    /// Projectile already hit something
    pub consumed: bool,
    /// Enemies this slash has already damaged
    #[serde(default)]
    pub hits: Vec<EntityId>,
}

impl Effect {
    pub fn projectile(pos: Vec2, vel: Vec2, radius: f32, lifetime: u32, damage: f32) -> Self {
        Self::new(EffectKind::Projectile, pos, vel, Shape::Circle { radius }, lifetime, damage)
    }

    pub fn slash(pos: Vec2, half_extent: f32, lifetime: u32, damage: f32) -> Self {
        let shape = Shape::Aabb {
            half_extents: Vec2::splat(half_extent),
        };
        Self::new(EffectKind::Slash, pos, Vec2::ZERO, shape, lifetime, damage)
    }

    pub fn explosion(pos: Vec2, lifetime: u32) -> Self {
        let shape = Shape::Circle {
            radius: crate::consts::EXPLOSION_RADIUS,
        };
        Self::new(EffectKind::Explosion, pos, Vec2::ZERO, shape, lifetime, 0.0)
    }

    fn new(
        kind: EffectKind,
        pos: Vec2,
        vel: Vec2,
        shape: Shape,
        lifetime: u32,
        damage: f32,
    ) -> Self {
        Self {
            id: EntityId(0),
            kind,
            pos,
            vel,
            shape,
            lifetime,
            max_lifetime: lifetime,
            damage,
            consumed: false,
            hits: Vec::new(),
        }
    }

    /// Whether this effect can still deal damage
    pub fn is_attack(&self) -> bool {
        match self.kind {
            EffectKind::Projectile => !self.consumed,
            EffectKind::Slash => true,
            EffectKind::Explosion => false,
        }
    }

    /// Remaining life as a 0-1 fraction (for fading)
    pub fn life_fraction(&self) -> f32 {
        if self.max_lifetime == 0 {
            0.0
        } else {
            self.lifetime as f32 / self.max_lifetime as f32
        }
    }

    /// Advance one tick: move and count down
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.lifetime = self.lifetime.saturating_sub(1);
    }
}

impl Entity for Effect {
    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn kind(&self) -> EntityKind {
        match self.kind {
            EffectKind::Projectile => EntityKind::Projectile,
            EffectKind::Slash => EntityKind::Slash,
            EffectKind::Explosion => EntityKind::Explosion,
        }
    }
}

impl Collider for Effect {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_full_health_level_one() {
        let tuning = Tuning::default();
        let player = Player::new(Vec2::new(450.0, 300.0), &tuning);
        assert_eq!(player.health, player.stats.max_health);
        assert_eq!(player.level, 1);
        assert_eq!(player.xp, 0);
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut player = Player::new(Vec2::ZERO, &Tuning::default());
        player.take_damage(1_000.0);
        assert_eq!(player.health, 0.0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_max_health_upgrade_heals_by_delta() {
        let mut player = Player::new(Vec2::ZERO, &Tuning::default());
        player.health = 50.0;
        player.apply_upgrade(Stat::MaxHealth, 20.0);
        assert_eq!(player.stats.max_health, 120.0);
        assert_eq!(player.health, 70.0);
    }

    #[test]
    fn test_max_health_downgrade_clamps_health() {
        let mut player = Player::new(Vec2::ZERO, &Tuning::default());
        player.apply_upgrade(Stat::MaxHealth, -30.0);
        assert_eq!(player.stats.max_health, 70.0);
        assert_eq!(player.health, 70.0);
    }

    #[test]
    fn test_cooldown_never_below_one_tick() {
        let mut player = Player::new(Vec2::ZERO, &Tuning::default());
        player.apply_upgrade(Stat::AttackCooldown, -100.0);
        assert_eq!(player.cooldown_ticks(), 1);
    }

    #[test]
    fn test_walk_clamps_to_bounds_and_tracks_facing() {
        let mut player = Player::new(Vec2::new(2.0, 300.0), &Tuning::default());
        player.walk(Vec2::NEG_X, Vec2::new(900.0, 600.0));
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.facing, Vec2::NEG_X);

        player.walk(Vec2::ZERO, Vec2::new(900.0, 600.0));
        assert_eq!(player.facing, Vec2::NEG_X);
    }

    #[test]
    fn test_enemy_chase_coincident_stays_finite() {
        let mut enemy = Enemy::new(EnemyKind::Normal, Vec2::new(5.0, 5.0), 20.0, 25.0, 1.2);
        enemy.chase(Vec2::new(5.0, 5.0));
        assert!(enemy.pos.is_finite());
        assert_eq!(enemy.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_effect_lifetime_counts_down_to_zero() {
        let mut fx = Effect::explosion(Vec2::ZERO, 2);
        fx.advance();
        assert_eq!(fx.lifetime, 1);
        fx.advance();
        fx.advance();
        assert_eq!(fx.lifetime, 0);
        assert_eq!(fx.life_fraction(), 0.0);
    }

    #[test]
    fn test_stat_lookup_matches_fields() {
        let stats = PlayerStats::from_tuning(&Tuning::default());
        for stat in Stat::ALL {
            let mut copy = stats.clone();
            copy.adjust(stat, 1.0);
            assert!((copy.get(stat) - stats.get(stat) - 1.0).abs() < 1e-6);
        }
    }
}
