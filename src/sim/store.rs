//! Entity store
//!
//! Owns every live entity. Ids come from one shared counter, so iteration
//! order is insertion order for every collection. Code that removes while
//! walking a pool walks an `ids()` snapshot or uses `retain`.

use glam::Vec2;

use super::entity::{Effect, EffectKind, Enemy, Entity, EntityId, EntityKind, Player};

/// Insertion-ordered collection of one entity type
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Pool<T> {
    /// Append an entity that already carries its id
    fn push(&mut self, entity: T) {
        debug_assert!(
            self.items.last().is_none_or(|last| last.id() < entity.id()),
            "ids must be inserted in increasing order"
        );
        self.items.push(entity);
    }

    /// Remove by id, preserving the order of the rest
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.index_of(id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        // Items are sorted by id
        self.items.binary_search_by_key(&id, |e| e.id()).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Snapshot of live ids, safe to walk while removing
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(Entity::id).collect()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// All game objects of one run
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub effects: Pool<Effect>,
    next_id: u32,
}

impl EntityStore {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Pool::default(),
            effects: Pool::default(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, mut enemy: Enemy) -> EntityId {
        let id = self.allocate_id();
        enemy.assign_id(id);
        self.enemies.push(enemy);
        id
    }

    pub fn add_effect(&mut self, mut effect: Effect) -> EntityId {
        let id = self.allocate_id();
        effect.assign_id(id);
        self.effects.push(effect);
        id
    }

    /// Remove any entity by id
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.enemies.remove(id).is_some() || self.effects.remove(id).is_some()
    }

    /// Ids of live entities of one kind, in insertion order
    pub fn iter_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        match kind {
            EntityKind::Enemy => self.enemies.ids(),
            _ => self
                .effects
                .iter()
                .filter(|e| e.kind() == kind)
                .map(Entity::id)
                .collect(),
        }
    }

    /// Live effects of one kind
    pub fn effects_of(&self, kind: EffectKind) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |e| e.kind == kind)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Enemy nearest to a point
    pub fn nearest_enemy(&self, pos: Vec2) -> Option<&Enemy> {
        self.enemies
            .iter()
            .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
    }
}
