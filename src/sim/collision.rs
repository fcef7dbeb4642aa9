//! Overlap tests between entity shapes
//!
//! Player, enemies, projectiles and explosions are circles; the melee slash
//! is an axis-aligned box. Every comparison is strict, so shapes that only
//! touch do NOT overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision geometry, centred on the owning entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Aabb { half_extents: Vec2 },
}

/// Anything with a position and a shape
pub trait Collider {
    fn position(&self) -> Vec2;
    fn shape(&self) -> Shape;
}

/// Whether two colliders overlap
pub fn collides(a: &impl Collider, b: &impl Collider) -> bool {
    overlaps(a.position(), a.shape(), b.position(), b.shape())
}

/// Whether two centred shapes overlap
pub fn overlaps(pos_a: Vec2, a: Shape, pos_b: Vec2, b: Shape) -> bool {
    match (a, b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_overlap(pos_a, ra, pos_b, rb)
        }
        (Shape::Aabb { half_extents: ha }, Shape::Aabb { half_extents: hb }) => {
            aabb_overlap(pos_a - ha, ha * 2.0, pos_b - hb, hb * 2.0)
        }
        (Shape::Circle { radius }, Shape::Aabb { half_extents }) => {
            circle_aabb_overlap(pos_a, radius, pos_b, half_extents)
        }
        (Shape::Aabb { half_extents }, Shape::Circle { radius }) => {
            circle_aabb_overlap(pos_b, radius, pos_a, half_extents)
        }
    }
}

/// Box test on top-left corners and sizes
#[inline]
pub fn aabb_overlap(a_min: Vec2, a_size: Vec2, b_min: Vec2, b_size: Vec2) -> bool {
    a_min.x < b_min.x + b_size.x
        && a_min.x + a_size.x > b_min.x
        && a_min.y < b_min.y + b_size.y
        && a_min.y + a_size.y > b_min.y
}

#[inline]
pub fn circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Circle against a box centred at `box_center`
pub fn circle_aabb_overlap(
    center: Vec2,
    radius: f32,
    box_center: Vec2,
    half_extents: Vec2,
) -> bool {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    center.distance_squared(closest) < radius * radius
}
