//! Physics simulation module
//!
//! Per-tick интегратор (gravity + wind) и AABB коллизии снаряда.
//! Без физического движка: мир 2D, тела - квадраты, шаг фиксирован кадром.

use bevy::prelude::*;

pub mod collision;
pub mod integrator;

// Re-export основных типов
pub use collision::{
    classify_collision, detect_projectile_collisions, overlaps, Aabb, CollisionDetected, CollisionKind,
};
pub use integrator::integrate_bodies;

use crate::SimulationSet;

/// Physics Plugin
///
/// Integrate → Collide, оба в Update (1 кадр = 1 тик).
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionDetected>().add_systems(
            Update,
            (
                integrate_bodies.in_set(SimulationSet::Integrate),
                detect_projectile_collisions.in_set(SimulationSet::Collide),
            ),
        );
    }
}
