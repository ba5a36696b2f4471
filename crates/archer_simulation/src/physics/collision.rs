//! Collision Detector: AABB overlap + проверка снаряда раз в кадр
//!
//! Порядок проверок (первое совпадение выигрывает):
//! 1. мишень → Hit
//! 2. башня → Miss
//! 3. любой сегмент земли → Miss
//! 4. вылет за границы мира → Miss

use bevy::prelude::*;

use crate::components::{Body, Frozen, Ground, Projectile, Target, Tower};
use crate::config::{BoundsConfig, GameConfig};
use crate::round::{RoundState, ShotOutcome};

/// Axis-aligned прямоугольник с центром и half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, half_extents }
    }

    /// Квадрат: одинаковый half-extent по обеим осям
    pub fn from_center_scale(center: Vec2, scale: f32) -> Self {
        Self::new(center, Vec2::splat(scale))
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// Пересекаются ли два прямоугольника
///
/// false ⇔ на какой-то оси ближняя грань одного строго дальше дальней грани другого.
/// Касание граней считается пересечением. Симметрична.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    !(a_min.x > b_max.x || b_min.x > a_max.x || a_min.y > b_max.y || b_min.y > a_max.y)
}

/// Во что врезался снаряд
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Target,
    Tower,
    Ground,
    OutOfBounds,
}

impl CollisionKind {
    pub fn outcome(&self) -> ShotOutcome {
        match self {
            CollisionKind::Target => ShotOutcome::Hit,
            CollisionKind::Tower | CollisionKind::Ground | CollisionKind::OutOfBounds => ShotOutcome::Miss,
        }
    }
}

/// Событие: снаряд столкнулся (physics → round)
#[derive(Event, Debug, Clone)]
pub struct CollisionDetected {
    pub projectile: Entity,
    pub kind: CollisionKind,
    pub position: Vec2,
}

/// Классифицировать столкновение снаряда (pure, без ECS)
pub fn classify_collision<'a>(
    projectile: &Body,
    targets: impl IntoIterator<Item = &'a Body>,
    towers: impl IntoIterator<Item = &'a Body>,
    grounds: impl IntoIterator<Item = &'a Body>,
    bounds: &BoundsConfig,
) -> Option<CollisionKind> {
    let shot = projectile.aabb();

    if any_overlap(&shot, targets) {
        Some(CollisionKind::Target)
    } else if any_overlap(&shot, towers) {
        Some(CollisionKind::Tower)
    } else if any_overlap(&shot, grounds) {
        Some(CollisionKind::Ground)
    } else if !bounds.contains(projectile.position()) {
        Some(CollisionKind::OutOfBounds)
    } else {
        None
    }
}

fn any_overlap<'a>(shot: &Aabb, bodies: impl IntoIterator<Item = &'a Body>) -> bool {
    bodies.into_iter().any(|body| overlaps(shot, &body.aabb()))
}

/// Система: проверка коллизий снаряда (раз в кадр)
///
/// Работает только в Airborne и когда не идёт взрыв - повторные кадры
/// с тем же overlap не порождают новых событий.
pub fn detect_projectile_collisions(
    state: Res<RoundState>,
    config: Res<GameConfig>,
    projectiles: Query<(Entity, &Body), (With<Projectile>, Without<Frozen>)>,
    obstacles: Query<(&Body, Has<Target>, Has<Tower>, Has<Ground>), Without<Projectile>>,
    mut collisions: EventWriter<CollisionDetected>,
) {
    if state.exploding || !state.is_airborne() {
        return;
    }

    for (entity, projectile) in projectiles.iter() {
        let targets = obstacles.iter().filter(|(_, t, _, _)| *t).map(|(b, ..)| b);
        let towers = obstacles.iter().filter(|(_, _, t, _)| *t).map(|(b, ..)| b);
        let grounds = obstacles.iter().filter(|(_, _, _, g)| *g).map(|(b, ..)| b);

        let Some(kind) = classify_collision(projectile, targets, towers, grounds, &config.bounds) else {
            continue;
        };

        crate::log_info(&format!(
            "Projectile {:?} collided: {:?} at ({:.2}, {:.2})",
            entity, kind, projectile.x, projectile.y
        ));

        collisions.write(CollisionDetected {
            projectile: entity,
            kind,
            position: projectile.position(),
        });
    }
}
