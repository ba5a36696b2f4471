//! Integrator: один тик для всех Body
//!
//! Статичные тела (лучник, земля, башня, мишень) интегрируются вместе со снарядом -
//! для них это no-op. Frozen тела (взрыв) пропускаются.

use bevy::prelude::*;

use crate::components::{Body, Frozen, Projectile};
use crate::config::GameConfig;

/// Система: advance всех активных Body на один тик
///
/// Floor policy применяется только к gravity-телам (см. `FloorPolicy::allows`).
pub fn integrate_bodies(
    config: Res<GameConfig>,
    mut bodies: Query<(Entity, &mut Body, Has<Projectile>), Without<Frozen>>,
) {
    for (entity, mut body, is_projectile) in bodies.iter_mut() {
        if !config.floor_policy.allows(&body) {
            continue;
        }

        body.advance(&config.physics);

        if is_projectile {
            crate::log(&format!(
                "Projectile {:?}: pos=({:.3}, {:.3}) dx={:.5} dy={:.5}",
                entity, body.x, body.y, body.dx, body.dy
            ));
        }
    }
}
