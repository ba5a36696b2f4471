//! Projectile Controller
//!
//! - Не больше одного снаряда в полёте (fire - no-op пока снаряд есть)
//! - Стартовая скорость из угла и мощности + bias 0.2 по обеим осям
//! - Дальше снаряд интегрируется physics::integrate_bodies каждый кадр

use bevy::prelude::*;

use crate::components::{Body, Projectile, Wind};
use crate::config::LaunchConfig;
use crate::render::MaterialHandle;
use crate::rollback::Rollback;
use crate::round::RoundState;

/// Событие: снаряд выпущен
#[derive(Event, Debug, Clone)]
pub struct ProjectileFired {
    pub projectile: Entity,
    pub angle: f32,
    pub power: f32,
    pub velocity: Vec2,
}

/// Стартовая скорость снаряда
///
/// dx = bias + (power/100)·cos(angle), dy = bias + (power/100)·sin(angle), angle в градусах.
/// Bias гарантирует движение вперёд и вверх при любых крайних настройках.
pub fn launch_velocity(angle_degrees: f32, power: f32, bias: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    let speed = power / 100.0;
    Vec2::new(bias + speed * radians.cos(), bias + speed * radians.sin())
}

/// Body снаряда в точке лучника
pub fn launch_body(origin: Vec2, angle_degrees: f32, power: f32, wind: Wind, launch: &LaunchConfig) -> Body {
    let velocity = launch_velocity(angle_degrees, power, launch.bias);

    Body::fixed(origin.x, origin.y, launch.projectile_scale)
        .with_velocity(velocity.x, velocity.y)
        .with_gravity(true)
        .with_wind(wind)
}

/// Выстрел: Aiming → Airborne + Body снаряда
///
/// None (и никаких изменений) если стрелять нельзя - снаряд уже в полёте,
/// идёт взрыв или раунд не в Aiming.
pub fn fire(state: &mut RoundState, origin: Vec2, launch: &LaunchConfig) -> Option<Body> {
    if !state.launch() {
        return None;
    }
    Some(launch_body(origin, state.angle, state.power, state.wind, launch))
}

/// Spawn entity снаряда
pub fn spawn_projectile(commands: &mut Commands, body: Body) -> Entity {
    commands
        .spawn((body, Projectile, MaterialHandle::Projectile, Rollback))
        .id()
}
