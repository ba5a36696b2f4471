//! Kinematic Body: позиция, скорость, гравитация, ветер
//!
//! Один `advance()` = один тик = один отрендеренный кадр.
//! Физика НЕ отвязана от частоты кадров: силы применяются "за тик", без delta time.

use std::fmt;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::physics::Aabb;

/// Направление ветра (только четыре стороны света, диагоналей нет)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    East,
    South,
    West,
}

impl WindDirection {
    pub const ALL: [WindDirection; 4] = [
        WindDirection::North,
        WindDirection::East,
        WindDirection::South,
        WindDirection::West,
    ];

    /// Равномерный выбор из четырёх направлений
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Единичный вектор "толчка" вдоль оси направления
    pub fn push(&self) -> Vec2 {
        match self {
            WindDirection::North => Vec2::Y,
            WindDirection::East => Vec2::X,
            WindDirection::South => Vec2::NEG_Y,
            WindDirection::West => Vec2::NEG_X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::East => "East",
            WindDirection::South => "South",
            WindDirection::West => "West",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ветер: целая сила + направление
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    pub magnitude: u32,
    pub direction: WindDirection,
}

impl Default for Wind {
    fn default() -> Self {
        Self::calm()
    }
}

impl Wind {
    pub fn new(magnitude: u32, direction: WindDirection) -> Self {
        Self { magnitude, direction }
    }

    /// Штиль (направление не важно при нулевой силе)
    pub fn calm() -> Self {
        Self::new(0, WindDirection::North)
    }

    /// Сила ∈ [0, max_magnitude], направление равномерно
    pub fn random(rng: &mut impl Rng, max_magnitude: u32) -> Self {
        Self::new(rng.gen_range(0..=max_magnitude), WindDirection::random(rng))
    }

    /// Изменение скорости за один тик
    pub fn velocity_delta(&self, wind_per_unit: f32) -> Vec2 {
        self.direction.push() * (wind_per_unit * self.magnitude as f32)
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.direction)
    }
}

/// Любой размещённый объект: лучник, мишень, земля, башня, снаряд
///
/// Инвариант: x/y/dx/dy конечны, scale > 0.
/// `scale` - одновременно размер для рендера и collision half-extent по обеим осям.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
    /// Только для рендера
    pub zscale: f32,
    pub gravity: bool,
    pub wind: Wind,
}

impl Body {
    /// Статичное тело (лучник, башня, земля, мишень)
    pub fn fixed(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x,
            y,
            scale,
            dx: 0.0,
            dy: 0.0,
            zscale: 1.0,
            gravity: false,
            wind: Wind::calm(),
        }
    }

    pub fn with_zscale(mut self, zscale: f32) -> Self {
        self.zscale = zscale;
        self
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = wind;
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_scale(self.position(), self.scale)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.dx.is_finite() && self.dy.is_finite()
    }

    /// Один тик интегрирования
    ///
    /// Порядок важен для воспроизводимости траектории:
    /// 1. gravity: dy -= gravity_per_tick
    /// 2. wind: толчок вдоль одной оси
    /// 3. position += velocity (уже обновлённая)
    ///
    /// Для статичных тел (нулевая скорость, без гравитации и ветра) - no-op.
    pub fn advance(&mut self, physics: &PhysicsConfig) {
        if self.gravity {
            self.dy -= physics.gravity_per_tick;
        }

        let wind = self.wind.velocity_delta(physics.wind_per_unit);
        self.dx += wind.x;
        self.dy += wind.y;

        self.x += self.dx;
        self.y += self.dy;
    }

    /// Заморозка на время взрыва: ни скорости, ни гравитации, ни ветра
    pub fn freeze(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
        self.gravity = false;
        self.wind = Wind::calm();
    }
}
