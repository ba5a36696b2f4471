//! Маркеры ролей: какой Body чем является
//!
//! Вместо иерархии Shape → Cube/Arrow - композиция:
//! entity = Body + маркер роли + MaterialHandle.

use bevy::prelude::*;

/// Лучник (точка выстрела). Живёт всю сессию.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Archer;

/// Мишень. Перемещается и меняет размер после каждого попадания.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Target;

/// Сегмент земли (касание = промах)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ground;

/// Башня-препятствие (касание = промах)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Tower;

/// Снаряд в полёте. Не больше одного одновременно.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Projectile;

/// Тело заморожено (взрыв): интегратор и детектор коллизий его пропускают
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Frozen;
