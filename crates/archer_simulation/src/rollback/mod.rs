//! Rollback marker component
//!
//! Маркирует entities, чьё состояние входит в snapshot симуляции
//! (determinism тесты, будущий save/load/replay).
//!
//! Детерминизм: 1 кадр = 1 тик, seeded RNG, chained system sets.

use bevy::prelude::*;

/// Rollback marker component
///
/// Примеры:
/// - Archer/Target/Ground/Tower/Projectile - YES
/// - RenderQueue, HUD - NO (производные, пересобираются каждый кадр)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Rollback;
