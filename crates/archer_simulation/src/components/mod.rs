//! ECS Components для игровых entity
//!
//! - body: Kinematic Body (позиция, скорость, гравитация, ветер)
//! - roles: маркеры ролей (Archer, Target, Ground, Tower, Projectile) + Frozen

pub mod body;
pub mod roles;

// Re-exports для удобного импорта
pub use body::*;
pub use roles::*;
