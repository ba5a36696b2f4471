//! Конфигурация игры (RON)
//!
//! Все "магические" константы симуляции живут здесь, а не в глобальных переменных:
//! - physics: гравитация и ветер на тик
//! - launch: bias скорости, clamp угла/мощности, шаг кнопок
//! - round: жизни, диапазоны рандомизации мишени, максимальный ветер
//! - layout: лучник, башня, сегменты земли, уровень земли
//! - bounds: границы мира (вылет за них = промах)
//!
//! Файл по умолчанию: `assets/config/game.ron`. Все поля опциональны (`#[serde(default)]`).

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::components::Body;

/// Ошибки загрузки конфига (единственная fallible поверхность крейта)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Силы, применяемые к Body за один тик (не масштабируются на delta time)
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Уменьшение dy за тик для gravity-тел
    pub gravity_per_tick: f32,
    /// Изменение скорости за тик на единицу силы ветра
    pub wind_per_unit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_per_tick: 0.00861,
            wind_per_unit: 0.001,
        }
    }
}

/// Политика "пола" для интегрирования снаряда
///
/// Ранние версии игры прекращали интегрировать снаряд ниже определённой высоты,
/// последняя - интегрирует всегда. Выбор явный, через конфиг.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub enum FloorPolicy {
    /// Интегрировать всегда после выстрела (canonical)
    #[default]
    AlwaysIntegrate,
    /// Gravity-тела на высоте ≤ floor замирают
    StopAtOrBelow(f32),
}

impl FloorPolicy {
    /// Можно ли интегрировать тело в этом тике
    pub fn allows(&self, body: &Body) -> bool {
        match self {
            FloorPolicy::AlwaysIntegrate => true,
            FloorPolicy::StopAtOrBelow(floor) => !body.gravity || body.y > *floor,
        }
    }
}

/// Диапазон [min, max) для рандомизации
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl Default for SpawnRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl SpawnRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }
}

/// Параметры выстрела
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    /// Минимальная скорость по обеим осям (снаряд всегда летит вперёд и вверх)
    pub bias: f32,
    /// Half-extent снаряда
    pub projectile_scale: f32,
    pub angle_min: f32,
    pub angle_max: f32,
    pub power_min: f32,
    pub power_max: f32,
    pub initial_angle: f32,
    pub initial_power: f32,
    /// Шаг одного нажатия Angle-/Angle+
    pub angle_step: f32,
    /// Шаг одного нажатия Power-/Power+
    pub power_step: f32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            bias: 0.2,
            projectile_scale: 2.0,
            angle_min: 0.0,
            angle_max: 180.0,
            power_min: 20.0,
            power_max: 120.0,
            initial_angle: 45.0,
            initial_power: 40.0,
            angle_step: 1.0,
            power_step: 1.0,
        }
    }
}

/// Правила раунда
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    pub starting_lives: u32,
    /// Размер мишени, [1, 11)
    pub target_scale: SpawnRange,
    /// X мишени, [10, 30)
    pub target_x: SpawnRange,
    /// Максимальная сила ветра (включительно)
    pub max_wind: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            target_scale: SpawnRange::new(1.0, 11.0),
            target_x: SpawnRange::new(10.0, 30.0),
            max_wind: 4,
        }
    }
}

/// Статичный объект, стоящий на земле (y вычисляется от ground_level)
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Placement {
    pub x: f32,
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self { x: 0.0, scale: 1.0 }
    }
}

/// Сегмент земли (верхняя грань на ground_level)
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GroundSegment {
    pub x: f32,
    pub scale: f32,
    pub zscale: f32,
}

impl Default for GroundSegment {
    fn default() -> Self {
        Self {
            x: 0.0,
            scale: 100.0,
            zscale: 1.1,
        }
    }
}

/// Раскладка сцены
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Высота верхней грани земли (level-dependent offset для мишени)
    pub ground_level: f32,
    pub archer: Placement,
    /// Башня-препятствие (попадание = промах)
    pub tower: Option<Placement>,
    pub ground: Vec<GroundSegment>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ground_level: -2.5,
            archer: Placement { x: -20.0, scale: 5.0 },
            tower: Some(Placement { x: -8.0, scale: 3.0 }),
            ground: vec![GroundSegment::default()],
        }
    }
}

impl LayoutConfig {
    /// Y центра объекта, стоящего на земле
    pub fn resting_y(&self, scale: f32) -> f32 {
        self.ground_level + scale
    }

    /// Y центра сегмента земли (верхняя грань на ground_level)
    pub fn ground_y(&self, segment: &GroundSegment) -> f32 {
        self.ground_level - segment.scale
    }
}

/// Границы мира для снаряда
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BoundsConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            min_x: -150.0,
            max_x: 150.0,
            min_y: -50.0,
        }
    }
}

impl BoundsConfig {
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= self.min_x && position.x <= self.max_x && position.y >= self.min_y
    }
}

/// Главный конфиг игры (Resource)
#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub launch: LaunchConfig,
    pub round: RoundConfig,
    pub layout: LayoutConfig,
    pub bounds: BoundsConfig,
    pub floor_policy: FloorPolicy,
    /// Длительность взрыва перед фиксацией исхода раунда (секунды, [1, 2])
    pub resolve_delay_secs: f32,
    /// Номинальная частота кадров (1 кадр = 1 тик)
    pub frames_per_second: f32,
    /// Разрешены ли ForceHit/ForceMiss
    pub debug_actions: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            launch: LaunchConfig::default(),
            round: RoundConfig::default(),
            layout: LayoutConfig::default(),
            bounds: BoundsConfig::default(),
            floor_policy: FloorPolicy::default(),
            resolve_delay_secs: 1.5,
            frames_per_second: 60.0,
            debug_actions: cfg!(debug_assertions),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Загрузить или вернуть default + ошибку (для логирования вызывающим)
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Задержка resolving в тиках (минимум 1)
    pub fn resolve_delay_ticks(&self) -> u64 {
        ((self.resolve_delay_secs * self.frames_per_second).round() as u64).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let launch = &self.launch;
        let round = &self.round;
        let layout = &self.layout;
        let mut floats = vec![
            ("physics.gravity_per_tick".to_string(), self.physics.gravity_per_tick),
            ("physics.wind_per_unit".to_string(), self.physics.wind_per_unit),
            ("launch.bias".to_string(), launch.bias),
            ("launch.projectile_scale".to_string(), launch.projectile_scale),
            ("launch.angle_min".to_string(), launch.angle_min),
            ("launch.angle_max".to_string(), launch.angle_max),
            ("launch.power_min".to_string(), launch.power_min),
            ("launch.power_max".to_string(), launch.power_max),
            ("launch.initial_angle".to_string(), launch.initial_angle),
            ("launch.initial_power".to_string(), launch.initial_power),
            ("launch.angle_step".to_string(), launch.angle_step),
            ("launch.power_step".to_string(), launch.power_step),
            ("round.target_scale.min".to_string(), round.target_scale.min),
            ("round.target_scale.max".to_string(), round.target_scale.max),
            ("round.target_x.min".to_string(), round.target_x.min),
            ("round.target_x.max".to_string(), round.target_x.max),
            ("layout.ground_level".to_string(), layout.ground_level),
            ("layout.archer.x".to_string(), layout.archer.x),
            ("layout.archer.scale".to_string(), layout.archer.scale),
            ("bounds.min_x".to_string(), self.bounds.min_x),
            ("bounds.max_x".to_string(), self.bounds.max_x),
            ("bounds.min_y".to_string(), self.bounds.min_y),
            ("resolve_delay_secs".to_string(), self.resolve_delay_secs),
            ("frames_per_second".to_string(), self.frames_per_second),
        ];
        if let Some(tower) = layout.tower {
            floats.push(("layout.tower.x".to_string(), tower.x));
            floats.push(("layout.tower.scale".to_string(), tower.scale));
        }
        if let FloorPolicy::StopAtOrBelow(floor) = self.floor_policy {
            floats.push(("floor_policy".to_string(), floor));
        }
        for (i, segment) in layout.ground.iter().enumerate() {
            floats.push((format!("layout.ground[{i}].x"), segment.x));
            floats.push((format!("layout.ground[{i}].scale"), segment.scale));
            floats.push((format!("layout.ground[{i}].zscale"), segment.zscale));
        }
        for (name, value) in floats {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite (got {value})"));
            }
        }

        if launch.angle_min > launch.angle_max {
            return invalid(format!(
                "launch angle range is empty: [{}, {}]",
                launch.angle_min, launch.angle_max
            ));
        }
        if launch.power_min > launch.power_max {
            return invalid(format!(
                "launch power range is empty: [{}, {}]",
                launch.power_min, launch.power_max
            ));
        }
        if launch.projectile_scale <= 0.0 {
            return invalid(format!("launch.projectile_scale must be positive (got {})", launch.projectile_scale));
        }

        if round.starting_lives == 0 {
            return invalid("round.starting_lives must be at least 1".to_string());
        }
        for (name, range) in [("round.target_scale", round.target_scale), ("round.target_x", round.target_x)] {
            if !(range.min < range.max) {
                return invalid(format!("{name} range is empty: [{}, {})", range.min, range.max));
            }
        }
        if round.target_scale.min <= 0.0 {
            return invalid(format!("round.target_scale.min must be positive (got {})", round.target_scale.min));
        }

        if layout.archer.scale <= 0.0 {
            return invalid(format!("layout.archer.scale must be positive (got {})", layout.archer.scale));
        }
        if let Some(tower) = layout.tower {
            if tower.scale <= 0.0 {
                return invalid(format!("layout.tower.scale must be positive (got {})", tower.scale));
            }
        }
        if layout.ground.is_empty() {
            return invalid("layout.ground needs at least one segment".to_string());
        }
        if let Some(segment) = layout.ground.iter().find(|s| s.scale <= 0.0) {
            return invalid(format!("ground segment at x={} has non-positive scale", segment.x));
        }

        if !(self.bounds.min_x < self.bounds.max_x) {
            return invalid(format!("bounds x range is empty: [{}, {}]", self.bounds.min_x, self.bounds.max_x));
        }
        if !(1.0..=2.0).contains(&self.resolve_delay_secs) {
            return invalid(format!("resolve_delay_secs must be within [1, 2] (got {})", self.resolve_delay_secs));
        }
        if self.frames_per_second <= 0.0 {
            return invalid(format!("frames_per_second must be positive (got {})", self.frames_per_second));
        }

        Ok(())
    }
}
