//! Archer Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16: лучник стреляет по мишени с учётом
//! гравитации и ветра.
//!
//! HEADLESS ARCHITECTURE:
//! - ECS = вся игровая логика (интегратор, AABB коллизии, state machine раунда)
//! - Host = рендер (RenderSink), ввод (PlayerAction), HUD (RoundState::hud)
//!
//! 1 вызов `App::update()` = 1 кадр = 1 тик физики.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod projectile;
pub mod render;
pub mod rollback;
pub mod round;
pub mod scene;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{ConfigError, FloorPolicy, GameConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use physics::{overlaps, Aabb, CollisionDetected, CollisionKind, PhysicsPlugin};
pub use projectile::{fire, launch_velocity, ProjectileFired};
pub use render::{MaterialHandle, RenderExtractPlugin, RenderQueue, RenderSink, Renderable};
pub use rollback::Rollback;
pub use round::{
    FrameClock, GamePhase, GameSummary, HudReadout, PlayerAction, ResolutionTimer, RoundPlugin, RoundResolved,
    RoundState, SessionEnded, ShotOutcome, TargetPlacement,
};

/// Порядок систем внутри кадра (Update)
///
/// Clock → Input → Integrate → Collide → Resolve, строго последовательно.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Clock,
    Input,
    Integrate,
    Collide,
    Resolve,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// GameConfig и DeterministicRng вставляются только если host их ещё не вставил.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::default());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            Update,
            (
                SimulationSet::Clock,
                SimulationSet::Input,
                SimulationSet::Integrate,
                SimulationSet::Collide,
                SimulationSet::Resolve,
            )
                .chain(),
        )
        .add_plugins((RoundPlugin, PhysicsPlugin, RenderExtractPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (без игровых систем)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Headless App с полной игрой: сцена спавнится на первом `update()`
pub fn create_game_app(seed: u64, config: GameConfig) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(config).add_plugins(SimulationPlugin);
    app
}

/// Snapshot компонента T у всех Rollback-entities (детерминированный порядок)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query_filtered::<(Entity, &T), With<Rollback>>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Snapshot игры: тела + RoundState + FrameClock
///
/// Одинаковый seed и одинаковые PlayerAction → одинаковый snapshot.
pub fn simulation_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = world_snapshot::<Body>(world);

    if let Some(state) = world.get_resource::<RoundState>() {
        snapshot.extend_from_slice(format!("{:?}", state).as_bytes());
    }
    if let Some(clock) = world.get_resource::<FrameClock>() {
        snapshot.extend_from_slice(&clock.tick.to_le_bytes());
    }

    snapshot
}
