//! Round flow integration test
//!
//! Полный headless App (SimulationPlugin), управляется только через PlayerAction.
//!
//! Проверяем:
//! - Fire в полёте - no-op
//! - Постоянный overlap → ровно один Resolving и один исход
//! - Задержка resolving = 90 кадров (1.5 sec × 60)
//! - lives → 0 → GameOver → reset
//! - Debug actions во время взрыва игнорируются

use bevy::ecs::event::{EventCursor, Events};
use bevy::prelude::*;
use archer_simulation::config::Placement;
use archer_simulation::*;

/// Helper: App со сценой (первый update спавнит сцену)
fn create_round_app(config: GameConfig) -> App {
    let mut app = create_game_app(42, config);
    app.update();
    app
}

/// Конфиг, в котором первый же кадр полёта упирается в башню (гарантированный промах)
fn tower_in_face_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.debug_actions = true;
    config.layout.tower = Some(Placement { x: -16.0, scale: 3.0 });
    config
}

fn state(app: &App) -> RoundState {
    app.world().resource::<RoundState>().clone()
}

fn projectiles(app: &mut App) -> Vec<Body> {
    let world = app.world_mut();
    world
        .query_filtered::<&Body, With<Projectile>>()
        .iter(world)
        .copied()
        .collect()
}

fn target_body(app: &mut App) -> Body {
    let world = app.world_mut();
    *world
        .query_filtered::<&Body, With<Target>>()
        .single(world)
        .expect("one target")
}

fn send(app: &mut App, action: PlayerAction) {
    app.world_mut().send_event(action);
}

/// Прогнать кадры, собрать все RoundResolved
fn run_frames(app: &mut App, frames: usize, cursor: &mut EventCursor<RoundResolved>) -> Vec<RoundResolved> {
    let mut resolved = Vec::new();
    for _ in 0..frames {
        app.update();
        resolved.extend(cursor.read(app.world().resource::<Events<RoundResolved>>()).copied());
    }
    resolved
}

fn resolved_cursor(app: &App) -> EventCursor<RoundResolved> {
    app.world().resource::<Events<RoundResolved>>().get_cursor()
}

/// Test: второй Fire в полёте ничего не меняет
#[test]
fn test_fire_while_airborne_is_noop() {
    let mut app = create_round_app(GameConfig::default());

    send(&mut app, PlayerAction::Fire);
    app.update();

    let flying = projectiles(&mut app);
    assert_eq!(flying.len(), 1);
    assert!(state(&app).is_airborne());

    send(&mut app, PlayerAction::Fire);
    app.update();

    let after = projectiles(&mut app);
    assert_eq!(after.len(), 1, "только один снаряд в полёте");

    // Снаряд просто продолжил полёт (ровно один тик интегрирования)
    let mut expected = flying[0];
    expected.advance(&GameConfig::default().physics);
    assert!((after[0].x - expected.x).abs() < 1e-5);
    assert!((after[0].dy - expected.dy).abs() < 1e-6);
}

/// Test: angle/power через PlayerAction с clamp
#[test]
fn test_aim_actions_clamped() {
    let mut app = create_round_app(GameConfig::default());

    send(&mut app, PlayerAction::AngleUp);
    send(&mut app, PlayerAction::PowerDown);
    app.update();

    let s = state(&app);
    assert_eq!(s.angle, 46.0);
    assert_eq!(s.power, 39.0);

    for _ in 0..30 {
        send(&mut app, PlayerAction::PowerDown);
    }
    app.update();
    assert_eq!(state(&app).power, 20.0);
}

/// Test: снаряд застрял в мишени на весь взрыв → ровно один Hit
#[test]
fn test_persistent_overlap_resolves_once() {
    let mut app = create_round_app(GameConfig::default());
    let mut cursor = resolved_cursor(&app);

    // Мишень прямо на лучнике: overlap с первого кадра полёта
    {
        let world = app.world_mut();
        let mut target = world
            .query_filtered::<&mut Body, With<Target>>()
            .single_mut(world)
            .expect("one target");
        target.x = -20.0;
        target.y = 2.5;
        target.scale = 3.0;
    }

    send(&mut app, PlayerAction::Fire);
    let resolved = run_frames(&mut app, 300, &mut cursor);

    assert_eq!(resolved.len(), 1, "exactly one committed outcome: {:?}", resolved);
    assert_eq!(resolved[0].outcome, ShotOutcome::Hit);

    let s = state(&app);
    assert_eq!(s.score, 1);
    assert_eq!(s.lives, 3);
    assert_eq!(s.phase, GamePhase::Aiming);
    assert!(!s.exploding);
    assert!(projectiles(&mut app).is_empty());

    // После попадания мишень переставлена по новым параметрам
    let target = target_body(&mut app);
    assert_eq!(target.position(), Vec2::new(s.target.x, s.target.y));
    assert_eq!(target.scale, s.target.scale);
}

/// Test: исход фиксируется ровно через resolve_delay_ticks кадров
#[test]
fn test_resolution_delay_in_frames() {
    let config = tower_in_face_config();
    let delay = config.resolve_delay_ticks() as usize;
    assert_eq!(delay, 90);

    let mut app = create_round_app(config);
    let mut cursor = resolved_cursor(&app);

    send(&mut app, PlayerAction::Fire);
    let mut frames_to_resolving = 0;
    while !state(&app).is_resolving() {
        assert!(frames_to_resolving < 10, "tower must be hit right after launch");
        assert!(run_frames(&mut app, 1, &mut cursor).is_empty());
        frames_to_resolving += 1;
    }

    assert_eq!(state(&app).phase, GamePhase::Resolving { outcome: ShotOutcome::Miss });

    // Снаряд заморожен и перекрашен в взрыв
    {
        let world = app.world_mut();
        let (body, material) = world
            .query_filtered::<(&Body, &MaterialHandle), With<Projectile>>()
            .single(world)
            .expect("frozen projectile");
        assert_eq!(body.velocity(), Vec2::ZERO);
        assert!(!body.gravity);
        assert_eq!(*material, MaterialHandle::Explosion);
    }

    assert!(run_frames(&mut app, delay - 1, &mut cursor).is_empty());
    let resolved = run_frames(&mut app, 1, &mut cursor);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].outcome, ShotOutcome::Miss);
    assert_eq!(resolved[0].lives, 2);

    let s = state(&app);
    assert_eq!(s.lives, 2);
    assert!(s.is_aiming());
}

/// Test: промах не меняет мишень и ветер
#[test]
fn test_miss_keeps_target_and_wind() {
    let mut app = create_round_app(tower_in_face_config());
    let before = state(&app);
    let mut cursor = resolved_cursor(&app);

    send(&mut app, PlayerAction::Fire);
    let resolved = run_frames(&mut app, 120, &mut cursor);
    assert_eq!(resolved.len(), 1);

    let after = state(&app);
    assert_eq!(after.lives, before.lives - 1);
    assert_eq!(after.target, before.target);
    assert_eq!(after.wind, before.wind);
}

/// Test: ForceHit/ForceMiss во время взрыва игнорируются
#[test]
fn test_debug_actions_ignored_while_exploding() {
    let mut app = create_round_app(tower_in_face_config());
    let mut cursor = resolved_cursor(&app);

    send(&mut app, PlayerAction::Fire);
    run_frames(&mut app, 2, &mut cursor);
    assert!(state(&app).exploding);

    send(&mut app, PlayerAction::ForceHit);
    send(&mut app, PlayerAction::ForceMiss);
    assert!(run_frames(&mut app, 1, &mut cursor).is_empty());

    let s = state(&app);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 3);
    assert!(s.is_resolving());

    // Отложенный промах всё равно фиксируется один раз
    let resolved = run_frames(&mut app, 120, &mut cursor);
    assert_eq!(resolved.len(), 1);
    assert_eq!(state(&app).lives, 2);
}

/// Test: debug actions выключены конфигом
#[test]
fn test_debug_actions_disabled() {
    let mut config = GameConfig::default();
    config.debug_actions = false;
    let mut app = create_round_app(config);

    send(&mut app, PlayerAction::ForceHit);
    app.update();

    assert_eq!(state(&app).score, 0);
}

/// Test: три промаха → GameOver → синхронный reset
#[test]
fn test_game_over_resets_session() {
    let mut config = GameConfig::default();
    config.debug_actions = true;
    let mut app = create_round_app(config);
    let mut ended_cursor = app.world().resource::<Events<SessionEnded>>().get_cursor();

    send(&mut app, PlayerAction::ForceHit);
    app.update();
    assert_eq!(state(&app).score, 1);

    // Снаряд в полёте во время game over тоже удаляется
    send(&mut app, PlayerAction::Fire);
    app.update();
    assert_eq!(projectiles(&mut app).len(), 1);

    let mut summaries = Vec::new();
    for _ in 0..3 {
        send(&mut app, PlayerAction::ForceMiss);
        app.update();
        summaries.extend(
            ended_cursor
                .read(app.world().resource::<Events<SessionEnded>>())
                .map(|ended| ended.summary),
        );
    }

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].final_score, 1);
    assert_eq!(summaries[0].high_score, 1);
    assert!(summaries[0].new_record);

    let s = state(&app);
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 0);
    assert_eq!(s.high_score, 1);
    assert_eq!(s.session, 1);
    assert_eq!(s.phase, GamePhase::Aiming);
    assert!(projectiles(&mut app).is_empty());
    assert!(app.world().resource::<ResolutionTimer>().pending().is_none());

    // Новая мишень синхронизирована с entity
    let target = target_body(&mut app);
    assert_eq!(target.position(), Vec2::new(s.target.x, s.target.y));
}

/// Test: вылет за границы мира = промах
#[test]
fn test_out_of_bounds_is_miss() {
    let mut config = GameConfig::default();
    config.layout.tower = None;
    config.bounds.max_x = -19.0;
    let mut app = create_round_app(config);
    let mut cursor = resolved_cursor(&app);

    send(&mut app, PlayerAction::Fire);
    let resolved = run_frames(&mut app, 150, &mut cursor);

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].outcome, ShotOutcome::Miss);
    assert_eq!(state(&app).lives, 2);
}

/// Test: RenderQueue содержит все тела сцены + снаряд
#[test]
fn test_render_queue_tracks_scene() {
    let mut app = create_round_app(GameConfig::default());
    assert_eq!(app.world().resource::<RenderQueue>().len(), 4);

    send(&mut app, PlayerAction::Fire);
    app.update();

    let queue = app.world().resource::<RenderQueue>();
    assert_eq!(queue.len(), 5);
    assert!(queue
        .items()
        .iter()
        .any(|item| item.material == MaterialHandle::Projectile));
}

/// Test: Fire + ForceHit в одном кадре не оставляют «висящий» снаряд
#[test]
fn test_fire_then_force_hit_same_frame() {
    let mut config = GameConfig::default();
    config.debug_actions = true;
    let mut app = create_round_app(config);

    send(&mut app, PlayerAction::Fire);
    send(&mut app, PlayerAction::ForceHit);
    app.update();

    let s = state(&app);
    assert_eq!(s.score, 1);
    assert_eq!(s.phase, GamePhase::Aiming);
    assert!(projectiles(&mut app).is_empty(), "снаряд удалён вместе с исходом раунда");

    // Следующий выстрел принимается как обычно
    send(&mut app, PlayerAction::Fire);
    app.update();
    assert_eq!(projectiles(&mut app).len(), 1);
    assert!(state(&app).is_airborne());
}

/// Test: Fire → ForceMiss → Fire в одном кадре = ровно один снаряд нового раунда
#[test]
fn test_fire_force_miss_fire_same_frame() {
    let mut config = GameConfig::default();
    config.debug_actions = true;
    let mut app = create_round_app(config);

    send(&mut app, PlayerAction::Fire);
    send(&mut app, PlayerAction::ForceMiss);
    send(&mut app, PlayerAction::Fire);
    send(&mut app, PlayerAction::Fire);
    app.update();

    let s = state(&app);
    assert_eq!(s.lives, 2);
    assert!(s.is_airborne());
    assert_eq!(projectiles(&mut app).len(), 1);
}

/// Test: ForceMiss при снаряде в полёте + Fire в том же кадре
#[test]
fn test_force_miss_in_flight_then_fire() {
    let mut config = GameConfig::default();
    config.debug_actions = true;
    let mut app = create_round_app(config);

    send(&mut app, PlayerAction::Fire);
    app.update();
    let old = projectiles(&mut app);
    assert_eq!(old.len(), 1);

    send(&mut app, PlayerAction::ForceMiss);
    send(&mut app, PlayerAction::Fire);
    app.update();

    let flying = projectiles(&mut app);
    assert_eq!(flying.len(), 1, "старый снаряд удалён, новый выпущен");
    assert_eq!(state(&app).lives, 2);
    assert!(state(&app).is_airborne());
    // Новый снаряд стартовал от лучника: один тик полёта, как старый кадром раньше
    assert!((flying[0].x - old[0].x).abs() < 1e-5);
    assert!((flying[0].y - old[0].y).abs() < 1e-5);
}
