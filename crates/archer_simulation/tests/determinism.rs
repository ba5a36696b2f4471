//! Тесты детерминизма
//!
//! Проверяем что симуляция с одинаковым seed даёт идентичные результаты:
//! одинаковые тела, мишени, ветер и исходы раундов.

use bevy::prelude::*;
use archer_simulation::*;

/// Autoplay: Fire каждый раз, когда можно стрелять; угол гуляет детерминированно
fn run_simulation(seed: u64, frames: usize) -> (Vec<u8>, RoundState) {
    let mut app = create_game_app(seed, GameConfig::default());

    for frame in 0..frames {
        let can_fire = app
            .world()
            .get_resource::<RoundState>()
            .is_some_and(|state| state.can_fire());
        if can_fire {
            app.world_mut().send_event(PlayerAction::Fire);
        }
        if frame % 7 == 0 {
            app.world_mut().send_event(PlayerAction::AngleDown);
        }
        app.update();
    }

    let snapshot = simulation_snapshot(app.world_mut());
    let state = app.world().resource::<RoundState>().clone();
    (snapshot, state)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const FRAMES: usize = 1500;

    let (snapshot1, state1) = run_simulation(SEED, FRAMES);
    let (snapshot2, state2) = run_simulation(SEED, FRAMES);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
    assert_eq!(state1, state2);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const FRAMES: usize = 600;

    // Запускаем 3 раза - все должны быть идентичны
    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED, FRAMES)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0].0, run.0, "Прогон {} дал результат отличный от прогона 0", i);
        assert_eq!(runs[0].1, run.1);
    }
}

#[test]
fn test_different_seeds_differ() {
    let mut app_a = create_game_app(1, GameConfig::default());
    let mut app_b = create_game_app(2, GameConfig::default());
    app_a.update();
    app_b.update();

    let a = app_a.world().resource::<RoundState>().clone();
    let b = app_b.world().resource::<RoundState>().clone();

    // Мишень - непрерывная случайная величина, совпадение практически невозможно
    assert_ne!(a.target, b.target);
}

#[test]
fn test_seeded_session_reproducible() {
    let config = GameConfig::default();
    let mut rng_a = DeterministicRng::new(99);
    let mut rng_b = DeterministicRng::new(99);

    let a = RoundState::new_session(&config, &mut rng_a.rng);
    let b = RoundState::new_session(&config, &mut rng_b.rng);

    assert_eq!(a, b);
}

#[test]
fn test_snapshot_tracks_round_state() {
    let mut app = create_game_app(7, GameConfig::default());
    app.update();
    let before = simulation_snapshot(app.world_mut());

    // Снаряда нет: тела те же, меняются угол и тик
    app.world_mut().send_event(PlayerAction::AngleUp);
    app.update();
    let bodies_only = world_snapshot::<Body>(app.world_mut());
    let after = simulation_snapshot(app.world_mut());

    assert!(after.starts_with(&bodies_only));
    assert_ne!(before, after);
}
