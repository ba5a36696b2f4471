//! Scene setup: лучник, земля, башня, мишень
//!
//! Все статичные тела спавнятся один раз при старте; дальше меняется только
//! мишень (позиция/размер из RoundState::target).

use bevy::prelude::*;

use crate::components::{Archer, Body, Ground, Target, Tower};
use crate::config::GameConfig;
use crate::render::MaterialHandle;
use crate::rollback::Rollback;
use crate::round::RoundState;
use crate::DeterministicRng;

/// Spawn статичных тел сцены + мишени
pub fn spawn_scene(commands: &mut Commands, config: &GameConfig, state: &RoundState) {
    let layout = &config.layout;

    let archer = layout.archer;
    commands.spawn((
        Body::fixed(archer.x, layout.resting_y(archer.scale), archer.scale),
        Archer,
        MaterialHandle::Archer,
        Rollback,
    ));

    for segment in &layout.ground {
        commands.spawn((
            Body::fixed(segment.x, layout.ground_y(segment), segment.scale).with_zscale(segment.zscale),
            Ground,
            MaterialHandle::Ground,
            Rollback,
        ));
    }

    if let Some(tower) = layout.tower {
        commands.spawn((
            Body::fixed(tower.x, layout.resting_y(tower.scale), tower.scale),
            Tower,
            MaterialHandle::Tower,
            Rollback,
        ));
    }

    let target = state.target;
    commands.spawn((
        Body::fixed(target.x, target.y, target.scale),
        Target,
        MaterialHandle::Target,
        Rollback,
    ));
}

/// Startup система: новая сессия + сцена
pub fn setup_game(mut commands: Commands, config: Res<GameConfig>, mut rng: ResMut<DeterministicRng>) {
    let state = RoundState::new_session(&config, &mut rng.rng);
    spawn_scene(&mut commands, &config, &state);

    crate::log_info(&format!(
        "Session started (seed {}): target x={:.2} scale={:.2}, {}",
        rng.seed,
        state.target.x,
        state.target.scale,
        state.hud()
    ));

    commands.insert_resource(state);
}
