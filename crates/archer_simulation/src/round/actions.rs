//! Player actions: дискретные edge-triggered команды от host UI
//!
//! Fire, Angle-, Angle+, Power-, Power+ и debug ForceHit/ForceMiss.
//! Никакого continuous repeat - одно событие = одно нажатие.

use bevy::prelude::*;

use super::events::{RoundResolved, SessionEnded};
use super::resolution::{emit_round_events, finish_round, TargetBodies};
use super::state::{RoundState, ShotOutcome};
use crate::components::{Archer, Body, Projectile};
use crate::config::GameConfig;
use crate::projectile::{fire, spawn_projectile, ProjectileFired};
use crate::DeterministicRng;

/// Команда игрока
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Fire,
    AngleDown,
    AngleUp,
    PowerDown,
    PowerUp,
    /// Debug: засчитать попадание
    ForceHit,
    /// Debug: засчитать промах
    ForceMiss,
}

impl PlayerAction {
    /// Раскладка клавиш control panel: c / j l / u o / q w
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'c' => Some(PlayerAction::Fire),
            'j' => Some(PlayerAction::AngleDown),
            'l' => Some(PlayerAction::AngleUp),
            'u' => Some(PlayerAction::PowerDown),
            'o' => Some(PlayerAction::PowerUp),
            'q' => Some(PlayerAction::ForceHit),
            'w' => Some(PlayerAction::ForceMiss),
            _ => None,
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, PlayerAction::ForceHit | PlayerAction::ForceMiss)
    }
}

/// Система: применить команды игрока за кадр
///
/// - Angle/Power: clamp в момент изменения
/// - Fire: только в Aiming и если снаряда нет (иначе тихий no-op)
/// - ForceHit/ForceMiss: только при debug_actions и НЕ во время взрыва;
///   снаряд, выпущенный в этом же кадре, тоже удаляется
#[allow(clippy::too_many_arguments)]
pub fn handle_player_actions(
    mut commands: Commands,
    mut actions: EventReader<PlayerAction>,
    mut state: ResMut<RoundState>,
    mut rng: ResMut<DeterministicRng>,
    config: Res<GameConfig>,
    archers: Query<&Body, With<Archer>>,
    projectiles: Query<Entity, With<Projectile>>,
    mut targets: TargetBodies,
    mut fired: EventWriter<ProjectileFired>,
    mut resolved: EventWriter<RoundResolved>,
    mut ended: EventWriter<SessionEnded>,
) {
    // Снаряд, заспавненный в этом же проходе (через Commands, в Query его ещё нет)
    let mut spawned: Option<Entity> = None;
    // finish_round уже удалил снаряды из Query в этом проходе
    let mut cleared = false;

    for action in actions.read() {
        match action {
            PlayerAction::AngleDown => state.adjust_angle(-config.launch.angle_step, &config.launch),
            PlayerAction::AngleUp => state.adjust_angle(config.launch.angle_step, &config.launch),
            PlayerAction::PowerDown => state.adjust_power(-config.launch.power_step, &config.launch),
            PlayerAction::PowerUp => state.adjust_power(config.launch.power_step, &config.launch),

            PlayerAction::Fire => {
                if spawned.is_some() || (!cleared && !projectiles.is_empty()) {
                    continue;
                }
                let Ok(archer) = archers.single() else {
                    crate::log_warning("Fire ignored: no single Archer in the scene");
                    continue;
                };

                if let Some(body) = fire(&mut state, archer.position(), &config.launch) {
                    let entity = spawn_projectile(&mut commands, body);
                    spawned = Some(entity);
                    crate::log_info(&format!(
                        "Fire: angle={} power={} wind={} → dx={:.4} dy={:.4}",
                        state.angle, state.power, state.wind, body.dx, body.dy
                    ));
                    fired.write(ProjectileFired {
                        projectile: entity,
                        angle: state.angle,
                        power: state.power,
                        velocity: body.velocity(),
                    });
                }
            }

            PlayerAction::ForceHit | PlayerAction::ForceMiss => {
                if !config.debug_actions {
                    continue;
                }
                if state.exploding {
                    crate::log(&format!("{:?} ignored while resolving", action));
                    continue;
                }

                let outcome = if *action == PlayerAction::ForceHit {
                    ShotOutcome::Hit
                } else {
                    ShotOutcome::Miss
                };
                let report = state.commit(outcome, &config, &mut rng.rng);
                finish_round(&mut commands, &state, &projectiles, &mut targets, &report);
                if let Some(entity) = spawned.take() {
                    commands.entity(entity).despawn();
                }
                cleared = true;
                emit_round_events(&report, &mut resolved, &mut ended);
            }
        }
    }
}
