//! Round/Game state module
//!
//! ECS ответственность:
//! - RoundState: score, lives, угол/мощность, ветер, размещение мишени
//! - Переходы: Aiming → Airborne → Resolving → Aiming | GameOver
//! - Отложенная фиксация исхода (ResolutionTimer по FrameClock)
//! - PlayerAction: команды игрока от host UI
//!
//! Host ответственность: показать HUD (`RoundState::hud`) и SessionEnded.

use bevy::prelude::*;

pub mod actions;
pub mod events;
pub mod resolution;
pub mod state;

// Re-export основных типов
pub use actions::{handle_player_actions, PlayerAction};
pub use events::{RoundResolved, SessionEnded};
pub use resolution::{
    advance_frame_clock, begin_resolving, commit_due_resolutions, FrameClock, ResolutionTimer, ScheduledResolution,
};
pub use state::{GamePhase, GameSummary, HudReadout, RoundReport, RoundState, ShotOutcome, TargetPlacement};

use crate::projectile::ProjectileFired;
use crate::scene::setup_game;
use crate::SimulationSet;

/// Round Plugin
///
/// Порядок выполнения в кадре:
/// 1. advance_frame_clock (Clock)
/// 2. handle_player_actions (Input)
/// 3. begin_resolving → commit_due_resolutions (Resolve, после Collide)
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameClock>()
            .init_resource::<ResolutionTimer>()
            .add_event::<PlayerAction>()
            .add_event::<ProjectileFired>()
            .add_event::<RoundResolved>()
            .add_event::<SessionEnded>();

        app.add_systems(Startup, setup_game).add_systems(
            Update,
            (
                advance_frame_clock.in_set(SimulationSet::Clock),
                handle_player_actions.in_set(SimulationSet::Input),
                (begin_resolving, commit_due_resolutions)
                    .chain()
                    .in_set(SimulationSet::Resolve),
            ),
        );
    }
}
