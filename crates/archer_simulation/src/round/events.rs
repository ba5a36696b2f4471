//! Round события (ECS → host/UI)

use bevy::prelude::*;

use super::state::{GameSummary, ShotOutcome};

/// Событие: исход раунда зафиксирован
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RoundResolved {
    pub outcome: ShotOutcome,
    /// Счёт и жизни сразу после исхода
    pub score: u32,
    pub lives: u32,
}

/// Событие: жизни кончились, сессия закончена (и уже сброшена)
///
/// Host показывает итоговый счёт vs рекорд.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SessionEnded {
    pub summary: GameSummary,
}
